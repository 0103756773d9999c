//! One invocation from inputs to printed text.
//!
//! Load the topology, resolve the requested instance, build its tables,
//! fold the override layers on top and project the result. Any failure
//! aborts the whole invocation; nothing is printed for partial contexts.

use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::instance::{InstanceSelector, Resolver, RoleMap};
use crate::minigraph;
use crate::output::{Projector, Request};
use crate::ports::PortConfig;
use crate::tables;
use crate::template::TemplateEngine;
use crate::vars::{ConfigContext, Layer, MergeMode, VarStore};

/// Everything one invocation was asked to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// Topology file
    pub minigraph: Option<PathBuf>,
    /// Port configuration of the selected instance
    pub port_config: Option<PathBuf>,
    pub instance: InstanceSelector,
    /// Inline JSON override
    pub additional_data: Option<String>,
    pub yaml_files: Vec<PathBuf>,
    pub json_files: Vec<PathBuf>,
    /// Sub-role mapping file; overrides the configured one
    pub role_map: Option<PathBuf>,
    /// Merge mode; overrides the configured one
    pub merge_mode: Option<MergeMode>,
    pub request: Request,
}

/// Run an invocation and return the text to print
pub fn run(invocation: &Invocation, config: &Config) -> Result<String> {
    let context = build_context(invocation, config)?;

    let mut search_paths: Vec<PathBuf> = match &invocation.request {
        Request::Templates(paths) => paths
            .iter()
            .map(|p| p.parent().map(PathBuf::from).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };
    search_paths.extend(config.templates.search_paths.iter().cloned());
    search_paths.dedup();

    let engine = TemplateEngine::new(&config.templates, search_paths);
    Projector::new(&engine, config.output.json_indent).project(&invocation.request, &context)
}

/// Build the merged context of an invocation
pub fn build_context(invocation: &Invocation, config: &Config) -> Result<ConfigContext> {
    let ports = invocation
        .port_config
        .as_deref()
        .map(PortConfig::load)
        .transpose()?;

    let mode = invocation.merge_mode.unwrap_or(config.defaults.merge_mode);
    let mut store = VarStore::new(mode);

    if let Some(path) = &invocation.minigraph {
        let graph = minigraph::load(path)?;

        let mut roles = RoleMap::from_topology(&graph)?;
        if let Some(role_map) = invocation.role_map.as_ref().or(config.defaults.role_map.as_ref()) {
            roles.extend(RoleMap::load(role_map)?);
        }

        let view = Resolver::new(&roles)
            .with_port_config(ports.as_ref())
            .resolve(&graph, invocation.instance)?;
        info!(
            instance = %invocation.instance,
            links = view.links().len(),
            neighbors = view.neighbors().len(),
            sessions = view.peerings().len(),
            "instance resolved"
        );
        store.push(Layer::topology(tables::build(&view)));
    }

    if let (Some(ports), Some(path)) = (&ports, &invocation.port_config) {
        store.push(Layer::port_config(ports, path.display().to_string()));
    }
    for path in &invocation.yaml_files {
        store.push(Layer::yaml_file(path)?);
    }
    for path in &invocation.json_files {
        store.push(Layer::json_file(path)?);
    }
    if let Some(text) = &invocation.additional_data {
        store.push(Layer::inline_json(text)?);
    }

    Ok(store.merge())
}
