//! Shared test utilities and fixtures for the cfggen test suite.
//!
//! Include this module in your integration tests:
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;

use cfggen::graph::Graph;
use cfggen::instance::{FilteredView, InstanceSelector, Resolver, RoleMap};
use cfggen::ports::PortConfig;

/// Number of internal ASICs in the sample chassis
pub const ASIC_COUNT: u32 = 4;

/// Hostname of the sample chassis
pub const SAMPLE_HOST: &str = "multi_npu_platform_01";

/// Hardware SKU of the sample chassis
pub const SAMPLE_HWSKU: &str = "multi-npu-01";

/// Get the path to the test fixtures directory
pub fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a specific fixture file
pub fn fixture(relative_path: &str) -> PathBuf {
    fixtures_path().join(relative_path)
}

/// Path of a file in the multi-ASIC fixture set
pub fn multi_npu(name: &str) -> PathBuf {
    fixtures_path().join("multi_npu").join(name)
}

/// The sample chassis minigraph
pub fn sample_minigraph() -> PathBuf {
    multi_npu("sample-minigraph.xml")
}

/// Port configuration file of one ASIC of the sample chassis
pub fn port_config_path(asic: u32) -> PathBuf {
    multi_npu(&format!("sample_port_config-{}.ini", asic))
}

/// Parsed sample chassis topology
pub fn sample_graph() -> Graph {
    cfggen::minigraph::load(&sample_minigraph()).unwrap()
}

/// Parsed port configuration of one ASIC
pub fn port_config(asic: u32) -> PortConfig {
    PortConfig::load(&port_config_path(asic)).unwrap()
}

/// Sub-roles the sample topology declares
pub fn sample_roles(graph: &Graph) -> RoleMap {
    RoleMap::from_topology(graph).unwrap()
}

/// Resolve one instance of a graph with the given roles and ports
pub fn resolve<'g>(
    graph: &'g Graph,
    roles: &'g RoleMap,
    ports: Option<&'g PortConfig>,
    selector: InstanceSelector,
) -> FilteredView<'g> {
    Resolver::new(roles)
        .with_port_config(ports)
        .resolve(graph, selector)
        .unwrap()
}

/// Helper to get a command for testing
pub fn cfggen_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cfggen").unwrap();
    // Keep a user or system configuration file out of the tests.
    cmd.env("CFGGEN_CONFIG", fixture("cfggen.toml"));
    cmd.env_remove("CFGGEN_MERGE_MODE");
    cmd.env_remove("CFGGEN_ROLE_MAP");
    cmd.env_remove("CFGGEN_JSON_INDENT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Command preloaded with the sample minigraph
pub fn minigraph_cmd() -> Command {
    let mut cmd = cfggen_cmd();
    cmd.arg("-m").arg(sample_minigraph());
    cmd
}

/// Run a command to success and return its stdout
pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

/// Run a command to success and parse its stdout as JSON
pub fn json_of(cmd: &mut Command) -> serde_json::Value {
    serde_json::from_str(&stdout_of(cmd)).unwrap()
}
