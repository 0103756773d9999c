//! Data merge and override layer.
//!
//! The configuration of one invocation is assembled from ordered layers:
//!
//! 1. tables derived from the topology
//! 2. the static port configuration
//! 3. YAML files (`-y`)
//! 4. JSON files (`-j`)
//! 5. inline JSON (`-a`)
//!
//! Layers are folded left to right over an empty context. In
//! [`MergeMode::Replace`] a later layer replaces whole top-level tables; in
//! [`MergeMode::Deep`] mappings are merged recursively. The `PORT` table is
//! always merged per port so that port attributes from several sources
//! combine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{read_source, Error, Result};
use crate::ports::PortConfig;
use crate::tables::PORT;

/// The merged key to value mapping handed to the output projector
pub type ConfigContext = IndexMap<String, Value>;

/// Source precedence levels (from lowest to highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SourcePrecedence {
    /// Tables built from the topology (lowest priority)
    Topology = 1,
    /// Static port configuration
    PortConfig = 2,
    /// YAML files (`-y`)
    YamlFile = 3,
    /// JSON files (`-j`)
    JsonFile = 4,
    /// Inline JSON (`-a`), highest priority
    InlineJson = 5,
}

impl SourcePrecedence {
    /// All precedence levels in order (lowest to highest)
    pub fn all() -> impl Iterator<Item = SourcePrecedence> {
        [
            SourcePrecedence::Topology,
            SourcePrecedence::PortConfig,
            SourcePrecedence::YamlFile,
            SourcePrecedence::JsonFile,
            SourcePrecedence::InlineJson,
        ]
        .into_iter()
    }
}

impl fmt::Display for SourcePrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourcePrecedence::Topology => "topology",
            SourcePrecedence::PortConfig => "port config",
            SourcePrecedence::YamlFile => "yaml file",
            SourcePrecedence::JsonFile => "json file",
            SourcePrecedence::InlineJson => "inline json",
        };
        write!(f, "{}", name)
    }
}

/// How a later layer combines with the tables already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Replace top-level tables entirely
    #[default]
    Replace,
    /// Merge mappings recursively
    Deep,
}

impl FromStr for MergeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(MergeMode::Replace),
            "deep" => Ok(MergeMode::Deep),
            other => Err(Error::config(format!(
                "unknown merge mode '{}', expected replace or deep",
                other
            ))),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Replace => write!(f, "replace"),
            MergeMode::Deep => write!(f, "deep"),
        }
    }
}

/// One override source
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub precedence: SourcePrecedence,
    /// Where the data came from, for diagnostics
    pub source: String,
    pub tables: ConfigContext,
}

impl Layer {
    pub fn new(precedence: SourcePrecedence, source: impl Into<String>, tables: ConfigContext) -> Self {
        Self {
            precedence,
            source: source.into(),
            tables,
        }
    }

    /// Tables built from the topology
    pub fn topology(tables: ConfigContext) -> Self {
        Self::new(SourcePrecedence::Topology, "topology", tables)
    }

    /// The `PORT` table of a port configuration file
    pub fn port_config(ports: &PortConfig, source: impl Into<String>) -> Self {
        let mut tables = ConfigContext::new();
        tables.insert(PORT.to_string(), ports.to_table());
        Self::new(SourcePrecedence::PortConfig, source, tables)
    }

    /// A YAML document whose top level is a mapping
    pub fn yaml_file(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let content = read_source(path)?;
        let value: Value = serde_yaml::from_str(&content).map_err(|e| Error::parse(&source, e))?;
        Ok(Self::new(
            SourcePrecedence::YamlFile,
            &source,
            Self::mapping(value, &source)?,
        ))
    }

    /// A JSON document whose top level is an object
    pub fn json_file(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let content = read_source(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| Error::parse(&source, e))?;
        Ok(Self::new(
            SourcePrecedence::JsonFile,
            &source,
            Self::mapping(value, &source)?,
        ))
    }

    /// JSON text given on the command line
    pub fn inline_json(text: &str) -> Result<Self> {
        let source = "additional data";
        let value: Value = serde_json::from_str(text).map_err(|e| Error::parse(source, e))?;
        Ok(Self::new(
            SourcePrecedence::InlineJson,
            source,
            Self::mapping(value, source)?,
        ))
    }

    fn mapping(value: Value, source: &str) -> Result<ConfigContext> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            // An empty document contributes nothing.
            Value::Null => Ok(ConfigContext::new()),
            other => Err(Error::parse(
                source,
                format!("top level must be a mapping, found {}", kind(&other)),
            )),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Ordered collection of layers
#[derive(Debug, Clone, Default)]
pub struct VarStore {
    layers: Vec<Layer>,
    mode: MergeMode,
}

impl VarStore {
    pub fn new(mode: MergeMode) -> Self {
        Self {
            layers: Vec::new(),
            mode,
        }
    }

    /// Add a layer; layers of equal precedence apply in insertion order
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Fold every layer, lowest precedence first, into one context
    pub fn merge(mut self) -> ConfigContext {
        // Stable: equal precedence keeps command-line order.
        self.layers.sort_by_key(|layer| layer.precedence);
        let mode = self.mode;
        self.layers.into_iter().fold(ConfigContext::new(), |context, layer| {
            debug!(
                source = %layer.source,
                precedence = %layer.precedence,
                tables = layer.tables.len(),
                mode = %mode,
                "applying override layer"
            );
            apply(context, layer.tables, mode)
        })
    }
}

/// Apply one layer's tables on top of `context`
pub fn apply(mut context: ConfigContext, tables: ConfigContext, mode: MergeMode) -> ConfigContext {
    for (key, value) in tables {
        let merged = match (context.get(&key), mode) {
            (Some(existing), MergeMode::Deep) => deep_merge(existing, &value),
            (Some(existing), MergeMode::Replace) if key == PORT => merge_entries(existing, &value),
            _ => value,
        };
        context.insert(key, merged);
    }
    context
}

/// Merge a table entry by entry, combining the attributes of shared entries
fn merge_entries(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (entry, attrs) in overlay_map {
                let value = match (base_map.get(entry), attrs) {
                    (Some(Value::Object(existing)), Value::Object(new)) => {
                        let mut combined = existing.clone();
                        combined.extend(new.clone());
                        Value::Object(combined)
                    }
                    _ => attrs.clone(),
                };
                merged.insert(entry.clone(), value);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Deep merge two JSON values
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if let Some(base_value) = base_map.get(key) {
                    merged.insert(key.clone(), deep_merge(base_value, value));
                } else {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Value::Object(merged)
        }
        // For non-mappings, overlay wins
        (_, overlay) => overlay.clone(),
    }
}
