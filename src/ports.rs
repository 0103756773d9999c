//! Static port configuration (`port_config.ini`).
//!
//! The file is a whitespace-separated table. An optional leading comment
//! names the columns:
//!
//! ```text
//! # name          lanes         alias        index  asic_port_name  role
//! Ethernet0       33,34,35,36   Ethernet1/1  0      Eth0-ASIC0      Ext
//! Ethernet-BP0    13,14,15,16   Eth4-ASIC0   4      Eth4-ASIC0      Int
//! ```
//!
//! Without a header the columns are `name lanes alias index`.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{read_source, Error, Result};

const DEFAULT_COLUMNS: [&str; 4] = ["name", "lanes", "alias", "index"];

/// Parsed port configuration of one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortConfig {
    /// Port name to its attributes, in file order
    ports: IndexMap<String, IndexMap<String, String>>,
    /// Topology interface name to port name
    aliases: HashMap<String, String>,
}

impl PortConfig {
    /// Load a port configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_source(path)?;
        let config = Self::parse(&content, &path.display().to_string())?;
        debug!(path = %path.display(), ports = config.len(), "loaded port config");
        Ok(config)
    }

    /// Parse port configuration text; `source_name` is used in error messages
    pub fn parse(content: &str, source_name: &str) -> Result<Self> {
        let mut columns: Option<Vec<String>> = None;
        let mut config = PortConfig::default();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                // Only a comment before the first row can be the header.
                if columns.is_none() && config.ports.is_empty() {
                    let names: Vec<String> =
                        comment.split_whitespace().map(String::from).collect();
                    if !names.is_empty() {
                        if !names.iter().any(|n| n == "name") {
                            return Err(Error::parse(
                                source_name,
                                format!("line {}: header has no 'name' column", lineno + 1),
                            ));
                        }
                        columns = Some(names);
                    }
                }
                continue;
            }

            let columns =
                columns.get_or_insert_with(|| DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect());
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != columns.len() {
                return Err(Error::parse(
                    source_name,
                    format!(
                        "line {}: expected {} fields, found {}",
                        lineno + 1,
                        columns.len(),
                        fields.len()
                    ),
                ));
            }

            let mut attrs: IndexMap<String, String> = columns
                .iter()
                .cloned()
                .zip(fields.iter().map(|f| f.to_string()))
                .collect();
            let Some(name) = attrs.shift_remove("name") else {
                continue;
            };

            if let Some(alias) = attrs.get("alias") {
                config.aliases.insert(alias.clone(), name.clone());
            }
            if let Some(asic_name) = attrs.get("asic_port_name") {
                config.aliases.entry(asic_name.clone()).or_insert_with(|| name.clone());
            }
            config.ports.insert(name, attrs);
        }

        Ok(config)
    }

    /// Number of ports
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether the file declared no ports
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Port name for a topology interface name
    pub fn port_name(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Whether a topology interface name belongs to this configuration
    pub fn owns(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias) || self.ports.contains_key(alias)
    }

    /// Port attributes by port name
    pub fn port(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.ports.get(name)
    }

    /// The `PORT` table contributed by this file
    pub fn to_table(&self) -> Value {
        let table: Map<String, Value> = self
            .ports
            .iter()
            .map(|(name, attrs)| {
                let entry: Map<String, Value> = attrs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                (name.clone(), Value::Object(entry))
            })
            .collect();
        Value::Object(table)
    }
}
