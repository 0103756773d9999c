//! Sub-role lookup for internal ASICs.
//!
//! Whether an ASIC is front-end or back-end is a property of the hardware
//! platform, so the mapping is keyed by the chassis hardware SKU and the
//! ASIC index. The table is data: adding a device family means adding
//! entries, not code.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use crate::error::{read_source, Error, Result};
use crate::graph::{Graph, SubRole};

/// Anything that can answer "what sub-role does ASIC `index` of `hwsku` have"
pub trait SubRoleLookup {
    fn sub_role(&self, hwsku: &str, index: u32) -> Option<SubRole>;
}

/// Sub-role table keyed by hardware SKU, then ASIC index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMap {
    entries: HashMap<String, BTreeMap<u32, SubRole>>,
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the sub-role of one ASIC
    pub fn insert(&mut self, hwsku: impl Into<String>, index: u32, role: SubRole) {
        self.entries.entry(hwsku.into()).or_default().insert(index, role);
    }

    /// Sub-roles the topology itself declares through `SubRole` metadata on
    /// its ASIC devices, keyed by the chassis SKU
    pub fn from_topology(graph: &Graph) -> Result<Self> {
        let mut map = Self::new();
        let Some(hwsku) = graph.hwsku() else {
            return Ok(map);
        };

        for id in graph.asics() {
            let device = graph.device(id);
            if let (Some(index), Some(role)) = (device.asic_index(), device.property("SubRole")) {
                let role = role.parse::<SubRole>().map_err(|e| {
                    Error::config(format!("{} declares an invalid SubRole: {}", device.hostname, e))
                })?;
                map.insert(hwsku, index, role);
            }
        }
        Ok(map)
    }

    /// Load a YAML role-map file of the form `{ <hwsku>: { <index>: FrontEnd|BackEnd } }`
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_source(path)?;
        let source = path.display().to_string();
        let raw: IndexMap<String, BTreeMap<u32, String>> =
            serde_yaml::from_str(&content).map_err(|e| Error::parse(&source, e))?;

        let mut map = Self::new();
        for (hwsku, indices) in raw {
            for (index, role) in indices {
                let role = role.parse::<SubRole>().map_err(|e| {
                    Error::config(format!("{}: {} asic{}: {}", source, hwsku, index, e))
                })?;
                map.insert(hwsku.clone(), index, role);
            }
        }
        debug!(path = %path.display(), skus = map.entries.len(), "loaded role map");
        Ok(map)
    }

    /// Overlay another table; its entries win
    pub fn extend(&mut self, other: RoleMap) {
        for (hwsku, indices) in other.entries {
            self.entries.entry(hwsku).or_default().extend(indices);
        }
    }
}

impl SubRoleLookup for RoleMap {
    fn sub_role(&self, hwsku: &str, index: u32) -> Option<SubRole> {
        self.entries.get(hwsku).and_then(|m| m.get(&index)).copied()
    }
}
