//! Device definition for the topology graph.
//!
//! A device is anything with a hostname in the topology: the chassis
//! itself, its internal ASICs, and every external router it peers with.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DeviceId;

/// Device type as declared by the topology (`SpineRouter`, `Asic`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceType(String);

impl DeviceType {
    /// Type name used for internal processing ASICs.
    pub const ASIC: &'static str = "Asic";

    /// Create a device type from its topology name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether this is an internal ASIC
    pub fn is_asic(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::ASIC)
    }

    /// The type name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-role of an internal ASIC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubRole {
    /// Terminates external-facing links
    FrontEnd,
    /// Carries only back-plane links
    BackEnd,
}

impl SubRole {
    /// Name as written in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            SubRole::FrontEnd => "FrontEnd",
            SubRole::BackEnd => "BackEnd",
        }
    }
}

impl fmt::Display for SubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frontend" => Ok(SubRole::FrontEnd),
            "backend" => Ok(SubRole::BackEnd),
            other => Err(format!("unknown sub-role '{}'", other)),
        }
    }
}

/// A device in the topology
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// Hostname (unique within the graph)
    pub hostname: String,

    /// Declared type; `None` for devices only referenced by links or sessions
    pub device_type: Option<DeviceType>,

    /// Hardware SKU
    pub hwsku: Option<String>,

    /// Loopback address
    pub loopback: Option<String>,

    /// Management address
    pub mgmt_addr: Option<String>,

    /// BGP autonomous system number from the router declaration
    pub asn: Option<String>,

    /// Free-form metadata properties
    pub properties: IndexMap<String, String>,

    /// Owning chassis for internal ASICs
    pub parent: Option<DeviceId>,
}

impl Device {
    /// Create an untyped device
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            device_type: None,
            hwsku: None,
            loopback: None,
            mgmt_addr: None,
            asn: None,
            properties: IndexMap::new(),
            parent: None,
        }
    }

    /// Set the device type
    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(DeviceType::new(device_type));
        self
    }

    /// Set the hardware SKU
    pub fn with_hwsku(mut self, hwsku: impl Into<String>) -> Self {
        self.hwsku = Some(hwsku.into());
        self
    }

    /// Whether the device is an internal ASIC
    pub fn is_asic(&self) -> bool {
        self.device_type.as_ref().map_or(false, DeviceType::is_asic)
    }

    /// Index of an internal ASIC, taken from the trailing digits of its hostname
    pub fn asic_index(&self) -> Option<u32> {
        if !self.is_asic() {
            return None;
        }
        let digits: String = self
            .hostname
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        digits.parse().ok()
    }

    /// Get a metadata property
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Fill in whatever `other` declares and this device lacks
    pub(crate) fn absorb(&mut self, other: Device) {
        if other.device_type.is_some() {
            self.device_type = other.device_type;
        }
        self.hwsku = other.hwsku.or(self.hwsku.take());
        self.loopback = other.loopback.or(self.loopback.take());
        self.mgmt_addr = other.mgmt_addr.or(self.mgmt_addr.take());
        self.asn = other.asn.or(self.asn.take());
        self.properties.extend(other.properties);
    }
}
