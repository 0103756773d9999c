//! Links between devices and the interface naming rules that classify them.

use once_cell::sync::Lazy;
use regex::Regex;

use super::DeviceId;

/// Back-plane interface names: `Ethernet-BP<n>` once translated to port
/// names, `Eth<n>-ASIC<m>` as written in the topology.
static BACKPLANE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Ethernet-BP\d+|Eth\d+-ASIC\d+)$").expect("back-plane pattern is valid")
});

/// Classification of an interface by its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// Faces outside the chassis
    FrontPanel,
    /// Connects two ASICs inside the chassis
    BackPlane,
}

impl InterfaceKind {
    /// Classify an interface name
    pub fn of(name: &str) -> Self {
        if BACKPLANE_NAME.is_match(name) {
            InterfaceKind::BackPlane
        } else {
            InterfaceKind::FrontPanel
        }
    }
}

/// One side of a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub device: DeviceId,
    /// Interface name as written in the topology
    pub port: String,
}

impl Endpoint {
    pub fn new(device: DeviceId, port: impl Into<String>) -> Self {
        Self {
            device,
            port: port.into(),
        }
    }
}

/// Whether a link stays inside the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    External,
    Internal,
}

impl LinkKind {
    /// Classify a link by its port names; one back-plane port makes it internal
    pub fn between(start_port: &str, end_port: &str) -> Self {
        if InterfaceKind::of(start_port) == InterfaceKind::BackPlane
            || InterfaceKind::of(end_port) == InterfaceKind::BackPlane
        {
            LinkKind::Internal
        } else {
            LinkKind::External
        }
    }
}

/// A physical link between two endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub start: Endpoint,
    pub end: Endpoint,
    /// Shared link bandwidth (Mbps)
    pub bandwidth: Option<u64>,
    pub kind: LinkKind,
}
