//! Instance resolution.
//!
//! A multi-ASIC chassis is configured as several instances: the host and one
//! per internal ASIC. [`Resolver::resolve`] derives the part of the topology
//! one instance may see, without modifying the graph:
//!
//! - **host**: every device of the chassis is local; visible links and
//!   peerings are the ones leaving the chassis.
//! - **asic<N>**: only ASIC N is local, plus the front-panel ports its
//!   port configuration claims. Visible links are its back-plane links and
//!   the front-panel links on claimed ports; host-wide services are hidden.

pub mod roles;

pub use roles::{RoleMap, SubRoleLookup};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{
    DataPlane, Device, DeviceId, Endpoint, GlobalServices, Graph, Link, LinkKind, Peering,
    SubRole,
};
use crate::ports::PortConfig;

/// Which instance a configuration is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstanceSelector {
    /// The chassis as a whole
    #[default]
    Host,
    /// One internal ASIC, by zero-based index
    Asic(u32),
}

impl InstanceSelector {
    pub fn is_host(&self) -> bool {
        matches!(self, InstanceSelector::Host)
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceSelector::Host => write!(f, "host"),
            InstanceSelector::Asic(index) => write!(f, "asic{}", index),
        }
    }
}

impl FromStr for InstanceSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.is_empty() || lower == "host" {
            return Ok(InstanceSelector::Host);
        }
        lower
            .strip_prefix("asic")
            .and_then(|n| n.parse::<u32>().ok())
            .map(InstanceSelector::Asic)
            .ok_or_else(|| Error::config(format!("invalid instance '{}', expected asic<N>", s)))
    }
}

/// A link seen from inside an instance
#[derive(Debug, Clone, Copy)]
pub struct LocalLink<'g> {
    pub local: &'g Endpoint,
    pub remote: &'g Endpoint,
    pub link: &'g Link,
}

/// A peering seen from inside an instance
#[derive(Debug, Clone, Copy)]
pub struct LocalPeering<'g> {
    pub local_addr: &'g str,
    pub peer: DeviceId,
    pub peer_addr: &'g str,
    pub peering: &'g Peering,
}

/// The part of a [`Graph`] visible to one instance
#[derive(Debug)]
pub struct FilteredView<'g> {
    graph: &'g Graph,
    selector: InstanceSelector,
    local: DeviceId,
    sub_role: Option<SubRole>,
    ports: Option<&'g PortConfig>,
    links: Vec<LocalLink<'g>>,
    peerings: Vec<LocalPeering<'g>>,
    /// Topology interface names local to the instance; `None` means unrestricted
    local_ports: Option<HashSet<&'g str>>,
}

impl<'g> FilteredView<'g> {
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn selector(&self) -> InstanceSelector {
        self.selector
    }

    /// The instance's own device: the chassis or the ASIC
    pub fn local_device(&self) -> &'g Device {
        self.graph.device(self.local)
    }

    /// Hostname the instance reports for itself
    pub fn hostname(&self) -> String {
        match self.selector {
            InstanceSelector::Host => self.graph.host_device().hostname.clone(),
            asic => asic.to_string(),
        }
    }

    pub fn sub_role(&self) -> Option<SubRole> {
        self.sub_role
    }

    /// The instance's own data-plane declaration
    pub fn data_plane(&self) -> Option<&'g DataPlane> {
        self.graph.data_plane(self.local)
    }

    /// Links with exactly one endpoint inside the instance
    pub fn links(&self) -> &[LocalLink<'g>] {
        &self.links
    }

    /// Peerings with exactly one router inside the instance
    pub fn peerings(&self) -> &[LocalPeering<'g>] {
        &self.peerings
    }

    /// Distinct remote devices of the visible links, in first-seen order
    pub fn neighbors(&self) -> Vec<DeviceId> {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .map(|l| l.remote.device)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Host-wide services; hidden from ASIC instances
    pub fn global_services(&self) -> Option<&'g GlobalServices> {
        self.selector.is_host().then(|| self.graph.services())
    }

    /// Configured port name of a topology interface
    pub fn port_name(&self, alias: &str) -> String {
        self.ports
            .and_then(|p| p.port_name(alias))
            .unwrap_or(alias)
            .to_string()
    }

    /// Whether a topology interface name is inside the instance
    pub fn is_local_port(&self, alias: &str) -> bool {
        self.local_ports
            .as_ref()
            .map_or(true, |ports| ports.contains(alias))
    }
}

/// Computes [`FilteredView`]s
pub struct Resolver<'a> {
    roles: &'a dyn SubRoleLookup,
    ports: Option<&'a PortConfig>,
}

impl<'a> Resolver<'a> {
    pub fn new(roles: &'a dyn SubRoleLookup) -> Self {
        Self { roles, ports: None }
    }

    /// Use an instance-specific port configuration for naming and port ownership
    pub fn with_port_config(mut self, ports: Option<&'a PortConfig>) -> Self {
        self.ports = ports;
        self
    }

    /// Derive the view of `selector` over `graph`
    pub fn resolve<'g>(&self, graph: &'g Graph, selector: InstanceSelector) -> Result<FilteredView<'g>>
    where
        'a: 'g,
    {
        let (local, sub_role) = match selector {
            InstanceSelector::Host => {
                let role = graph
                    .host_device()
                    .property("SubRole")
                    .and_then(|r| r.parse().ok());
                (graph.host(), role)
            }
            InstanceSelector::Asic(index) => {
                let id = graph.asic(index).ok_or_else(|| {
                    Error::config(format!(
                        "{} is not declared in the topology of {}",
                        selector,
                        graph.host_device().hostname
                    ))
                })?;
                let hwsku = graph.hwsku().ok_or_else(|| {
                    Error::config("chassis declares no HwSku, cannot map ASIC sub-roles")
                })?;
                let role = self.roles.sub_role(hwsku, index).ok_or_else(|| {
                    Error::config(format!("no sub-role mapping for {} asic{}", hwsku, index))
                })?;
                (id, Some(role))
            }
        };

        let in_scope: HashSet<DeviceId> = match selector {
            InstanceSelector::Host => std::iter::once(graph.host()).chain(graph.asics()).collect(),
            InstanceSelector::Asic(_) => std::iter::once(local).collect(),
        };

        let is_local = |ep: &Endpoint| {
            in_scope.contains(&ep.device)
                || (ep.device == graph.host()
                    && !selector.is_host()
                    && self.ports.map_or(false, |p| p.owns(&ep.port)))
        };

        let mut links = Vec::new();
        for link in graph.links() {
            match (is_local(&link.start), is_local(&link.end)) {
                (true, false) => links.push(LocalLink {
                    local: &link.start,
                    remote: &link.end,
                    link,
                }),
                (false, true) => links.push(LocalLink {
                    local: &link.end,
                    remote: &link.start,
                    link,
                }),
                _ => (),
            }
        }

        let mut peerings = Vec::new();
        for peering in graph.peerings() {
            let start = in_scope.contains(&peering.start);
            let end = in_scope.contains(&peering.end);
            if start == end {
                continue;
            }
            let side = if start { peering.start } else { peering.end };
            if let Some((local_addr, peer, peer_addr)) = peering.from_side(side) {
                peerings.push(LocalPeering {
                    local_addr,
                    peer,
                    peer_addr,
                    peering,
                });
            }
        }

        let local_ports = match (selector, self.ports) {
            (InstanceSelector::Host, None) => None,
            (_, ports) => {
                let mut set: HashSet<&'g str> = links.iter().map(|l| l.local.port.as_str()).collect();
                if let (Some(ports), Some(dp)) = (ports, graph.data_plane(local)) {
                    for member in dp.port_channels.iter().flat_map(|pc| pc.members.iter()) {
                        if ports.owns(member) {
                            set.insert(member.as_str());
                        }
                    }
                    for ip in &dp.ip_interfaces {
                        if ports.owns(&ip.attach_to) {
                            set.insert(ip.attach_to.as_str());
                        }
                    }
                }
                Some(set)
            }
        };

        if !selector.is_host() && self.ports.is_none() {
            warn!(instance = %selector, "no port configuration given, front-panel ports cannot be attributed");
        }

        debug!(
            instance = %selector,
            device = %graph.device(local).hostname,
            links = links.len(),
            internal = links.iter().filter(|l| l.link.kind == LinkKind::Internal).count(),
            peerings = peerings.len(),
            "resolved instance view"
        );

        Ok(FilteredView {
            graph,
            selector,
            local,
            sub_role,
            ports: self.ports,
            links,
            peerings,
            local_ports,
        })
    }
}
