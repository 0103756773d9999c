//! Strongly typed topology graph.
//!
//! Devices live in an arena and are referred to by [`DeviceId`]; links and
//! peerings store ids rather than references, so the graph has no cyclic
//! ownership and can be borrowed freely by per-instance views.
//!
//! The graph is built once per invocation through [`GraphBuilder`], which
//! validates the structural invariants before handing out a [`Graph`]:
//! every back-plane link must join two declared internal ASICs.

pub mod dataplane;
pub mod device;
pub mod link;

pub use dataplane::{
    DataPlane, GlobalServices, IpInterfaceDecl, MgmtInterfaceDecl, Peering, PortChannelDecl,
};
pub use device::{Device, DeviceType, SubRole};
pub use link::{Endpoint, InterfaceKind, Link, LinkKind};

use std::collections::HashMap;
use tracing::debug;

use crate::error::{Error, Result};

/// Stable identifier of a device within one [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub(crate) usize);

/// The parsed topology of one chassis and its neighbors
#[derive(Debug, Clone)]
pub struct Graph {
    host: DeviceId,
    hwsku: Option<String>,
    devices: Vec<Device>,
    by_name: HashMap<String, DeviceId>,
    links: Vec<Link>,
    peerings: Vec<Peering>,
    data_planes: HashMap<DeviceId, DataPlane>,
    services: GlobalServices,
}

impl Graph {
    /// The chassis itself
    pub fn host(&self) -> DeviceId {
        self.host
    }

    /// The chassis device
    pub fn host_device(&self) -> &Device {
        self.device(self.host)
    }

    /// Hardware SKU of the chassis
    pub fn hwsku(&self) -> Option<&str> {
        self.hwsku.as_deref()
    }

    /// Look up a device by id
    pub fn device(&self, id: DeviceId) -> &Device {
        &self.devices[id.0]
    }

    /// Find a device by exact hostname
    pub fn find(&self, hostname: &str) -> Option<DeviceId> {
        self.by_name.get(hostname).copied()
    }

    /// All devices with their ids
    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter().enumerate().map(|(i, d)| (DeviceId(i), d))
    }

    /// Internal ASICs of the chassis, ordered by index
    pub fn asics(&self) -> Vec<DeviceId> {
        let mut asics: Vec<_> = self
            .devices()
            .filter(|(_, d)| d.parent == Some(self.host))
            .map(|(id, d)| (d.asic_index(), id))
            .collect();
        asics.sort();
        asics.into_iter().map(|(_, id)| id).collect()
    }

    /// The internal ASIC with the given index
    pub fn asic(&self, index: u32) -> Option<DeviceId> {
        self.asics()
            .into_iter()
            .find(|id| self.device(*id).asic_index() == Some(index))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn peerings(&self) -> &[Peering] {
        &self.peerings
    }

    /// Data-plane declaration of a device
    pub fn data_plane(&self, id: DeviceId) -> Option<&DataPlane> {
        self.data_planes.get(&id)
    }

    /// Host-wide services
    pub fn services(&self) -> &GlobalServices {
        &self.services
    }
}

/// Incremental construction of a [`Graph`]
#[derive(Debug)]
pub struct GraphBuilder {
    graph: Graph,
    pending_links: Vec<(String, String, String, String, Option<u64>)>,
}

impl GraphBuilder {
    /// Start a graph for the chassis `hostname`
    pub fn new(hostname: impl Into<String>, hwsku: Option<String>) -> Self {
        let hostname = hostname.into();
        let mut host = Device::new(hostname.clone());
        host.hwsku = hwsku.clone();

        let mut by_name = HashMap::new();
        by_name.insert(hostname, DeviceId(0));

        Self {
            graph: Graph {
                host: DeviceId(0),
                hwsku,
                devices: vec![host],
                by_name,
                links: Vec::new(),
                peerings: Vec::new(),
                data_planes: HashMap::new(),
                services: GlobalServices::default(),
            },
            pending_links: Vec::new(),
        }
    }

    /// Declare a device, merging with any earlier declaration of the same name
    pub fn add_device(&mut self, device: Device) -> DeviceId {
        if let Some(id) = self.graph.find(&device.hostname) {
            self.graph.devices[id.0].absorb(device);
            return id;
        }
        let id = DeviceId(self.graph.devices.len());
        self.graph.by_name.insert(device.hostname.clone(), id);
        self.graph.devices.push(device);
        id
    }

    /// Id of a device, adding an untyped placeholder if it was never declared
    pub fn device_id(&mut self, hostname: &str) -> DeviceId {
        match self.graph.find(hostname) {
            Some(id) => id,
            None => self.add_device(Device::new(hostname)),
        }
    }

    /// Mutable access to a declared device
    pub fn device_mut(&mut self, hostname: &str) -> &mut Device {
        let id = self.device_id(hostname);
        &mut self.graph.devices[id.0]
    }

    /// Record a link; endpoints are resolved when the graph is finished
    pub fn add_link(
        &mut self,
        start_device: impl Into<String>,
        start_port: impl Into<String>,
        end_device: impl Into<String>,
        end_port: impl Into<String>,
        bandwidth: Option<u64>,
    ) {
        self.pending_links.push((
            start_device.into(),
            start_port.into(),
            end_device.into(),
            end_port.into(),
            bandwidth,
        ));
    }

    /// Record a routing session between two routers
    #[allow(clippy::too_many_arguments)]
    pub fn add_peering(
        &mut self,
        start_router: &str,
        start_addr: impl Into<String>,
        end_router: &str,
        end_addr: impl Into<String>,
        holdtime: Option<String>,
        keepalive: Option<String>,
        rrclient: bool,
        nhopself: bool,
    ) {
        let start = self.device_id(start_router);
        let end = self.device_id(end_router);
        self.graph.peerings.push(Peering {
            start,
            start_addr: start_addr.into(),
            end,
            end_addr: end_addr.into(),
            holdtime,
            keepalive,
            rrclient,
            nhopself,
        });
    }

    /// Attach a data-plane declaration to a device
    pub fn set_data_plane(&mut self, hostname: &str, data_plane: DataPlane) {
        let id = self.device_id(hostname);
        self.graph.data_planes.insert(id, data_plane);
    }

    /// Set the host-wide services
    pub fn set_services(&mut self, services: GlobalServices) {
        self.graph.services = services;
    }

    /// Validate and finish the graph
    pub fn build(mut self) -> Result<Graph> {
        let host = self.graph.host;

        // Internal ASICs belong to the chassis.
        for device in &mut self.graph.devices {
            if device.is_asic() {
                device.parent = Some(host);
            }
        }

        for (start_device, start_port, end_device, end_port, bandwidth) in
            std::mem::take(&mut self.pending_links)
        {
            let kind = LinkKind::between(&start_port, &end_port);
            let start = self.resolve_endpoint(&start_device, kind, &start_port)?;
            let end = self.resolve_endpoint(&end_device, kind, &end_port)?;

            self.graph.links.push(Link {
                start: Endpoint::new(start, start_port),
                end: Endpoint::new(end, end_port),
                bandwidth,
                kind,
            });
        }

        debug!(
            devices = self.graph.devices.len(),
            links = self.graph.links.len(),
            peerings = self.graph.peerings.len(),
            "topology graph built"
        );

        Ok(self.graph)
    }

    fn resolve_endpoint(&mut self, hostname: &str, kind: LinkKind, port: &str) -> Result<DeviceId> {
        if kind == LinkKind::External {
            return Ok(self.device_id(hostname));
        }
        match self.graph.find(hostname) {
            Some(id) if self.graph.device(id).is_asic() => Ok(id),
            _ => Err(Error::config(format!(
                "internal link endpoint {}:{} is not a declared internal ASIC",
                hostname, port
            ))),
        }
    }
}
