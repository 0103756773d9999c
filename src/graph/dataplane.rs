//! Per-device data-plane declarations, routing peerings and host-wide services.

/// A declared port-channel; members are topology interface names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortChannelDecl {
    pub name: String,
    pub members: Vec<String>,
    pub min_links: Option<u32>,
}

/// An address assigned to an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpInterfaceDecl {
    pub attach_to: String,
    pub prefix: String,
}

/// A management interface with its optional gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MgmtInterfaceDecl {
    pub attach_to: String,
    pub prefix: String,
    pub gateway: Option<String>,
}

/// Everything one device declares about its own data plane
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPlane {
    pub port_channels: Vec<PortChannelDecl>,
    pub ip_interfaces: Vec<IpInterfaceDecl>,
    pub loopbacks: Vec<IpInterfaceDecl>,
    pub mgmt_interfaces: Vec<MgmtInterfaceDecl>,
}

impl DataPlane {
    /// Name of the port-channel an interface belongs to, if any
    pub fn channel_of(&self, interface: &str) -> Option<&str> {
        self.port_channels
            .iter()
            .find(|pc| pc.members.iter().any(|m| m == interface))
            .map(|pc| pc.name.as_str())
    }
}

/// A BGP session between two routers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peering {
    pub start: super::DeviceId,
    pub start_addr: String,
    pub end: super::DeviceId,
    pub end_addr: String,
    pub holdtime: Option<String>,
    pub keepalive: Option<String>,
    pub rrclient: bool,
    pub nhopself: bool,
}

impl Peering {
    /// The session seen from `local`: (local address, peer, peer address)
    pub fn from_side(&self, local: super::DeviceId) -> Option<(&str, super::DeviceId, &str)> {
        if self.start == local {
            Some((&self.start_addr, self.end, &self.end_addr))
        } else if self.end == local {
            Some((&self.end_addr, self.start, &self.start_addr))
        } else {
            None
        }
    }
}

/// Host-wide services; only ever projected into the host scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalServices {
    pub ntp_servers: Vec<String>,
    pub syslog_servers: Vec<String>,
    pub dhcp_servers: Vec<String>,
    pub tacacs_servers: Vec<String>,
    pub deployment_id: Option<String>,
}
