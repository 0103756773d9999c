//! Configuration table builder.
//!
//! Turns a [`FilteredView`] into the logical configuration tables of one
//! instance. Every table the builder knows is always present in its output,
//! possibly as an empty mapping, so that probing a table that does not apply
//! to a scope yields `{}` rather than nothing.

mod interfaces;
mod metadata;
mod neighbors;
mod portchannel;
mod services;

use serde_json::{Map, Value};
use tracing::debug;

use crate::instance::FilteredView;
use crate::vars::ConfigContext;

pub const DEVICE_METADATA: &str = "DEVICE_METADATA";
pub const PORT: &str = "PORT";
pub const PORTCHANNEL: &str = "PORTCHANNEL";
pub const PORTCHANNEL_MEMBER: &str = "PORTCHANNEL_MEMBER";
pub const PORTCHANNEL_INTERFACE: &str = "PORTCHANNEL_INTERFACE";
pub const INTERFACE: &str = "INTERFACE";
pub const LOOPBACK_INTERFACE: &str = "LOOPBACK_INTERFACE";
pub const DEVICE_NEIGHBOR: &str = "DEVICE_NEIGHBOR";
pub const DEVICE_NEIGHBOR_METADATA: &str = "DEVICE_NEIGHBOR_METADATA";
pub const BGP_NEIGHBOR: &str = "BGP_NEIGHBOR";
pub const NTP_SERVER: &str = "NTP_SERVER";
pub const SYSLOG_SERVER: &str = "SYSLOG_SERVER";
pub const DHCP_SERVER: &str = "DHCP_SERVER";
pub const TACPLUS_SERVER: &str = "TACPLUS_SERVER";
pub const MGMT_PORT: &str = "MGMT_PORT";
pub const MGMT_INTERFACE: &str = "MGMT_INTERFACE";

/// Tables that only exist for the host scope
pub const GLOBAL_ONLY: [&str; 6] = [
    NTP_SERVER,
    SYSLOG_SERVER,
    DHCP_SERVER,
    TACPLUS_SERVER,
    MGMT_PORT,
    MGMT_INTERFACE,
];

/// One table: entry key to entry value
pub(crate) type Table = Map<String, Value>;

/// Build every configuration table of an instance
pub fn build(view: &FilteredView<'_>) -> ConfigContext {
    let mut context = ConfigContext::new();

    context.insert(DEVICE_METADATA.to_string(), Value::Object(metadata::device_metadata(view)));

    let channels = portchannel::PortChannels::collect(view);
    context.insert(PORTCHANNEL.to_string(), Value::Object(channels.table()));
    context.insert(PORTCHANNEL_MEMBER.to_string(), Value::Object(channels.members()));
    context.insert(PORTCHANNEL_INTERFACE.to_string(), Value::Object(channels.interfaces(view)));

    context.insert(PORT.to_string(), Value::Object(interfaces::ports(view)));
    context.insert(INTERFACE.to_string(), Value::Object(interfaces::ip_interfaces(view)));
    context.insert(LOOPBACK_INTERFACE.to_string(), Value::Object(interfaces::loopbacks(view)));

    context.insert(DEVICE_NEIGHBOR.to_string(), Value::Object(neighbors::device_neighbors(view)));
    context.insert(
        DEVICE_NEIGHBOR_METADATA.to_string(),
        Value::Object(neighbors::neighbor_metadata(view)),
    );
    context.insert(BGP_NEIGHBOR.to_string(), Value::Object(neighbors::bgp_neighbors(view)));

    for (name, table) in services::global_tables(view) {
        context.insert(name.to_string(), Value::Object(table));
    }

    debug!(
        instance = %view.selector(),
        tables = context.len(),
        "built configuration tables"
    );
    context
}

/// An entry with no attributes, `{}`
pub(crate) fn empty_entry() -> Value {
    Value::Object(Map::new())
}

/// A string value, or JSON null when absent
pub(crate) fn string_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A two-ASIC chassis shared by the table tests.

    use crate::graph::{
        DataPlane, Device, GlobalServices, Graph, GraphBuilder, IpInterfaceDecl,
        MgmtInterfaceDecl, PortChannelDecl, SubRole,
    };
    use crate::instance::RoleMap;
    use crate::ports::PortConfig;

    pub fn chassis() -> Graph {
        let mut b = GraphBuilder::new("chassis01", Some("sku".to_string()));
        b.add_device(Device::new("chassis01").with_type("LeafRouter"));
        let mut asic0 = Device::new("ASIC0").with_type("Asic").with_hwsku("npu");
        asic0.loopback = Some("0.0.0.0/0".to_string());
        asic0.mgmt_addr = Some("0.0.0.0/0".to_string());
        asic0.asn = Some("65100".to_string());
        b.add_device(asic0);
        let mut asic1 = Device::new("ASIC1").with_type("Asic").with_hwsku("npu");
        asic1.asn = Some("65100".to_string());
        b.add_device(asic1);
        let mut spine = Device::new("01T2").with_type("SpineRouter").with_hwsku("VM");
        spine.mgmt_addr = Some("89.139.132.40".to_string());
        spine.asn = Some("65200".to_string());
        b.add_device(spine);

        b.add_link("chassis01", "Ethernet1/1", "01T2", "Ethernet1", Some(40000));
        b.add_link("chassis01", "Ethernet1/2", "01T2", "Ethernet2", Some(40000));
        b.add_link("ASIC0", "Eth4-ASIC0", "ASIC1", "Eth0-ASIC1", None);
        b.add_link("ASIC0", "Eth5-ASIC0", "ASIC1", "Eth1-ASIC1", None);

        b.add_peering("01T2", "10.0.0.1", "ASIC0", "10.0.0.0", Some("10".into()), Some("3".into()), false, false);
        b.add_peering("01T2", "fc00::2", "ASIC0", "fc00::1", Some("10".into()), Some("3".into()), false, false);
        b.add_peering("ASIC1", "10.1.0.0", "ASIC0", "10.1.0.1", None, None, false, false);

        b.set_data_plane(
            "ASIC0",
            DataPlane {
                port_channels: vec![
                    PortChannelDecl {
                        name: "PortChannel0002".to_string(),
                        members: vec!["Ethernet1/1".to_string(), "Ethernet1/2".to_string()],
                        min_links: None,
                    },
                    PortChannelDecl {
                        name: "PortChannel4001".to_string(),
                        members: vec!["Eth4-ASIC0".to_string(), "Eth5-ASIC0".to_string()],
                        min_links: None,
                    },
                ],
                ip_interfaces: vec![
                    IpInterfaceDecl {
                        attach_to: "PortChannel0002".to_string(),
                        prefix: "10.0.0.0/31".to_string(),
                    },
                    IpInterfaceDecl {
                        attach_to: "PortChannel0002".to_string(),
                        prefix: "FC00::1/126".to_string(),
                    },
                    IpInterfaceDecl {
                        attach_to: "PortChannel4001".to_string(),
                        prefix: "10.1.0.1/31".to_string(),
                    },
                ],
                loopbacks: vec![IpInterfaceDecl {
                    attach_to: "Loopback0".to_string(),
                    prefix: "10.1.0.32/32".to_string(),
                }],
                mgmt_interfaces: Vec::new(),
            },
        );
        b.set_data_plane(
            "ASIC1",
            DataPlane {
                port_channels: vec![PortChannelDecl {
                    name: "PortChannel4009".to_string(),
                    members: vec!["Eth0-ASIC1".to_string(), "Eth1-ASIC1".to_string()],
                    min_links: Some(1),
                }],
                ..Default::default()
            },
        );
        b.set_data_plane(
            "chassis01",
            DataPlane {
                mgmt_interfaces: vec![MgmtInterfaceDecl {
                    attach_to: "eth0".to_string(),
                    prefix: "10.0.0.100/24".to_string(),
                    gateway: Some("10.0.0.1".to_string()),
                }],
                ..Default::default()
            },
        );
        b.set_services(GlobalServices {
            ntp_servers: vec!["17.39.1.129".to_string(), "17.39.1.130".to_string()],
            tacacs_servers: vec!["123.46.98.21".to_string()],
            deployment_id: Some("1".to_string()),
            ..Default::default()
        });
        b.build().unwrap()
    }

    pub fn roles() -> RoleMap {
        let mut map = RoleMap::new();
        map.insert("sku", 0, SubRole::FrontEnd);
        map.insert("sku", 1, SubRole::BackEnd);
        map
    }

    pub fn asic0_ports() -> PortConfig {
        PortConfig::parse(
            "\
# name          lanes        alias        index  asic_port_name
Ethernet0       33,34,35,36  Ethernet1/1  0      Eth0-ASIC0
Ethernet4       29,30,31,32  Ethernet1/2  1      Eth1-ASIC0
Ethernet-BP0    13,14,15,16  Eth4-ASIC0   2      Eth4-ASIC0
Ethernet-BP4    17,18,19,20  Eth5-ASIC0   3      Eth5-ASIC0
",
            "asic0.ini",
        )
        .unwrap()
    }

    pub fn asic1_ports() -> PortConfig {
        PortConfig::parse(
            "\
# name          lanes        alias        index  asic_port_name
Ethernet-BP256  1,2,3,4      Eth0-ASIC1   0      Eth0-ASIC1
Ethernet-BP260  5,6,7,8      Eth1-ASIC1   1      Eth1-ASIC1
",
            "asic1.ini",
        )
        .unwrap()
    }
}
