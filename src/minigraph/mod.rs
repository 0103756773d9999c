//! Minigraph topology loader.
//!
//! Reads a minigraph XML document into a [`Graph`]. Only the sections the
//! configuration tables need are interpreted:
//!
//! - `PngDec`: devices and physical links
//! - `CpgDec`: BGP sessions and router declarations
//! - `DpgDec`: per-device port-channels, IP, loopback and management interfaces
//! - `MetadataDeclaration`: per-device properties, including host services
//!
//! Everything else in the document is ignored.

pub mod tree;

use std::path::Path;
use tracing::info;

use crate::error::{read_source, Error, Result};
use crate::graph::{
    DataPlane, Device, GlobalServices, Graph, GraphBuilder, IpInterfaceDecl, MgmtInterfaceDecl,
    PortChannelDecl,
};
use tree::Element;

/// Load a minigraph file
pub fn load(path: &Path) -> Result<Graph> {
    let content = read_source(path)?;
    let graph = parse_str(&content, &path.display().to_string())?;
    info!(
        path = %path.display(),
        host = %graph.host_device().hostname,
        asics = graph.asics().len(),
        "loaded minigraph"
    );
    Ok(graph)
}

/// Parse minigraph XML; `source_name` is used in error messages
pub fn parse_str(content: &str, source_name: &str) -> Result<Graph> {
    let root = Element::parse(content).map_err(|e| Error::parse(source_name, e))?;

    let hostname = root
        .child_text("Hostname")
        .ok_or_else(|| Error::parse(source_name, "missing top-level Hostname"))?;
    let hwsku = root.child_text("HwSku").map(String::from);

    let mut builder = GraphBuilder::new(hostname, hwsku);

    parse_devices(&root, &mut builder);
    parse_routers(&root, &mut builder);
    parse_metadata(&root, &mut builder);
    parse_links(&root, &mut builder, source_name)?;
    parse_sessions(&root, &mut builder, source_name)?;
    parse_data_planes(&root, &mut builder, source_name)?;

    let services = host_services(&root, hostname);
    builder.set_services(services);

    builder.build()
}

fn parse_devices(root: &Element, builder: &mut GraphBuilder) {
    for el in root.collect(&["PngDec", "Devices", "Device"]) {
        let Some(hostname) = el.child_text("Hostname") else {
            continue;
        };
        let mut device = Device::new(hostname);
        if let Some(device_type) = el.attribute("type") {
            device = device.with_type(device_type);
        }
        device.hwsku = el.child_text("HwSku").map(String::from);
        device.loopback = el
            .path(&["Address", "IPPrefix"])
            .map(|p| p.text.trim().to_string());
        device.mgmt_addr = el
            .path(&["ManagementAddress", "IPPrefix"])
            .map(|p| p.text.trim().to_string());
        builder.add_device(device);
    }
}

fn parse_routers(root: &Element, builder: &mut GraphBuilder) {
    for el in root.collect(&["CpgDec", "Routers", "BGPRouterDeclaration"]) {
        if let (Some(hostname), Some(asn)) = (el.child_text("Hostname"), el.child_text("ASN")) {
            builder.device_mut(hostname).asn = Some(asn.to_string());
        }
    }
}

fn parse_metadata(root: &Element, builder: &mut GraphBuilder) {
    for el in root.collect(&["MetadataDeclaration", "Devices", "DeviceMetadata"]) {
        let Some(name) = el.child_text("Name") else {
            continue;
        };
        for prop in el.collect(&["Properties", "DeviceProperty"]) {
            if let Some(key) = prop.child_text("Name") {
                let value = prop.child_text("Value").unwrap_or_default();
                builder
                    .device_mut(name)
                    .properties
                    .insert(key.to_string(), value.to_string());
            }
        }
    }
}

fn parse_links(root: &Element, builder: &mut GraphBuilder, source_name: &str) -> Result<()> {
    for el in root.collect(&["PngDec", "DeviceInterfaceLinks", "DeviceLinkBase"]) {
        let field = |name: &str| {
            el.child_text(name).ok_or_else(|| {
                Error::parse(source_name, format!("DeviceLinkBase without {}", name))
            })
        };
        let bandwidth = match el.child_text("Bandwidth") {
            Some(b) => Some(b.parse::<u64>().map_err(|_| {
                Error::parse(source_name, format!("invalid link Bandwidth '{}'", b))
            })?),
            None => None,
        };
        builder.add_link(
            field("StartDevice")?,
            field("StartPort")?,
            field("EndDevice")?,
            field("EndPort")?,
            bandwidth,
        );
    }
    Ok(())
}

fn parse_sessions(root: &Element, builder: &mut GraphBuilder, source_name: &str) -> Result<()> {
    for el in root.collect(&["CpgDec", "PeeringSessions", "BGPSession"]) {
        let field = |name: &str| {
            el.child_text(name)
                .ok_or_else(|| Error::parse(source_name, format!("BGPSession without {}", name)))
        };
        builder.add_peering(
            field("StartRouter")?,
            field("StartPeer")?.to_ascii_lowercase(),
            field("EndRouter")?,
            field("EndPeer")?.to_ascii_lowercase(),
            el.child_text("HoldTime").map(String::from),
            el.child_text("KeepAliveTime").map(String::from),
            flag(el.child_text("RRClient")),
            flag(el.child_text("NextHopSelf")),
        );
    }
    Ok(())
}

fn parse_data_planes(root: &Element, builder: &mut GraphBuilder, source_name: &str) -> Result<()> {
    for el in root.collect(&["DpgDec", "DeviceDataPlaneInfo"]) {
        let hostname = el.child_text("Hostname").ok_or_else(|| {
            Error::parse(source_name, "DeviceDataPlaneInfo without Hostname")
        })?;

        let mut dp = DataPlane::default();

        for pc in el.collect(&["PortChannelInterfaces", "PortChannel"]) {
            let Some(name) = pc.child_text("Name") else {
                continue;
            };
            let min_links = match pc.child_text("MinLinks") {
                Some(m) => Some(m.parse::<u32>().map_err(|_| {
                    Error::parse(source_name, format!("invalid MinLinks '{}' on {}", m, name))
                })?),
                None => None,
            };
            dp.port_channels.push(PortChannelDecl {
                name: name.to_string(),
                members: split_list(pc.child_text("AttachTo")),
                min_links,
            });
        }

        for ip in el.collect(&["IPInterfaces", "IPInterface"]) {
            if let (Some(attach_to), Some(prefix)) = (ip.child_text("AttachTo"), prefix_of(ip)) {
                dp.ip_interfaces.push(IpInterfaceDecl {
                    attach_to: attach_to.to_string(),
                    prefix: prefix.to_string(),
                });
            }
        }

        for lo in el.collect(&["LoopbackIPInterfaces", "LoopbackIPInterface"]) {
            if let (Some(attach_to), Some(prefix)) = (lo.child_text("AttachTo"), prefix_of(lo)) {
                dp.loopbacks.push(IpInterfaceDecl {
                    attach_to: attach_to.to_string(),
                    prefix: prefix.to_string(),
                });
            }
        }

        for mgmt in el.collect(&["ManagementIPInterfaces", "ManagementIPInterface"]) {
            if let (Some(attach_to), Some(prefix)) = (mgmt.child_text("AttachTo"), prefix_of(mgmt)) {
                dp.mgmt_interfaces.push(MgmtInterfaceDecl {
                    attach_to: attach_to.to_string(),
                    prefix: prefix.to_string(),
                    gateway: mgmt.child_text("Gateway").map(String::from),
                });
            }
        }

        builder.set_data_plane(hostname, dp);
    }
    Ok(())
}

/// Host services are properties of the chassis' own metadata entry
fn host_services(root: &Element, hostname: &str) -> GlobalServices {
    let host_meta = root
        .collect(&["MetadataDeclaration", "Devices", "DeviceMetadata"])
        .into_iter()
        .find(|el| el.child_text("Name") == Some(hostname));

    let mut services = GlobalServices::default();
    let Some(meta) = host_meta else {
        return services;
    };

    for prop in meta.collect(&["Properties", "DeviceProperty"]) {
        let value = prop.child_text("Value");
        match prop.child_text("Name") {
            Some("NtpResources") => services.ntp_servers = split_list(value),
            Some("SyslogResources") => services.syslog_servers = split_list(value),
            Some("DhcpResources") => services.dhcp_servers = split_list(value),
            Some("TacacsServer") => services.tacacs_servers = split_list(value),
            Some("DeploymentId") => services.deployment_id = value.map(String::from),
            _ => (),
        }
    }
    services
}

/// Prefix of an interface element, in any of the spellings minigraph uses
fn prefix_of(el: &Element) -> Option<&str> {
    el.child_text("PrefixStr")
        .or_else(|| {
            el.path(&["Prefix", "IPPrefix"])
                .map(|p| p.text.trim())
                .filter(|t| !t.is_empty())
        })
        .or_else(|| el.child_text("Prefix"))
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split([';', ','])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::to_ascii_lowercase).as_deref(), Some("true" | "1" | "yes"))
}
