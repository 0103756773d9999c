//! `PORT`, `INTERFACE` and `LOOPBACK_INTERFACE`.

use serde_json::{Map, Value};

use super::{empty_entry, Table};
use crate::graph::IpInterfaceDecl;
use crate::instance::FilteredView;

/// Physical ports on the instance's side of its visible links
pub(crate) fn ports(view: &FilteredView<'_>) -> Table {
    let mut table = Map::new();
    for link in view.links() {
        let mut entry = Map::new();
        entry.insert("alias".to_string(), Value::String(link.local.port.clone()));
        if let Some(speed) = link.link.bandwidth {
            entry.insert("speed".to_string(), Value::String(speed.to_string()));
        }
        table.insert(view.port_name(&link.local.port), Value::Object(entry));
    }
    table
}

/// Addresses on local physical ports that are not port-channel members
pub(crate) fn ip_interfaces(view: &FilteredView<'_>) -> Table {
    let Some(dp) = view.data_plane() else {
        return Map::new();
    };

    let routed = dp.ip_interfaces.iter().filter(|ip| {
        !dp.port_channels.iter().any(|pc| pc.name == ip.attach_to)
            && dp.channel_of(&ip.attach_to).is_none()
            && view.is_local_port(&ip.attach_to)
    });
    addressed(routed, |name| view.port_name(name))
}

pub(crate) fn loopbacks(view: &FilteredView<'_>) -> Table {
    match view.data_plane() {
        Some(dp) => addressed(dp.loopbacks.iter(), str::to_string),
        None => Map::new(),
    }
}

/// `"<name>"` and `"<name>|<prefix>"` entries
fn addressed<'a>(
    decls: impl Iterator<Item = &'a IpInterfaceDecl>,
    rename: impl Fn(&str) -> String,
) -> Table {
    let mut table = Map::new();
    for decl in decls {
        let name = rename(&decl.attach_to);
        table.insert(format!("{}|{}", name, decl.prefix), empty_entry());
        table.insert(name, empty_entry());
    }
    table
}
