//! `DEVICE_NEIGHBOR`, `DEVICE_NEIGHBOR_METADATA` and `BGP_NEIGHBOR`.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::{string_or_null, Table};
use crate::instance::FilteredView;

const DEFAULT_TIMER: &str = "0";

/// Remote end of each visible link, keyed by local port name
pub(crate) fn device_neighbors(view: &FilteredView<'_>) -> Table {
    let graph = view.graph();
    view.links()
        .iter()
        .map(|link| {
            (
                view.port_name(&link.local.port),
                json!({
                    "name": graph.device(link.remote.device).hostname,
                    "port": link.remote.port,
                }),
            )
        })
        .collect()
}

/// One entry per distinct neighbor device
pub(crate) fn neighbor_metadata(view: &FilteredView<'_>) -> Table {
    let graph = view.graph();
    view.neighbors()
        .into_iter()
        .map(|id| {
            let device = graph.device(id);
            let mut entry = Map::new();
            entry.insert("hwsku".to_string(), string_or_null(device.hwsku.as_deref()));
            entry.insert(
                "type".to_string(),
                string_or_null(device.device_type.as_ref().map(|t| t.as_str())),
            );
            entry.insert("lo_addr".to_string(), string_or_null(device.loopback.as_deref()));
            entry.insert("mgmt_addr".to_string(), string_or_null(device.mgmt_addr.as_deref()));
            (device.hostname.clone(), Value::Object(entry))
        })
        .collect()
}

/// Sessions with one router inside the instance, keyed by peer address
pub(crate) fn bgp_neighbors(view: &FilteredView<'_>) -> Table {
    let graph = view.graph();
    let mut table = Map::new();

    for session in view.peerings() {
        let peer = graph.device(session.peer);
        let peering = session.peering;

        let mut entry = Map::new();
        match &peer.asn {
            Some(asn) => {
                entry.insert("asn".to_string(), Value::String(asn.clone()));
            }
            None => debug!(peer = %peer.hostname, "peer router declares no ASN"),
        }
        entry.insert(
            "holdtime".to_string(),
            Value::String(peering.holdtime.as_deref().unwrap_or(DEFAULT_TIMER).to_string()),
        );
        entry.insert(
            "keepalive".to_string(),
            Value::String(peering.keepalive.as_deref().unwrap_or(DEFAULT_TIMER).to_string()),
        );
        entry.insert("local_addr".to_string(), Value::String(session.local_addr.to_string()));
        entry.insert("name".to_string(), Value::String(peer.hostname.clone()));
        entry.insert("rrclient".to_string(), Value::from(u8::from(peering.rrclient)));
        entry.insert("nhopself".to_string(), Value::from(u8::from(peering.nhopself)));

        table.insert(session.peer_addr.to_string(), Value::Object(entry));
    }
    table
}
