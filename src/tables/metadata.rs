//! `DEVICE_METADATA`: the instance's own identity.

use serde_json::{Map, Value};

use super::Table;
use crate::instance::FilteredView;

/// Exactly one `localhost` entry
pub(crate) fn device_metadata(view: &FilteredView<'_>) -> Table {
    let graph = view.graph();
    let device = view.local_device();

    let mut localhost = Map::new();
    localhost.insert("hostname".to_string(), Value::String(view.hostname()));

    // Every instance reports the chassis SKU; the ASIC's own SKU is only
    // meaningful to its neighbors.
    if let Some(hwsku) = graph.hwsku().or(graph.host_device().hwsku.as_deref()) {
        localhost.insert("hwsku".to_string(), Value::String(hwsku.to_string()));
    }
    if let Some(device_type) = &device.device_type {
        localhost.insert("type".to_string(), Value::String(device_type.to_string()));
    }
    if let Some(sub_role) = view.sub_role() {
        localhost.insert("sub_role".to_string(), Value::String(sub_role.to_string()));
    }
    if let Some(asn) = &device.asn {
        localhost.insert("bgp_asn".to_string(), Value::String(asn.clone()));
    }
    if let Some(id) = &graph.services().deployment_id {
        localhost.insert("deployment_id".to_string(), Value::String(id.clone()));
    }

    let mut table = Map::new();
    table.insert("localhost".to_string(), Value::Object(localhost));
    table
}
