//! Host-wide service tables. ASIC scopes get every one of them as `{}`.

use serde_json::{json, Map, Value};

use super::{
    empty_entry, Table, DHCP_SERVER, GLOBAL_ONLY, MGMT_INTERFACE, MGMT_PORT, NTP_SERVER,
    SYSLOG_SERVER, TACPLUS_SERVER,
};
use crate::instance::FilteredView;

const TACACS_PRIORITY: &str = "1";
const TACACS_PORT: &str = "49";

pub(crate) fn global_tables(view: &FilteredView<'_>) -> Vec<(&'static str, Table)> {
    let Some(services) = view.global_services() else {
        return GLOBAL_ONLY.into_iter().map(|name| (name, Map::new())).collect();
    };

    let tacacs = services
        .tacacs_servers
        .iter()
        .map(|ip| {
            (
                ip.clone(),
                json!({"priority": TACACS_PRIORITY, "tcp_port": TACACS_PORT}),
            )
        })
        .collect();

    let mut mgmt_port = Map::new();
    let mut mgmt_interface = Map::new();
    for mgmt in view.data_plane().map(|dp| dp.mgmt_interfaces.as_slice()).unwrap_or_default() {
        mgmt_port.insert(
            mgmt.attach_to.clone(),
            json!({"alias": mgmt.attach_to, "admin_status": "up"}),
        );
        let mut entry = Map::new();
        if let Some(gateway) = &mgmt.gateway {
            entry.insert("gwaddr".to_string(), Value::String(gateway.clone()));
        }
        mgmt_interface.insert(format!("{}|{}", mgmt.attach_to, mgmt.prefix), Value::Object(entry));
    }

    vec![
        (NTP_SERVER, servers(&services.ntp_servers)),
        (SYSLOG_SERVER, servers(&services.syslog_servers)),
        (DHCP_SERVER, servers(&services.dhcp_servers)),
        (TACPLUS_SERVER, tacacs),
        (MGMT_PORT, mgmt_port),
        (MGMT_INTERFACE, mgmt_interface),
    ]
}

fn servers(addresses: &[String]) -> Table {
    addresses.iter().map(|ip| (ip.clone(), empty_entry())).collect()
}
