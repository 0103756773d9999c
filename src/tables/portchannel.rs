//! `PORTCHANNEL`, `PORTCHANNEL_MEMBER` and `PORTCHANNEL_INTERFACE`.

use serde_json::{json, Map};
use tracing::debug;

use super::{empty_entry, Table};
use crate::instance::FilteredView;

const DEFAULT_MTU: &str = "9100";

/// A port-channel of the instance with its members already mapped to port names
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedChannel {
    pub name: String,
    pub members: Vec<String>,
    pub min_links: u32,
}

/// Port-channels whose members lie, at least partly, inside the instance
#[derive(Debug, Default)]
pub(crate) struct PortChannels {
    channels: Vec<ResolvedChannel>,
}

impl PortChannels {
    pub fn collect(view: &FilteredView<'_>) -> Self {
        let Some(dp) = view.data_plane() else {
            return Self::default();
        };

        let mut channels = Vec::new();
        for decl in &dp.port_channels {
            let (local, foreign): (Vec<&String>, Vec<&String>) =
                decl.members.iter().partition(|m| view.is_local_port(m));
            if !foreign.is_empty() {
                debug!(channel = %decl.name, dropped = ?foreign, "port-channel members outside the instance");
            }
            if local.is_empty() {
                continue;
            }
            let members: Vec<String> = local.iter().map(|m| view.port_name(m)).collect();
            let min_links = decl.min_links.unwrap_or_else(|| default_min_links(members.len()));
            channels.push(ResolvedChannel {
                name: decl.name.clone(),
                members,
                min_links,
            });
        }
        Self { channels }
    }

    pub fn table(&self) -> Table {
        self.channels
            .iter()
            .map(|pc| {
                (
                    pc.name.clone(),
                    json!({
                        "admin_status": "up",
                        "min_links": pc.min_links.to_string(),
                        "members": pc.members,
                        "mtu": DEFAULT_MTU,
                    }),
                )
            })
            .collect()
    }

    pub fn members(&self) -> Table {
        self.channels
            .iter()
            .flat_map(|pc| {
                pc.members
                    .iter()
                    .map(move |m| (format!("{}|{}", pc.name, m), empty_entry()))
            })
            .collect()
    }

    /// Existence entry per channel plus one entry per address on it
    pub fn interfaces(&self, view: &FilteredView<'_>) -> Table {
        let mut table = Map::new();
        for pc in &self.channels {
            table.insert(pc.name.clone(), empty_entry());
        }
        if let Some(dp) = view.data_plane() {
            for ip in &dp.ip_interfaces {
                if self.channels.iter().any(|pc| pc.name == ip.attach_to) {
                    table.insert(format!("{}|{}", ip.attach_to, ip.prefix), empty_entry());
                }
            }
        }
        table
    }
}

/// Three quarters of the members, rounded up
fn default_min_links(members: usize) -> u32 {
    ((members * 3 + 3) / 4) as u32
}
