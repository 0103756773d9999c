//! Network filters available to templates.
//!
//! Prefixes are parsed with `ipnetwork`; a bare address is treated as a
//! host prefix.

use ipnetwork::IpNetwork;
use minijinja::{Environment, Error, ErrorKind, Value};
use std::collections::{BTreeMap, HashSet};

/// Register every network filter on `env`
pub fn register(env: &mut Environment<'_>) {
    env.add_filter("ip", ip);
    env.add_filter("prefixlen", prefixlen);
    env.add_filter("ipv4", ipv4);
    env.add_filter("ipv6", ipv6);
    env.add_filter("ip_network", ip_network);
    env.add_filter("pfx_filter", pfx_filter);
    env.add_filter("unique_name", unique_name);
}

fn parse(value: &str) -> Result<IpNetwork, Error> {
    value.trim().parse::<IpNetwork>().map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("'{}' is not an IP prefix: {}", value, e),
        )
    })
}

/// Address part of a prefix
fn ip(value: String) -> Result<String, Error> {
    Ok(parse(&value)?.ip().to_string())
}

fn prefixlen(value: String) -> Result<u8, Error> {
    Ok(parse(&value)?.prefix())
}

/// The value when it is an IPv4 address or prefix, otherwise empty
fn ipv4(value: String) -> String {
    match value.trim().parse::<IpNetwork>() {
        Ok(IpNetwork::V4(_)) => value,
        _ => String::new(),
    }
}

/// The value when it is an IPv6 address or prefix, otherwise empty
fn ipv6(value: String) -> String {
    match value.trim().parse::<IpNetwork>() {
        Ok(IpNetwork::V6(_)) => value,
        _ => String::new(),
    }
}

/// Network address of a prefix, with its length
fn ip_network(value: String) -> Result<String, Error> {
    let net = parse(&value)?;
    Ok(format!("{}/{}", net.network(), net.prefix()))
}

/// Only the `"<name>|<prefix>"` entries of a table
fn pfx_filter(table: Value) -> Result<Value, Error> {
    let mut kept = BTreeMap::new();
    for key in table.try_iter()? {
        if let Some(name) = key.as_str() {
            if name.contains('|') {
                kept.insert(name.to_string(), table.get_item(&key)?);
            }
        }
    }
    Ok(Value::from_serialize(&kept))
}

/// De-duplicate a list, keeping the first occurrence of each item
fn unique_name(list: Value) -> Result<Vec<Value>, Error> {
    let mut seen = HashSet::new();
    Ok(list
        .try_iter()?
        .filter(|item| seen.insert(item.to_string()))
        .collect())
}
