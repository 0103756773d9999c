//! End-to-end tests of per-instance generation on the sample multi-ASIC chassis
//!
//! Every test runs the `cfggen` binary against the fixtures in
//! `tests/fixtures/multi_npu` and compares the printed JSON structurally.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn asic_cmd(asic: u32) -> assert_cmd::Command {
    let mut cmd = minigraph_cmd();
    cmd.arg("-p")
        .arg(port_config_path(asic))
        .arg("-n")
        .arg(format!("asic{}", asic));
    cmd
}

fn var_json(mut cmd: assert_cmd::Command, table: &str) -> serde_json::Value {
    json_of(cmd.arg("--var-json").arg(table))
}

fn sorted_keys(value: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

fn sorted(mut keys: Vec<&str>) -> Vec<String> {
    keys.sort();
    keys.into_iter().map(String::from).collect()
}

// ============================================================================
// Basic invocation
// ============================================================================

#[test]
fn test_dummy_run() {
    cfggen_cmd().assert().success().stdout("");
}

#[test]
fn test_hwsku() {
    let out = stdout_of(minigraph_cmd().args(["-v", "DEVICE_METADATA.localhost.hwsku"]));
    assert_eq!(out.trim(), SAMPLE_HWSKU);

    for asic in 0..ASIC_COUNT {
        let out = stdout_of(minigraph_cmd().args([
            "-n",
            &format!("asic{}", asic),
            "-v",
            "DEVICE_METADATA.localhost.hwsku",
        ]));
        assert_eq!(out.trim(), SAMPLE_HWSKU, "asic{}", asic);
    }
}

#[test]
fn test_print_data() {
    let out = stdout_of(minigraph_cmd().arg("--print-data"));
    assert!(!out.trim().is_empty());

    for asic in 0..ASIC_COUNT {
        let out = stdout_of(minigraph_cmd().args(["-n", &format!("asic{}", asic), "--print-data"]));
        let data: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(data.get("DEVICE_METADATA").is_some(), "asic{}", asic);
    }
}

#[test]
fn test_additional_json_data() {
    for asic in 0..ASIC_COUNT {
        let out = stdout_of(cfggen_cmd().args([
            "-a",
            r#"{"key1":"value1"}"#,
            "-n",
            &format!("asic{}", asic),
            "-v",
            "key1",
        ]));
        assert_eq!(out.trim(), "value1");
    }
}

#[test]
fn test_read_yaml() {
    let namespaces = std::iter::once(String::new()).chain((0..ASIC_COUNT).map(|i| format!("asic{}", i)));
    for namespace in namespaces {
        let out = stdout_of(
            cfggen_cmd()
                .arg("-n")
                .arg(&namespace)
                .arg("-y")
                .arg(fixture("test.yml"))
                .args(["-v", "yml_item"]),
        );
        let items: Vec<String> = serde_yaml::from_str(&out).unwrap();
        assert_eq!(items, vec!["value1", "value2"], "namespace '{}'", namespace);
    }
}

#[test]
fn test_render_template() {
    for asic in 0..ASIC_COUNT {
        let out = stdout_of(
            cfggen_cmd()
                .arg("-n")
                .arg(format!("asic{}", asic))
                .arg("-y")
                .arg(fixture("test.yml"))
                .arg("-t")
                .arg(fixture("test.j2")),
        );
        assert_eq!(out.trim(), "value1\nvalue2");
    }
}

// ============================================================================
// Host-wide services
// ============================================================================

#[test]
fn test_metadata_tacacs() {
    assert_eq!(
        json_of(minigraph_cmd().args(["--var-json", "TACPLUS_SERVER"])),
        json!({"123.46.98.21": {"priority": "1", "tcp_port": "49"}})
    );
    for asic in 0..ASIC_COUNT {
        assert_eq!(var_json(asic_cmd(asic), "TACPLUS_SERVER"), json!({}), "asic{}", asic);
    }
}

#[test]
fn test_metadata_ntp() {
    assert_eq!(
        json_of(minigraph_cmd().args(["--var-json", "NTP_SERVER"])),
        json!({"17.39.1.129": {}, "17.39.1.130": {}})
    );
    for asic in 0..ASIC_COUNT {
        assert_eq!(var_json(asic_cmd(asic), "NTP_SERVER"), json!({}), "asic{}", asic);
    }
}

#[test]
fn test_mgmt_port() {
    assert_eq!(
        json_of(minigraph_cmd().args(["--var-json", "MGMT_PORT"])),
        json!({"eth0": {"alias": "eth0", "admin_status": "up"}})
    );
    for asic in 0..ASIC_COUNT {
        assert_eq!(var_json(asic_cmd(asic), "MGMT_PORT"), json!({}), "asic{}", asic);
    }
}

// ============================================================================
// Port-channels
// ============================================================================

#[test]
fn test_frontend_asic_portchannels() {
    assert_eq!(
        var_json(asic_cmd(0), "PORTCHANNEL"),
        json!({
            "PortChannel0002": {
                "admin_status": "up",
                "min_links": "2",
                "members": ["Ethernet0", "Ethernet4"],
                "mtu": "9100"
            },
            "PortChannel4001": {
                "admin_status": "up",
                "min_links": "2",
                "members": ["Ethernet-BP0", "Ethernet-BP4"],
                "mtu": "9100"
            },
            "PortChannel4002": {
                "admin_status": "up",
                "min_links": "2",
                "members": ["Ethernet-BP8", "Ethernet-BP12"],
                "mtu": "9100"
            }
        })
    );
}

#[test]
fn test_backend_asic_portchannels() {
    assert_eq!(
        var_json(asic_cmd(3), "PORTCHANNEL"),
        json!({
            "PortChannel4013": {
                "admin_status": "up",
                "min_links": "2",
                "members": ["Ethernet-BP384", "Ethernet-BP388"],
                "mtu": "9100"
            },
            "PortChannel4014": {
                "admin_status": "up",
                "min_links": "2",
                "members": ["Ethernet-BP392", "Ethernet-BP396"],
                "mtu": "9100"
            }
        })
    );
}

#[test]
fn test_frontend_asic_portchannel_mem() {
    let members = var_json(asic_cmd(0), "PORTCHANNEL_MEMBER");
    assert_eq!(
        sorted_keys(&members),
        sorted(vec![
            "PortChannel4002|Ethernet-BP8",
            "PortChannel0002|Ethernet0",
            "PortChannel0002|Ethernet4",
            "PortChannel4002|Ethernet-BP12",
            "PortChannel4001|Ethernet-BP0",
            "PortChannel4001|Ethernet-BP4",
        ])
    );
}

#[test]
fn test_backend_asic_portchannels_mem() {
    let members = var_json(asic_cmd(3), "PORTCHANNEL_MEMBER");
    assert_eq!(
        sorted_keys(&members),
        sorted(vec![
            "PortChannel4013|Ethernet-BP384",
            "PortChannel4014|Ethernet-BP392",
            "PortChannel4014|Ethernet-BP396",
            "PortChannel4013|Ethernet-BP388",
        ])
    );
}

#[test]
fn test_frontend_asic_portchannel_intf() {
    let interfaces = var_json(asic_cmd(0), "PORTCHANNEL_INTERFACE");
    assert_eq!(
        sorted_keys(&interfaces),
        sorted(vec![
            "PortChannel4001|10.1.0.1/31",
            "PortChannel0002|FC00::1/126",
            "PortChannel4002|10.1.0.3/31",
            "PortChannel0002",
            "PortChannel0002|10.0.0.0/31",
            "PortChannel4001",
            "PortChannel4002",
        ])
    );
}

#[test]
fn test_backend_asic_portchannel_intf() {
    let interfaces = var_json(asic_cmd(3), "PORTCHANNEL_INTERFACE");
    assert_eq!(
        sorted_keys(&interfaces),
        sorted(vec![
            "PortChannel4013",
            "PortChannel4013|10.1.0.2/31",
            "PortChannel4014",
            "PortChannel4014|10.1.0.6/31",
        ])
    );
}

// ============================================================================
// Neighbors
// ============================================================================

#[test]
fn test_frontend_asic_device_neigh() {
    assert_eq!(
        var_json(asic_cmd(0), "DEVICE_NEIGHBOR"),
        json!({
            "Ethernet0": {"name": "01T2", "port": "Ethernet1"},
            "Ethernet4": {"name": "01T2", "port": "Ethernet2"},
            "Ethernet-BP0": {"name": "ASIC2", "port": "Eth0-ASIC2"},
            "Ethernet-BP4": {"name": "ASIC2", "port": "Eth1-ASIC2"},
            "Ethernet-BP8": {"name": "ASIC3", "port": "Eth0-ASIC3"},
            "Ethernet-BP12": {"name": "ASIC3", "port": "Eth1-ASIC3"}
        })
    );
}

#[test]
fn test_frontend_asic_device_neigh_metadata() {
    assert_eq!(
        var_json(asic_cmd(0), "DEVICE_NEIGHBOR_METADATA"),
        json!({
            "01T2": {
                "lo_addr": null,
                "mgmt_addr": "89.139.132.40",
                "hwsku": "VM",
                "type": "SpineRouter"
            },
            "ASIC3": {
                "lo_addr": "0.0.0.0/0",
                "mgmt_addr": "0.0.0.0/0",
                "hwsku": "multi-npu-asic",
                "type": "Asic"
            },
            "ASIC2": {
                "lo_addr": "0.0.0.0/0",
                "mgmt_addr": "0.0.0.0/0",
                "hwsku": "multi-npu-asic",
                "type": "Asic"
            }
        })
    );
}

#[test]
fn test_backend_asic_device_neigh() {
    assert_eq!(
        var_json(asic_cmd(3), "DEVICE_NEIGHBOR"),
        json!({
            "Ethernet-BP396": {"name": "ASIC1", "port": "Eth7-ASIC1"},
            "Ethernet-BP384": {"name": "ASIC0", "port": "Eth6-ASIC0"},
            "Ethernet-BP392": {"name": "ASIC1", "port": "Eth6-ASIC1"},
            "Ethernet-BP388": {"name": "ASIC0", "port": "Eth7-ASIC0"}
        })
    );
}

#[test]
fn test_backend_device_neigh_metadata() {
    assert_eq!(
        var_json(asic_cmd(3), "DEVICE_NEIGHBOR_METADATA"),
        json!({
            "ASIC1": {
                "lo_addr": "0.0.0.0/0",
                "mgmt_addr": "0.0.0.0/0",
                "hwsku": "multi-npu-asic",
                "type": "Asic"
            },
            "ASIC0": {
                "lo_addr": "0.0.0.0/0",
                "mgmt_addr": "0.0.0.0/0",
                "hwsku": "multi-npu-asic",
                "type": "Asic"
            }
        })
    );
}

#[test]
fn test_frontend_bgp_neighbor() {
    assert_eq!(
        var_json(asic_cmd(0), "BGP_NEIGHBOR"),
        json!({
            "10.0.0.1": {
                "rrclient": 0,
                "name": "01T2",
                "local_addr": "10.0.0.0",
                "nhopself": 0,
                "holdtime": "10",
                "asn": "65200",
                "keepalive": "3"
            },
            "10.1.0.0": {
                "rrclient": 0,
                "name": "ASIC2",
                "local_addr": "10.1.0.1",
                "nhopself": 0,
                "holdtime": "0",
                "asn": "65100",
                "keepalive": "0"
            },
            "fc00::2": {
                "rrclient": 0,
                "name": "01T2",
                "local_addr": "fc00::1",
                "nhopself": 0,
                "holdtime": "10",
                "asn": "65200",
                "keepalive": "3"
            },
            "10.1.0.2": {
                "rrclient": 0,
                "name": "ASIC3",
                "local_addr": "10.1.0.3",
                "nhopself": 0,
                "holdtime": "0",
                "asn": "65100",
                "keepalive": "0"
            }
        })
    );
}

#[test]
fn test_backend_asic_bgp_neighbor() {
    assert_eq!(
        var_json(asic_cmd(3), "BGP_NEIGHBOR"),
        json!({
            "10.1.0.7": {
                "rrclient": 0,
                "name": "ASIC1",
                "local_addr": "10.1.0.6",
                "nhopself": 0,
                "holdtime": "0",
                "asn": "65100",
                "keepalive": "0"
            },
            "10.1.0.3": {
                "rrclient": 0,
                "name": "ASIC0",
                "local_addr": "10.1.0.2",
                "nhopself": 0,
                "holdtime": "0",
                "asn": "65100",
                "keepalive": "0"
            }
        })
    );
}

// ============================================================================
// Instance identity
// ============================================================================

#[test]
fn test_device_asic_metadata() {
    for asic in 0..ASIC_COUNT {
        let metadata = var_json(asic_cmd(asic), "DEVICE_METADATA");
        let localhost = &metadata["localhost"];
        let expected_role = if asic < 2 { "FrontEnd" } else { "BackEnd" };

        assert_eq!(localhost["hostname"], format!("asic{}", asic));
        assert_eq!(localhost["type"], "Asic");
        assert_eq!(localhost["sub_role"], expected_role);
    }
}

#[test]
fn test_host_metadata() {
    let metadata = json_of(minigraph_cmd().args(["--var-json", "DEVICE_METADATA"]));
    assert_eq!(metadata["localhost"]["hostname"], SAMPLE_HOST);
    assert_eq!(metadata["localhost"]["hwsku"], SAMPLE_HWSKU);
    assert_eq!(metadata["localhost"]["bgp_asn"], "65100");
}

#[test]
fn test_host_sees_only_external_sessions() {
    let neighbors = json_of(minigraph_cmd().args(["--var-json", "BGP_NEIGHBOR"]));
    assert_eq!(
        sorted_keys(&neighbors),
        sorted(vec!["10.0.0.1", "fc00::2", "10.0.0.5", "fc00::a"])
    );
}
