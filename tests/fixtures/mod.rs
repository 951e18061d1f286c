// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-network-topology
//!
//! Deterministic cloud configs and instance references shared by the
//! integration tests. Instance ids are fixed constants so failures are
//! reproducible.
#![allow(dead_code)]

use cim_network_topology::{InstanceRef, Topology, TopologyConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

// Fixed instance ids (UUID v7 layout, deterministic for testing)
pub const INSTANCE_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";
pub const INSTANCE_ID_2: &str = "01934f4a-1001-7000-8000-000000001001";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

/// `web/index` instance with a fixed id
pub fn instance(id: &str, index: u32) -> InstanceRef {
    InstanceRef::new(parse_uuid(id), "web", index)
}

/// Two zones, a zoned manual network, a zoned vip network and a vip
/// network without subnets
pub fn cloud_config() -> Value {
    json!({
        "azs": [
            {"name": "zone_1", "cloud_properties": {"datacenter": "dc1"}},
            {"name": "zone_2", "cloud_properties": {"datacenter": "dc2"}, "cpi": "vsphere"}
        ],
        "networks": [
            {
                "name": "private",
                "subnets": [
                    {
                        "range": "192.168.1.0/24",
                        "gateway": "192.168.1.1",
                        "dns": ["192.168.1.1", "192.168.1.2"],
                        "reserved": ["192.168.1.2-192.168.1.10"],
                        "static": ["192.168.1.11-192.168.1.20"],
                        "az": "zone_1",
                        "cloud_properties": {"name": "VM Network 1"}
                    },
                    {
                        "range": "192.168.2.0/24",
                        "gateway": "192.168.2.1",
                        "azs": ["zone_1", "zone_2"],
                        "cloud_properties": {"name": "VM Network 2"}
                    }
                ]
            },
            {
                "name": "public",
                "type": "vip",
                "cloud_properties": {"security_group": "web"},
                "subnets": [{"static": ["69.69.69.69", "69.69.69.70"], "azs": ["zone_2"]}]
            },
            {
                "name": "floating",
                "type": "vip"
            }
        ]
    })
}

pub fn topology() -> Arc<Topology> {
    Arc::new(
        Topology::parse(&cloud_config(), &TopologyConfig::default())
            .expect("fixture cloud config must parse"),
    )
}
