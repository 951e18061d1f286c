// Copyright (c) 2025 - Cowboy AI, Inc.
//! Vip Network Subnet
//!
//! A pool of floating, externally routable addresses. There is no range,
//! gateway or DNS: the subnet only knows which addresses it may hand out
//! and which zones it serves.

use serde_json::Value;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use tracing::debug;

use super::address::{expand_ranges, AddressRange};
use super::availability_zone::AvailabilityZone;
use super::invariants::{cloud_properties, require_map, string_or_list, CloudProperties};
use super::subnet::{parse_availability_zones, Subnet};
use crate::errors::{TopologyError, TopologyResult};

/// Keys a vip subnet must not carry
const FORBIDDEN_KEYS: [&str; 4] = ["range", "gateway", "dns", "reserved"];

/// Subnet of a vip network
#[derive(Debug, Clone, PartialEq)]
pub struct VipNetworkSubnet {
    static_addresses: BTreeSet<Ipv4Addr>,
    cloud_properties: CloudProperties,
    availability_zone_names: Vec<String>,
}

impl VipNetworkSubnet {
    /// Parse one entry of a vip network's `subnets` list
    ///
    /// # Invariants
    /// - `static` present (single entry or list of addresses, ranges, CIDRs)
    /// - no `range`, `gateway`, `dns` or `reserved`
    pub fn parse(
        declaration: &Value,
        network_name: &str,
        known_zones: &[AvailabilityZone],
    ) -> TopologyResult<Self> {
        let context = format!("network '{}' subnet", network_name);
        let declaration = require_map(declaration, "subnets", &context)?;

        if let Some(key) = FORBIDDEN_KEYS.iter().find(|key| declaration.contains_key(**key)) {
            return Err(TopologyError::InvalidNetworkProperty {
                network: network_name.to_string(),
                reason: format!("is a vip network and its subnets must not specify '{}'", key),
            });
        }

        if !declaration.contains_key("static") {
            return Err(TopologyError::MissingField {
                field: "static".to_string(),
                context,
            });
        }

        let pools = string_or_list(declaration, "static", &context)?
            .iter()
            .map(|entry| AddressRange::parse(entry))
            .collect::<Result<Vec<_>, _>>()?;
        let static_addresses = expand_ranges(&pools);

        let cloud_properties = cloud_properties(declaration, &context)?;
        let availability_zone_names =
            parse_availability_zones(declaration, network_name, known_zones)?;

        debug!(
            network = network_name,
            statics = static_addresses.len(),
            azs = ?availability_zone_names,
            "Parsed vip subnet"
        );

        Ok(Self {
            static_addresses,
            cloud_properties,
            availability_zone_names,
        })
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.static_addresses.contains(&ip)
    }
}

impl Subnet for VipNetworkSubnet {
    fn availability_zone_names(&self) -> &[String] {
        &self.availability_zone_names
    }

    fn cloud_properties(&self) -> &CloudProperties {
        &self.cloud_properties
    }

    fn static_addresses(&self) -> &BTreeSet<Ipv4Addr> {
        &self.static_addresses
    }
}
