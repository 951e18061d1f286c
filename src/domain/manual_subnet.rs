// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manual Network Subnet
//!
//! A CIDR-addressed subnet with an optional gateway, DNS servers and
//! reserved/static address pools. Whatever is neither restricted nor static
//! forms the dynamic pool handed to the allocator.

use ipnetwork::Ipv4Network;
use serde_json::Value;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use tracing::debug;

use super::address::{blocks_overlap, parse_address, parse_cidr, AddressRange};
use super::availability_zone::AvailabilityZone;
use super::invariants::{
    cloud_properties, optional_list, optional_string, require_map, required_string, string_list,
    string_or_list, CloudProperties,
};
use super::subnet::{parse_availability_zones, Subnet};
use crate::config::TopologyConfig;
use crate::errors::{TopologyError, TopologyResult};

/// Subnet of a manual network
///
/// # Invariants
/// - `range` is normalised (no host bits)
/// - `gateway`, when present, lies strictly inside `range` and is neither
///   the network id nor the broadcast address
/// - every reserved and static address lies within `range`
/// - reserved and static addresses are disjoint from each other and from
///   the network id and broadcast address
#[derive(Debug, Clone, PartialEq)]
pub struct ManualNetworkSubnet {
    network_name: String,
    range: Ipv4Network,
    gateway: Option<Ipv4Addr>,
    dns: Vec<Ipv4Addr>,
    reserved_addresses: BTreeSet<Ipv4Addr>,
    static_addresses: BTreeSet<Ipv4Addr>,
    restricted_addresses: BTreeSet<Ipv4Addr>,
    cloud_properties: CloudProperties,
    availability_zone_names: Vec<String>,
}

impl ManualNetworkSubnet {
    /// Parse one entry of a manual network's `subnets` list
    pub fn parse(
        declaration: &Value,
        network_name: &str,
        known_zones: &[AvailabilityZone],
        config: &TopologyConfig,
    ) -> TopologyResult<Self> {
        let context = format!("network '{}' subnet", network_name);
        let declaration = require_map(declaration, "subnets", &context)?;

        let range = parse_cidr(&required_string(declaration, "range", &context)?)?;

        let gateway = match optional_string(declaration, "gateway", &context)? {
            Some(text) => Some(parse_gateway(&text, &range, network_name)?),
            None if config.require_gateway => {
                return Err(TopologyError::MissingField {
                    field: "gateway".to_string(),
                    context,
                })
            }
            None => None,
        };

        let dns = match optional_list(declaration, "dns", &context)? {
            Some(values) => string_list(values, "dns", &context)?
                .iter()
                .map(|text| parse_address(text))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let mut reserved_addresses = BTreeSet::new();
        for entry in string_or_list(declaration, "reserved", &context)? {
            let pool = AddressRange::parse(&entry)?;
            if let Some(ip) = first_outside(&pool, &range) {
                return Err(TopologyError::ReservedIpOutOfRange {
                    network: network_name.to_string(),
                    ip,
                });
            }
            reserved_addresses.extend(pool.iter());
        }
        reserved_addresses.remove(&range.network());
        reserved_addresses.remove(&range.broadcast());

        let mut restricted_addresses = reserved_addresses.clone();
        restricted_addresses.insert(range.network());
        restricted_addresses.insert(range.broadcast());
        restricted_addresses.extend(gateway);
        restricted_addresses.extend(config.director_ips.iter().copied());

        let mut static_addresses = BTreeSet::new();
        for entry in string_or_list(declaration, "static", &context)? {
            let pool = AddressRange::parse(&entry)?;
            if let Some(ip) = first_outside(&pool, &range) {
                return Err(TopologyError::StaticIpOutOfRange {
                    network: network_name.to_string(),
                    ip,
                });
            }
            for ip in pool.iter() {
                if ip == range.network() || ip == range.broadcast() {
                    return Err(TopologyError::StaticIpOutOfRange {
                        network: network_name.to_string(),
                        ip,
                    });
                }
                if restricted_addresses.contains(&ip) {
                    return Err(TopologyError::StaticIpInReservedRange {
                        network: network_name.to_string(),
                        ip,
                    });
                }
                static_addresses.insert(ip);
            }
        }

        let cloud_properties = cloud_properties(declaration, &context)?;
        let availability_zone_names =
            parse_availability_zones(declaration, network_name, known_zones)?;

        debug!(
            network = network_name,
            range = %range,
            reserved = reserved_addresses.len(),
            statics = static_addresses.len(),
            azs = ?availability_zone_names,
            "Parsed manual subnet"
        );

        Ok(Self {
            network_name: network_name.to_string(),
            range,
            gateway,
            dns,
            reserved_addresses,
            static_addresses,
            restricted_addresses,
            cloud_properties,
            availability_zone_names,
        })
    }

    /// Name of the network this subnet was declared in
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn range(&self) -> &Ipv4Network {
        &self.range
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.range.mask()
    }

    pub fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    pub fn dns(&self) -> &[Ipv4Addr] {
        &self.dns
    }

    pub fn reserved_addresses(&self) -> &BTreeSet<Ipv4Addr> {
        &self.reserved_addresses
    }

    /// Addresses that can never be handed out: reserved pool, network id,
    /// broadcast, gateway and every director address, in range or not
    pub fn restricted_addresses(&self) -> &BTreeSet<Ipv4Addr> {
        &self.restricted_addresses
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.range.contains(ip)
    }

    /// True when both ranges share any address
    pub fn overlaps(&self, other: &ManualNetworkSubnet) -> bool {
        blocks_overlap(&self.range, &other.range)
    }

    /// Inside the range and not restricted
    pub fn is_reservable(&self, ip: Ipv4Addr) -> bool {
        self.contains(ip) && !self.restricted_addresses.contains(&ip)
    }

    /// Addresses left for dynamic allocation, ascending
    pub fn dynamic_addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        AddressRange::from_cidr(&self.range)
            .iter()
            .filter(|ip| !self.restricted_addresses.contains(ip) && !self.static_addresses.contains(ip))
    }
}

impl Subnet for ManualNetworkSubnet {
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

fn parse_gateway(text: &str, range: &Ipv4Network, network_name: &str) -> TopologyResult<Ipv4Addr> {
    let invalid = |reason: &str| TopologyError::InvalidGateway {
        network: network_name.to_string(),
        gateway: text.to_string(),
        reason: reason.to_string(),
    };

    if text.contains('/') {
        return Err(invalid("must be a single IP"));
    }

    let gateway = parse_address(text)?;

    if !range.contains(gateway) {
        return Err(invalid("must be inside the range"));
    }
    if gateway == range.network() {
        return Err(invalid("can't be the network id"));
    }
    if gateway == range.broadcast() {
        return Err(invalid("can't be the broadcast IP"));
    }

    Ok(gateway)
}

fn first_outside(pool: &AddressRange, range: &Ipv4Network) -> Option<Ipv4Addr> {
    [pool.first(), pool.last()]
        .into_iter()
        .find(|ip| !range.contains(*ip))
}
