// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Aggregates
//!
//! A network is a named, ordered collection of subnets of one variant.
//! Networks validate the invariants that span subnets (no overlapping
//! ranges, uniform zone tagging) and derive the settings an instance needs
//! for a given reservation.
//!
//! # Zone queries
//!
//! [`Network::has_azs`] answers whether a network can serve every zone in a
//! desired set:
//!
//! - a network without subnets serves anything, including "no zone"
//! - `None` stands for "no zone" and is never served by a network that has
//!   subnets
//! - an empty list is vacuously served

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::net::Ipv4Addr;

use super::availability_zone::AvailabilityZone;
use super::invariants::{optional_string, require_map, required_name, CloudProperties};
use super::manual_network::ManualNetwork;
use super::reservation::Reservation;
use super::subnet::Subnet;
use super::vip_network::VipNetwork;
use crate::config::TopologyConfig;
use crate::errors::{TopologyError, TopologyResult};

/// Default route hints an instance may take from a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultCategory {
    Dns,
    Gateway,
}

/// Categories used when the caller does not pass any
pub const DEFAULT_CATEGORIES: [DefaultCategory; 2] = [DefaultCategory::Dns, DefaultCategory::Gateway];

/// Network variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Manual,
    Vip,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Manual => write!(f, "manual"),
            NetworkKind::Vip => write!(f, "vip"),
        }
    }
}

/// Settings an instance receives for one network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NetworkSettings {
    Manual {
        ip: Ipv4Addr,
        netmask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
        cloud_properties: CloudProperties,
        dns: Vec<Ipv4Addr>,
        default: Vec<DefaultCategory>,
    },
    Vip {
        ip: Ipv4Addr,
        cloud_properties: CloudProperties,
    },
}

impl NetworkSettings {
    pub fn ip(&self) -> Ipv4Addr {
        match self {
            NetworkSettings::Manual { ip, .. } | NetworkSettings::Vip { ip, .. } => *ip,
        }
    }
}

/// Any network of the topology
#[derive(Debug, Clone, PartialEq)]
pub enum Network {
    Manual(ManualNetwork),
    Vip(VipNetwork),
}

impl Network {
    /// Parse one network declaration, dispatching on its `type`
    ///
    /// A missing `type` means `manual`.
    pub fn parse(
        declaration: &Value,
        known_zones: &[AvailabilityZone],
        config: &TopologyConfig,
    ) -> TopologyResult<Self> {
        let map = require_map(declaration, "networks", "cloud config")?;
        let name = required_name(map, "name", "network")?;
        let kind = optional_string(map, "type", &format!("network '{}'", name))?;

        match kind.as_deref() {
            None | Some("manual") => Ok(Network::Manual(ManualNetwork::parse(
                declaration,
                known_zones,
                config,
            )?)),
            Some("vip") => Ok(Network::Vip(VipNetwork::parse(declaration, known_zones)?)),
            Some(other) => Err(TopologyError::UnsupportedNetworkType {
                network: name,
                kind: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Network::Manual(network) => network.name(),
            Network::Vip(network) => network.name(),
        }
    }

    pub fn kind(&self) -> NetworkKind {
        match self {
            Network::Manual(_) => NetworkKind::Manual,
            Network::Vip(_) => NetworkKind::Vip,
        }
    }

    pub fn subnet_count(&self) -> usize {
        match self {
            Network::Manual(network) => network.subnets().len(),
            Network::Vip(network) => network.subnets().len(),
        }
    }

    pub fn availability_zone_names(&self) -> &[String] {
        match self {
            Network::Manual(network) => network.availability_zone_names(),
            Network::Vip(network) => network.availability_zone_names(),
        }
    }

    /// Whether the network serves every queried zone
    pub fn has_azs(&self, names: Option<&[String]>) -> bool {
        match self {
            Network::Manual(network) => network.has_azs(names),
            Network::Vip(network) => network.has_azs(names),
        }
    }

    /// Settings for the instance holding `reservation`
    ///
    /// `None` for `defaults` means the variant's default: `dns` and
    /// `gateway` for manual networks, nothing for vip networks.
    pub fn network_settings(
        &self,
        reservation: &Reservation,
        defaults: Option<&[DefaultCategory]>,
    ) -> TopologyResult<NetworkSettings> {
        match self {
            Network::Manual(network) => network.network_settings(reservation, defaults),
            Network::Vip(network) => network.network_settings(reservation, defaults),
        }
    }
}

/// Union of every subnet's zones, in first-seen order
pub(crate) fn availability_zone_union<S: Subnet>(subnets: &[S]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in subnets.iter().flat_map(|subnet| subnet.availability_zone_names()) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Either every subnet names a zone or none does
pub(crate) fn validate_availability_zone_usage<S: Subnet>(
    network_name: &str,
    subnets: &[S],
) -> TopologyResult<()> {
    let tagged = subnets.iter().filter(|subnet| subnet.has_availability_zones()).count();
    if tagged != 0 && tagged != subnets.len() {
        return Err(TopologyError::InconsistentAvailabilityZoneUsage {
            network: network_name.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn serves_availability_zones(
    subnet_count: usize,
    availability_zone_names: &[String],
    queried: Option<&[String]>,
) -> bool {
    if subnet_count == 0 {
        return true;
    }

    match queried {
        None => false,
        Some(names) => names.iter().all(|name| availability_zone_names.contains(name)),
    }
}
