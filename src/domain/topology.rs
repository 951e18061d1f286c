// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Topology
//!
//! The whole declared topology of one cloud config: availability zones
//! followed by networks. Parsing is fail-fast; the first invalid zone or
//! network aborts and no partial topology is returned.
//!
//! Once built, a [`Topology`] is immutable and can be shared across tasks
//! behind an `Arc` without locking.
//!
//! # Examples
//!
//! ```rust
//! use cim_network_topology::{Topology, TopologyConfig};
//! use serde_json::json;
//!
//! let topology = Topology::parse(
//!     &json!({
//!         "azs": [{"name": "z1"}],
//!         "networks": [
//!             {"name": "private", "subnets": [{"range": "10.0.0.0/24", "gateway": "10.0.0.1", "az": "z1"}]},
//!             {"name": "public", "type": "vip"}
//!         ]
//!     }),
//!     &TopologyConfig::default(),
//! ).unwrap();
//!
//! assert_eq!(topology.networks().len(), 2);
//! assert!(topology.network("private").is_some());
//! assert!(topology.availability_zone("z1").is_some());
//! ```

use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

use super::availability_zone::AvailabilityZone;
use super::invariants::{optional_list, require_map};
use super::network::{Network, NetworkKind};
use crate::config::TopologyConfig;
use crate::errors::{TopologyError, TopologyResult};

/// Cloud config key holding the network declarations
pub const NETWORKS_KEY: &str = "networks";

/// Parsed zones and networks of a cloud config
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    availability_zones: Vec<AvailabilityZone>,
    networks: Vec<Network>,
}

impl Topology {
    /// Assemble a topology from already parsed parts
    pub fn new(availability_zones: Vec<AvailabilityZone>, networks: Vec<Network>) -> TopologyResult<Self> {
        let mut names = HashSet::new();
        for network in &networks {
            if !names.insert(network.name()) {
                return Err(TopologyError::DuplicateNetworkName(network.name().to_string()));
            }
        }

        Ok(Self {
            availability_zones,
            networks,
        })
    }

    /// Parse the `azs` and `networks` sections of a cloud config
    #[tracing::instrument(skip_all)]
    pub fn parse(cloud_config: &Value, config: &TopologyConfig) -> TopologyResult<Self> {
        let availability_zones = AvailabilityZone::parse_all(cloud_config)?;

        let networks = match cloud_config {
            Value::Null => Vec::new(),
            other => {
                let document = require_map(other, "cloud config", "cloud config document")?;
                match optional_list(document, NETWORKS_KEY, "cloud config")? {
                    Some(entries) => entries
                        .iter()
                        .map(|entry| Network::parse(entry, &availability_zones, config))
                        .collect::<TopologyResult<Vec<_>>>()?,
                    None => Vec::new(),
                }
            }
        };

        let topology = Self::new(availability_zones, networks)?;
        info!(
            zones = topology.availability_zones.len(),
            manual = topology.count(NetworkKind::Manual),
            vip = topology.count(NetworkKind::Vip),
            "Parsed network topology"
        );
        Ok(topology)
    }

    /// Networks in declaration order
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|network| network.name() == name)
    }

    /// Zones in declaration order
    pub fn availability_zones(&self) -> &[AvailabilityZone] {
        &self.availability_zones
    }

    pub fn availability_zone(&self, name: &str) -> Option<&AvailabilityZone> {
        self.availability_zones.iter().find(|zone| zone.name() == name)
    }

    /// Zones ordered by name
    pub fn sorted_availability_zones(&self) -> Vec<&AvailabilityZone> {
        let mut zones: Vec<_> = self.availability_zones.iter().collect();
        zones.sort();
        zones
    }

    fn count(&self, kind: NetworkKind) -> usize {
        self.networks.iter().filter(|network| network.kind() == kind).count()
    }
}
