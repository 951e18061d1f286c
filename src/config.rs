// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology parsing configuration

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::domain::address::parse_address;
use crate::errors::{TopologyError, TopologyResult};

/// Environment variable toggling mandatory subnet gateways
pub const REQUIRE_GATEWAY_ENV: &str = "TOPOLOGY_REQUIRE_GATEWAY";

/// Environment variable listing director addresses, comma-separated
pub const DIRECTOR_IPS_ENV: &str = "TOPOLOGY_DIRECTOR_IPS";

/// Switches applied while parsing manual subnets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Fail manual subnets that do not declare a gateway
    #[serde(default)]
    pub require_gateway: bool,

    /// Addresses owned by the director itself; never reservable
    #[serde(default)]
    pub director_ips: Vec<Ipv4Addr>,
}

impl TopologyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_gateway(mut self, required: bool) -> Self {
        self.require_gateway = required;
        self
    }

    pub fn with_director_ips(mut self, ips: Vec<Ipv4Addr>) -> Self {
        self.director_ips = ips;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> TopologyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TopologyResult<Self> {
        let require_gateway = match lookup(REQUIRE_GATEWAY_ENV) {
            None => false,
            Some(value) => value.trim().parse::<bool>().map_err(|_| {
                TopologyError::Configuration(format!(
                    "{} must be 'true' or 'false', got '{}'",
                    REQUIRE_GATEWAY_ENV, value
                ))
            })?,
        };

        let director_ips = match lookup(DIRECTOR_IPS_ENV) {
            None => Vec::new(),
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(|entry| {
                    parse_address(entry).map_err(|e| {
                        TopologyError::Configuration(format!("{}: {}", DIRECTOR_IPS_ENV, e))
                    })
                })
                .collect::<TopologyResult<Vec<_>>>()?,
        };

        Ok(Self {
            require_gateway,
            director_ips,
        })
    }
}
