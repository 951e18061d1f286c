// Copyright (c) 2025 - Cowboy AI, Inc.
//! Vip Network Aggregate
//!
//! Floating address pools have no range, gateway or DNS. Settings for a
//! reservation are the address plus the network-level cloud properties.

use serde_json::Value;
use std::net::Ipv4Addr;
use tracing::debug;

use super::availability_zone::AvailabilityZone;
use super::invariants::{cloud_properties, optional_list, require_map, required_name, CloudProperties};
use super::network::{
    availability_zone_union, serves_availability_zones, validate_availability_zone_usage,
    DefaultCategory, NetworkSettings,
};
use super::reservation::Reservation;
use super::vip_subnet::VipNetworkSubnet;
use crate::errors::{TopologyError, TopologyResult};

/// Vip network
#[derive(Debug, Clone, PartialEq)]
pub struct VipNetwork {
    name: String,
    cloud_properties: CloudProperties,
    subnets: Vec<VipNetworkSubnet>,
    availability_zone_names: Vec<String>,
}

impl VipNetwork {
    pub fn new(
        name: impl Into<String>,
        cloud_properties: CloudProperties,
        subnets: Vec<VipNetworkSubnet>,
    ) -> TopologyResult<Self> {
        let name = name.into();
        validate_availability_zone_usage(&name, &subnets)?;
        let availability_zone_names = availability_zone_union(&subnets);

        Ok(Self {
            name,
            cloud_properties,
            subnets,
            availability_zone_names,
        })
    }

    /// Parse a vip network declaration; `subnets` may be omitted
    pub fn parse(declaration: &Value, known_zones: &[AvailabilityZone]) -> TopologyResult<Self> {
        let map = require_map(declaration, "networks", "cloud config")?;
        let name = required_name(map, "name", "network")?;
        let context = format!("network '{}'", name);

        let cloud_properties = cloud_properties(map, &context)?;
        let subnets = match optional_list(map, "subnets", &context)? {
            Some(entries) => entries
                .iter()
                .map(|entry| VipNetworkSubnet::parse(entry, &name, known_zones))
                .collect::<TopologyResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let network = Self::new(name, cloud_properties, subnets)?;
        debug!(
            network = %network.name,
            subnets = network.subnets.len(),
            azs = ?network.availability_zone_names,
            "Parsed vip network"
        );
        Ok(network)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cloud_properties(&self) -> &CloudProperties {
        &self.cloud_properties
    }

    pub fn subnets(&self) -> &[VipNetworkSubnet] {
        &self.subnets
    }

    pub fn availability_zone_names(&self) -> &[String] {
        &self.availability_zone_names
    }

    pub fn find_subnet_containing(&self, ip: Ipv4Addr) -> Option<&VipNetworkSubnet> {
        self.subnets.iter().find(|subnet| subnet.contains(ip))
    }

    pub fn has_azs(&self, names: Option<&[String]>) -> bool {
        serves_availability_zones(self.subnets.len(), &self.availability_zone_names, names)
    }

    /// Settings for a reservation on this network
    ///
    /// `None` and an empty slice are equivalent; any requested category
    /// fails since there is no gateway or DNS to offer.
    pub fn network_settings(
        &self,
        reservation: &Reservation,
        defaults: Option<&[DefaultCategory]>,
    ) -> TopologyResult<NetworkSettings> {
        if defaults.is_some_and(|categories| !categories.is_empty()) {
            return Err(TopologyError::UnsupportedDefaultsForVipNetwork {
                network: self.name.clone(),
            });
        }

        let ip = reservation
            .ip()
            .ok_or_else(|| TopologyError::MissingIpForReservation {
                network: self.name.clone(),
            })?;

        Ok(NetworkSettings::Vip {
            ip,
            cloud_properties: self.cloud_properties.clone(),
        })
    }
}
