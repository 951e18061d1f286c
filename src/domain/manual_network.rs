// Copyright (c) 2025 - Cowboy AI, Inc.
//! Manual Network Aggregate
//!
//! Owns the CIDR subnets of one manual network and rejects declarations
//! whose subnets overlap or tag zones inconsistently.

use serde_json::Value;
use std::net::Ipv4Addr;
use tracing::debug;

use super::availability_zone::AvailabilityZone;
use super::invariants::{optional_list, require_map, required_name};
use super::manual_subnet::ManualNetworkSubnet;
use super::network::{
    availability_zone_union, serves_availability_zones, validate_availability_zone_usage,
    DefaultCategory, NetworkSettings, DEFAULT_CATEGORIES,
};
use super::reservation::Reservation;
use super::subnet::Subnet;
use crate::config::TopologyConfig;
use crate::errors::{TopologyError, TopologyResult};

/// Manual network
///
/// # Invariants
/// - no two subnet ranges share an address
/// - either every subnet names a zone or none does
#[derive(Debug, Clone, PartialEq)]
pub struct ManualNetwork {
    name: String,
    subnets: Vec<ManualNetworkSubnet>,
    availability_zone_names: Vec<String>,
}

impl ManualNetwork {
    /// Build a network from already parsed subnets, validating cross-subnet invariants
    pub fn new(name: impl Into<String>, subnets: Vec<ManualNetworkSubnet>) -> TopologyResult<Self> {
        let name = name.into();

        for (i, first) in subnets.iter().enumerate() {
            for second in &subnets[i + 1..] {
                if first.overlaps(second) {
                    return Err(TopologyError::OverlappingSubnets {
                        network: name,
                        first: first.range().to_string(),
                        second: second.range().to_string(),
                    });
                }
            }
        }

        validate_availability_zone_usage(&name, &subnets)?;
        let availability_zone_names = availability_zone_union(&subnets);

        Ok(Self {
            name,
            subnets,
            availability_zone_names,
        })
    }

    /// Parse a manual network declaration
    ///
    /// Subnets are parsed in declared order; the first failure aborts the
    /// whole network.
    pub fn parse(
        declaration: &Value,
        known_zones: &[AvailabilityZone],
        config: &TopologyConfig,
    ) -> TopologyResult<Self> {
        let map = require_map(declaration, "networks", "cloud config")?;
        let name = required_name(map, "name", "network")?;
        let context = format!("network '{}'", name);

        let entries = optional_list(map, "subnets", &context)?.ok_or_else(|| {
            TopologyError::MissingField {
                field: "subnets".to_string(),
                context: context.clone(),
            }
        })?;

        let subnets = entries
            .iter()
            .map(|entry| ManualNetworkSubnet::parse(entry, &name, known_zones, config))
            .collect::<TopologyResult<Vec<_>>>()?;

        let network = Self::new(name, subnets)?;
        debug!(
            network = %network.name,
            subnets = network.subnets.len(),
            azs = ?network.availability_zone_names,
            "Parsed manual network"
        );
        Ok(network)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subnets(&self) -> &[ManualNetworkSubnet] {
        &self.subnets
    }

    pub fn availability_zone_names(&self) -> &[String] {
        &self.availability_zone_names
    }

    pub fn find_subnet_containing(&self, ip: Ipv4Addr) -> Option<&ManualNetworkSubnet> {
        self.subnets.iter().find(|subnet| subnet.contains(ip))
    }

    pub fn has_azs(&self, names: Option<&[String]>) -> bool {
        serves_availability_zones(self.subnets.len(), &self.availability_zone_names, names)
    }

    /// Settings for a reservation on this network
    ///
    /// `defaults` of `None` means `["dns", "gateway"]`; an explicit empty
    /// slice suppresses default route hints.
    pub fn network_settings(
        &self,
        reservation: &Reservation,
        defaults: Option<&[DefaultCategory]>,
    ) -> TopologyResult<NetworkSettings> {
        let ip = reservation
            .ip()
            .ok_or_else(|| TopologyError::MissingIpForReservation {
                network: self.name.clone(),
            })?;

        let subnet = self
            .find_subnet_containing(ip)
            .ok_or_else(|| TopologyError::IpNotInNetwork {
                network: self.name.clone(),
                ip,
            })?;

        Ok(NetworkSettings::Manual {
            ip,
            netmask: subnet.netmask(),
            gateway: subnet.gateway(),
            cloud_properties: subnet.cloud_properties().clone(),
            dns: subnet.dns().to_vec(),
            default: defaults.unwrap_or(&DEFAULT_CATEGORIES).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::CloudProperties;
    use crate::domain::reservation::InstanceRef;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    fn zones() -> Vec<AvailabilityZone> {
        ["zone_1", "zone_2", "zone_3"]
            .iter()
            .map(|name| AvailabilityZone::new(*name, CloudProperties::new()))
            .collect()
    }

    fn parse(declaration: Value) -> TopologyResult<ManualNetwork> {
        ManualNetwork::parse(&declaration, &zones(), &TopologyConfig::default())
    }

    fn instance() -> InstanceRef {
        InstanceRef::new(Uuid::nil(), "web", 0)
    }

    #[test]
    fn test_rejects_overlapping_subnets() {
        let result = parse(json!({
            "name": "foo",
            "subnets": [
                {"range": "192.168.1.0/24"},
                {"range": "192.168.1.0/28"}
            ]
        }));

        assert_eq!(
            result.unwrap_err(),
            TopologyError::OverlappingSubnets {
                network: "foo".to_string(),
                first: "192.168.1.0/24".to_string(),
                second: "192.168.1.0/28".to_string(),
            }
        );
    }

    #[test]
    fn test_accepts_disjoint_subnets() {
        let network = parse(json!({
            "name": "foo",
            "subnets": [
                {"range": "10.1.0.0/24"},
                {"range": "10.2.0.0/24"}
            ]
        }))
        .unwrap();

        assert_eq!(network.subnets().len(), 2);
        assert!(network.availability_zone_names().is_empty());
    }

    #[test]
    fn test_inconsistent_zone_usage() {
        let result = parse(json!({
            "name": "foo",
            "subnets": [
                {"range": "10.1.0.0/24", "az": "zone_1"},
                {"range": "10.2.0.0/24"}
            ]
        }));

        assert_eq!(
            result.unwrap_err(),
            TopologyError::InconsistentAvailabilityZoneUsage {
                network: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_requires_subnets() {
        let result = parse(json!({"name": "foo"}));
        assert!(matches!(result, Err(TopologyError::MissingField { .. })));
    }

    #[test]
    fn test_subnet_failure_aborts_network() {
        let result = parse(json!({
            "name": "foo",
            "subnets": [
                {"range": "10.1.0.0/24"},
                {"range": "10.2.0.0/24", "azs": ["zone_1", "bar"]}
            ]
        }));
        assert!(matches!(result, Err(TopologyError::UnknownAvailabilityZone { .. })));
    }

    #[test]
    fn test_has_azs() {
        let network = parse(json!({
            "name": "foo",
            "subnets": [
                {"range": "10.1.0.0/24", "az": "zone_1"},
                {"range": "10.2.0.0/24", "az": "zone_1"},
                {"range": "10.3.0.0/24", "az": "zone_2"}
            ]
        }))
        .unwrap();

        assert_eq!(network.availability_zone_names(), &["zone_1", "zone_2"]);
        assert!(network.has_azs(Some(&[])));
        assert!(network.has_azs(Some(&["zone_1".to_string()])));
        assert!(network.has_azs(Some(&["zone_1".to_string(), "zone_2".to_string()])));
        assert!(!network.has_azs(Some(&["zone_1".to_string(), "zone_3".to_string()])));
        assert!(!network.has_azs(None));
    }

    #[test]
    fn test_has_azs_without_subnets() {
        let network = parse(json!({"name": "foo", "subnets": []})).unwrap();
        assert!(network.has_azs(None));
        assert!(network.has_azs(Some(&["zone_9".to_string()])));
    }

    #[test]
    fn test_network_settings() {
        let network = parse(json!({
            "name": "foo",
            "subnets": [{
                "range": "192.168.1.0/24",
                "gateway": "192.168.1.1",
                "dns": ["192.168.1.1", "192.168.1.2"],
                "static": ["192.168.1.2"],
                "cloud_properties": {"name": "VM Network"}
            }]
        }))
        .unwrap();
        let reservation = Reservation::new_static(instance(), "foo", "192.168.1.2".parse().unwrap());

        let settings = network.network_settings(&reservation, None).unwrap();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "type": "manual",
                "ip": "192.168.1.2",
                "netmask": "255.255.255.0",
                "gateway": "192.168.1.1",
                "cloud_properties": {"name": "VM Network"},
                "dns": ["192.168.1.1", "192.168.1.2"],
                "default": ["dns", "gateway"]
            })
        );

        let without_defaults = network.network_settings(&reservation, Some(&[])).unwrap();
        match without_defaults {
            NetworkSettings::Manual { default, .. } => assert!(default.is_empty()),
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_network_settings_requires_ip() {
        let network = parse(json!({"name": "foo", "subnets": [{"range": "10.0.0.0/24"}]})).unwrap();
        let reservation = Reservation::new_dynamic(instance(), "foo");

        assert_eq!(
            network.network_settings(&reservation, None).unwrap_err(),
            TopologyError::MissingIpForReservation {
                network: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_network_settings_ip_outside_subnets() {
        let network = parse(json!({"name": "foo", "subnets": [{"range": "10.0.0.0/24"}]})).unwrap();
        let reservation = Reservation::new_static(instance(), "foo", "10.9.0.5".parse().unwrap());

        assert!(matches!(
            network.network_settings(&reservation, None),
            Err(TopologyError::IpNotInNetwork { .. })
        ));
    }
}
