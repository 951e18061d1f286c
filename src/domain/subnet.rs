// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Capability
//!
//! Behaviour shared by every subnet variant. Both manual and vip subnets
//! resolve their availability zones through [`parse_availability_zones`],
//! so the `az`/`azs` rules are enforced in exactly one place.

use serde_json::Value;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use super::availability_zone::AvailabilityZone;
use super::invariants::{optional_string, string_list, value_kind, CloudProperties, Declaration};
use crate::errors::{TopologyError, TopologyResult};

/// Singular zone key of a subnet declaration
pub const AZ_KEY: &str = "az";

/// Plural zone key of a subnet declaration
pub const AZS_KEY: &str = "azs";

/// Common subnet contract
pub trait Subnet {
    /// Zones this subnet belongs to; empty when zone-agnostic
    fn availability_zone_names(&self) -> &[String];

    fn cloud_properties(&self) -> &CloudProperties;

    /// Addresses that may be handed out as static IPs
    fn static_addresses(&self) -> &BTreeSet<Ipv4Addr>;

    fn has_availability_zones(&self) -> bool {
        !self.availability_zone_names().is_empty()
    }

    fn is_in_availability_zone(&self, zone: &str) -> bool {
        self.availability_zone_names().iter().any(|name| name == zone)
    }
}

/// Resolve the zones a subnet declaration belongs to
///
/// # Rules
/// - `az` and `azs` together fail `InvalidNetworkProperty`
/// - `azs` must be a non-empty list of known zone names
/// - `az` must be a string naming a known zone (`null` fails `InvalidType`)
/// - neither key yields an empty list without consulting `known_zones`
pub fn parse_availability_zones(
    declaration: &Declaration,
    network_name: &str,
    known_zones: &[AvailabilityZone],
) -> TopologyResult<Vec<String>> {
    let context = format!("network '{}' subnet", network_name);

    let names = match (declaration.get(AZ_KEY), declaration.get(AZS_KEY)) {
        (Some(_), Some(_)) => {
            return Err(TopologyError::InvalidNetworkProperty {
                network: network_name.to_string(),
                reason: "contains both 'az' and 'azs'. Choose one.".to_string(),
            })
        }
        (None, Some(Value::Array(values))) => {
            if values.is_empty() {
                return Err(TopologyError::InvalidNetworkProperty {
                    network: network_name.to_string(),
                    reason: "refers to an empty 'azs' array".to_string(),
                });
            }
            string_list(values, AZS_KEY, &context)?
        }
        (None, Some(other)) => {
            return Err(TopologyError::InvalidType {
                field: AZS_KEY.to_string(),
                context,
                expected: "a list",
                actual: value_kind(other).to_string(),
            })
        }
        (Some(_), None) => optional_string(declaration, AZ_KEY, &context)?
            .into_iter()
            .collect(),
        (None, None) => return Ok(Vec::new()),
    };

    for name in &names {
        if !known_zones.iter().any(|zone| zone.name() == name) {
            return Err(TopologyError::UnknownAvailabilityZone {
                network: network_name.to_string(),
                zone: name.clone(),
            });
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn zones(names: &[&str]) -> Vec<AvailabilityZone> {
        names
            .iter()
            .map(|name| AvailabilityZone::new(*name, CloudProperties::new()))
            .collect()
    }

    fn parse(declaration: Value, known: &[&str]) -> TopologyResult<Vec<String>> {
        parse_availability_zones(declaration.as_object().unwrap(), "net_a", &zones(known))
    }

    #[test_case(json!({"az": "z1", "azs": ["z1"]}) ; "both present with values")]
    #[test_case(json!({"az": null, "azs": null}) ; "both present as null")]
    #[test_case(json!({"az": "z1", "azs": []}) ; "both present with empty list")]
    fn test_az_and_azs_are_mutually_exclusive(declaration: Value) {
        let result = parse(declaration, &["z1", "z2"]);
        assert!(matches!(
            result,
            Err(TopologyError::InvalidNetworkProperty { .. })
        ));
    }

    #[test]
    fn test_azs_resolves_in_order() {
        let names = parse(json!({"azs": ["z2", "z1"]}), &["z1", "z2"]).unwrap();
        assert_eq!(names, vec!["z2", "z1"]);
    }

    #[test]
    fn test_azs_with_unknown_zone() {
        let result = parse(json!({"azs": ["z1", "bar", "z2"]}), &["z1", "z2"]);
        assert_eq!(
            result.unwrap_err(),
            TopologyError::UnknownAvailabilityZone {
                network: "net_a".to_string(),
                zone: "bar".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_azs_list() {
        let result = parse(json!({"azs": []}), &["z1"]);
        assert!(matches!(
            result,
            Err(TopologyError::InvalidNetworkProperty { .. })
        ));
    }

    #[test]
    fn test_azs_must_be_a_list() {
        let result = parse(json!({"azs": "z1"}), &["z1"]);
        assert!(matches!(result, Err(TopologyError::InvalidType { .. })));
    }

    #[test]
    fn test_single_az() {
        assert_eq!(parse(json!({"az": "z1"}), &["z1"]).unwrap(), vec!["z1"]);
        assert!(matches!(
            parse(json!({"az": "nope"}), &["z1"]),
            Err(TopologyError::UnknownAvailabilityZone { .. })
        ));
    }

    #[test]
    fn test_nil_az_is_invalid_type() {
        let result = parse(json!({"az": null}), &["z1"]);
        assert!(matches!(result, Err(TopologyError::InvalidType { .. })));
    }

    #[test]
    fn test_absent_zone_keys_never_fail() {
        assert!(parse(json!({}), &[]).unwrap().is_empty());
        assert!(parse(json!({"range": "10.0.0.0/24"}), &["z1"]).unwrap().is_empty());
    }
}
