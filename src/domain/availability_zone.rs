// Copyright (c) 2025 - Cowboy AI, Inc.
//! Availability Zone Value Object
//!
//! A named fault-isolation domain carrying opaque cloud properties and an
//! optional CPI identifier. Zones are rebuilt from the cloud config on every
//! planning pass and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

use super::invariants::{
    cloud_properties, optional_list, optional_string, require_map, required_name, CloudProperties,
};
use crate::errors::{TopologyError, TopologyResult};

/// Cloud config key holding the zone declarations
pub const AVAILABILITY_ZONES_KEY: &str = "azs";

/// Availability zone
///
/// Equality, hashing and ordering only consider the zone name, so zone
/// collections sort deterministically.
///
/// # Examples
///
/// ```rust
/// use cim_network_topology::domain::AvailabilityZone;
/// use serde_json::json;
///
/// let zones = AvailabilityZone::parse_all(&json!({
///     "azs": [{"name": "z2"}, {"name": "z1", "cpi": "vsphere"}]
/// })).unwrap();
///
/// assert_eq!(zones[0].name(), "z2");
/// assert_eq!(zones[1].cpi(), Some("vsphere"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityZone {
    name: String,

    #[serde(default)]
    cloud_properties: CloudProperties,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    cpi: Option<String>,
}

impl AvailabilityZone {
    pub fn new(name: impl Into<String>, cloud_properties: CloudProperties) -> Self {
        Self {
            name: name.into(),
            cloud_properties,
            cpi: None,
        }
    }

    /// Pin the zone to a named CPI
    pub fn with_cpi(mut self, cpi: impl Into<String>) -> Self {
        self.cpi = Some(cpi.into());
        self
    }

    /// Parse one zone declaration
    ///
    /// # Invariants
    /// - `name` present and a non-empty string
    /// - `cloud_properties` a map when present, `{}` otherwise
    /// - `cpi` a string when present
    pub fn parse(declaration: &Value) -> TopologyResult<Self> {
        let declaration = require_map(declaration, AVAILABILITY_ZONES_KEY, "cloud config")?;

        let name = required_name(declaration, "name", "availability zone")?;
        let context = format!("availability zone '{}'", name);
        let cloud_properties = cloud_properties(declaration, &context)?;
        let cpi = optional_string(declaration, "cpi", &context)?;

        Ok(Self {
            name,
            cloud_properties,
            cpi,
        })
    }

    /// Parse every zone of a cloud config, in declaration order
    ///
    /// An absent document or an absent `azs` key yields no zones.
    pub fn parse_all(cloud_config: &Value) -> TopologyResult<Vec<Self>> {
        let document = match cloud_config {
            Value::Null => return Ok(Vec::new()),
            other => require_map(other, "cloud config", "cloud config document")?,
        };

        let Some(entries) = optional_list(document, AVAILABILITY_ZONES_KEY, "cloud config")? else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut zones = Vec::with_capacity(entries.len());

        for entry in entries {
            let zone = Self::parse(entry)?;
            if !seen.insert(zone.name.clone()) {
                return Err(TopologyError::DuplicateAvailabilityZone(zone.name));
            }
            debug!(zone = %zone.name, cpi = ?zone.cpi, "Parsed availability zone");
            zones.push(zone);
        }

        Ok(zones)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cloud_properties(&self) -> &CloudProperties {
        &self.cloud_properties
    }

    pub fn cpi(&self) -> Option<&str> {
        self.cpi.as_deref()
    }
}

impl PartialEq for AvailabilityZone {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AvailabilityZone {}

impl Hash for AvailabilityZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for AvailabilityZone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AvailabilityZone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_in_declaration_order() {
        let zones = AvailabilityZone::parse_all(&json!({
            "azs": [
                {"name": "zone_b", "cloud_properties": {"datacenter": "dc2"}},
                {"name": "zone_a"},
            ]
        }))
        .unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].name(), "zone_b");
        assert_eq!(zones[0].cloud_properties()["datacenter"], json!("dc2"));
        assert_eq!(zones[1].name(), "zone_a");
        assert!(zones[1].cloud_properties().is_empty());
        assert_eq!(zones[1].cpi(), None);
    }

    #[test]
    fn test_absent_list_is_empty() {
        assert!(AvailabilityZone::parse_all(&json!({})).unwrap().is_empty());
        assert!(AvailabilityZone::parse_all(&json!({"azs": null})).unwrap().is_empty());
        assert!(AvailabilityZone::parse_all(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_missing_name() {
        let result = AvailabilityZone::parse(&json!({"cloud_properties": {}}));
        assert!(matches!(result, Err(TopologyError::MissingField { .. })));
    }

    #[test]
    fn test_non_string_name() {
        let result = AvailabilityZone::parse(&json!({"name": 7}));
        assert!(matches!(result, Err(TopologyError::InvalidType { .. })));
    }

    #[test]
    fn test_invalid_cloud_properties_and_cpi() {
        assert!(matches!(
            AvailabilityZone::parse(&json!({"name": "z1", "cloud_properties": "nope"})),
            Err(TopologyError::InvalidType { .. })
        ));
        assert!(matches!(
            AvailabilityZone::parse(&json!({"name": "z1", "cpi": ["a"]})),
            Err(TopologyError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_duplicate_zone_names() {
        let result = AvailabilityZone::parse_all(&json!({
            "azs": [{"name": "z1"}, {"name": "z1"}]
        }));
        assert_eq!(
            result.unwrap_err(),
            TopologyError::DuplicateAvailabilityZone("z1".to_string())
        );
    }

    #[test]
    fn test_ordering_by_name() {
        let mut zones = vec![
            AvailabilityZone::new("c", CloudProperties::new()),
            AvailabilityZone::new("a", CloudProperties::new()).with_cpi("cpi-1"),
            AvailabilityZone::new("b", CloudProperties::new()),
        ];
        zones.sort();

        let names: Vec<_> = zones.iter().map(|z| z.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(
            AvailabilityZone::new("a", CloudProperties::new()),
            AvailabilityZone::new("a", CloudProperties::new()).with_cpi("other")
        );
    }
}
