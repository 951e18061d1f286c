// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Check
//!
//! Loads a cloud config, parses its network topology and logs a summary.
//! When a legacy state file is given, every instance in it is reconciled
//! against the topology and the reservations it already holds are logged.
//!
//! Run with: cargo run --bin topology-check
//!
//! Environment:
//! 1. `CLOUD_CONFIG_PATH` - cloud config, YAML or JSON (required)
//! 2. `LEGACY_STATE_PATH` - legacy instance state (optional), shaped as
//!    `[{"instance_group": "web", "index": 0, "networks": {"private": {"ip": "10.0.0.5"}}}]`
//! 3. `TOPOLOGY_REQUIRE_GATEWAY`, `TOPOLOGY_DIRECTOR_IPS` - parse switches
//! 4. `RUST_LOG` - log filter

use anyhow::{Context, Result};
use cim_network_topology::{
    telemetry, InMemoryIpAddressStore, InstanceRef, Network, NetworkReservationRepository,
    Topology, TopologyConfig,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn, Level};
use uuid::Uuid;

/// Legacy state of one instance
#[derive(Debug, Deserialize)]
struct LegacyInstance {
    #[serde(default)]
    id: Option<Uuid>,
    instance_group: String,
    index: u32,
    #[serde(default)]
    availability_zone: Option<String>,
    #[serde(default)]
    networks: Value,
}

impl LegacyInstance {
    fn into_parts(self) -> (InstanceRef, Value) {
        let mut instance = InstanceRef::new(
            self.id.unwrap_or_else(Uuid::now_v7),
            self.instance_group,
            self.index,
        );
        if let Some(zone) = self.availability_zone {
            instance = instance.in_availability_zone(zone);
        }
        (instance, self.networks)
    }
}

/// Read a YAML or JSON document; YAML is a superset so one parser covers both
fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn log_topology(topology: &Topology) {
    for zone in topology.sorted_availability_zones() {
        info!(zone = zone.name(), cpi = ?zone.cpi(), "Availability zone");
    }

    for network in topology.networks() {
        match network {
            Network::Manual(manual) => {
                for subnet in manual.subnets() {
                    info!(
                        network = manual.name(),
                        range = %subnet.range(),
                        gateway = ?subnet.gateway(),
                        dynamic = subnet.dynamic_addresses().count(),
                        "Manual subnet"
                    );
                }
            }
            Network::Vip(vip) => {
                info!(network = vip.name(), subnets = vip.subnets().len(), "Vip network");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing(Level::INFO);

    let cloud_config_path = PathBuf::from(
        std::env::var("CLOUD_CONFIG_PATH").context("CLOUD_CONFIG_PATH not set")?,
    );
    let legacy_state_path = std::env::var("LEGACY_STATE_PATH").ok().map(PathBuf::from);
    let config = TopologyConfig::from_env().context("Invalid topology configuration")?;

    info!(path = %cloud_config_path.display(), "Loading cloud config");
    let cloud_config = load_document(&cloud_config_path)?;
    let topology = Arc::new(
        Topology::parse(&cloud_config, &config).context("Cloud config has an invalid topology")?,
    );
    log_topology(&topology);

    let Some(legacy_state_path) = legacy_state_path else {
        return Ok(());
    };

    let instances: Vec<LegacyInstance> = serde_json::from_value(load_document(&legacy_state_path)?)
        .context("Legacy state must be a list of instances")?;
    let batch: Vec<_> = instances.into_iter().map(LegacyInstance::into_parts).collect();

    let repository =
        NetworkReservationRepository::new(topology.clone(), Arc::new(InMemoryIpAddressStore::new()));
    let results = repository
        .fetch_for_instances(&batch)
        .await
        .context("Failed to reconcile legacy state")?;

    for ((instance, _), reservations) in batch.iter().zip(&results) {
        for reservation in reservations.iter() {
            info!(instance = %instance, "{}", reservation);
        }
        for network in reservations.missing_networks(&topology) {
            warn!(instance = %instance, network, "No existing reservation, will be allocated");
        }
    }

    Ok(())
}
