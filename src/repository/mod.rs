// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Reservation Repository
//!
//! Rebuilds the reservations an instance already holds so the allocator
//! does not hand its addresses out again. Three sources are reconciled per
//! network of the topology, in order:
//!
//! ```text
//! IpAddressStore record ──found──→ existing reservation
//!         │ none
//!         ↓
//! legacy state {network: {ip}} ──found──→ existing reservation
//!         │ none
//!         ↓
//! no reservation (to be allocated)
//! ```
//!
//! Lookups only read. Both the topology and the store are shared, so many
//! instances may be reconciled concurrently.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::Ipv4Addr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::address::{parse_address, AddressError};
use crate::domain::{InstanceRef, Network, Reservation, Topology};
use crate::errors::TopologyError;

pub mod memory;

pub use memory::InMemoryIpAddressStore;

/// Repository result type
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Reconciliation errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The persisted-address store failed
    #[error("IP address store error: {0}")]
    Store(String),

    /// Legacy state holds an address that cannot be parsed
    #[error("Invalid legacy IP '{value}' for network '{network}': {source}")]
    InvalidLegacyAddress {
        network: String,
        value: String,
        #[source]
        source: AddressError,
    },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Persisted association of an address with an instance on a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressRecord {
    pub id: Uuid,
    pub instance_id: Uuid,
    pub network_name: String,
    pub address: Ipv4Addr,
    /// Whether the address came from the static pool
    pub static_ip: bool,
    pub created_at: DateTime<Utc>,
}

impl IpAddressRecord {
    pub fn new(instance_id: Uuid, network_name: impl Into<String>, address: Ipv4Addr) -> Self {
        Self {
            id: Uuid::now_v7(),
            instance_id,
            network_name: network_name.into(),
            address,
            static_ip: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_static_ip(mut self, static_ip: bool) -> Self {
        self.static_ip = static_ip;
        self
    }
}

/// Read access to persisted IP-address records
///
/// Implementations must be safe to query from many tasks at once. A
/// missing record is `Ok(None)`, never an error.
#[async_trait]
pub trait IpAddressStore: Send + Sync {
    /// Record holding `instance_id`'s address on `network_name`, if any
    async fn find_for_instance(
        &self,
        instance_id: Uuid,
        network_name: &str,
    ) -> RepositoryResult<Option<IpAddressRecord>>;
}

/// Reservations reconstructed for one instance, at most one per network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationSet {
    reservations: Vec<Reservation>,
}

impl ReservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reservation, replacing any earlier one on the same network
    pub fn insert(&mut self, reservation: Reservation) {
        self.reservations
            .retain(|existing| existing.network_name() != reservation.network_name());
        self.reservations.push(reservation);
    }

    pub fn find_for_network(&self, network_name: &str) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|reservation| reservation.network_name() == network_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Networks of `topology` with no reservation in this set
    pub fn missing_networks<'a>(&self, topology: &'a Topology) -> Vec<&'a str> {
        topology
            .networks()
            .iter()
            .map(Network::name)
            .filter(|name| self.find_for_network(name).is_none())
            .collect()
    }
}

impl IntoIterator for ReservationSet {
    type Item = Reservation;
    type IntoIter = std::vec::IntoIter<Reservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.reservations.into_iter()
    }
}

/// Reconciles persisted and legacy addresses against the topology
#[derive(Clone)]
pub struct NetworkReservationRepository {
    topology: Arc<Topology>,
    store: Arc<dyn IpAddressStore>,
}

impl NetworkReservationRepository {
    pub fn new(topology: Arc<Topology>, store: Arc<dyn IpAddressStore>) -> Self {
        Self { topology, store }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Reservations `instance` already holds on each network
    ///
    /// `legacy_state` is the instance's network blob from older manifests,
    /// keyed by network name; `null` or a non-map value means no legacy
    /// data.
    ///
    /// # Errors
    ///
    /// - `Store` if the record lookup fails
    /// - `InvalidLegacyAddress` if a legacy `ip` cannot be parsed
    #[tracing::instrument(skip_all, fields(instance = %instance))]
    pub async fn fetch_network_reservations(
        &self,
        instance: &InstanceRef,
        legacy_state: &Value,
    ) -> RepositoryResult<ReservationSet> {
        let mut reservations = ReservationSet::new();

        for network in self.topology.networks() {
            let name = network.name();

            if let Some(record) = self.store.find_for_instance(instance.id, name).await? {
                debug!(network = name, ip = %record.address, "Found persisted IP address");
                reservations.insert(Reservation::new_existing(instance.clone(), name, record.address));
                continue;
            }

            if let Some(ip) = legacy_ip(legacy_state, name)? {
                warn!(
                    network = name,
                    ip = %ip,
                    "No IP address record, using legacy network state"
                );
                reservations.insert(Reservation::new_existing(instance.clone(), name, ip));
            }
        }

        info!(
            reservations = reservations.len(),
            networks = self.topology.networks().len(),
            "Reconciled network reservations"
        );
        Ok(reservations)
    }

    /// Reconcile a batch of instances concurrently, preserving input order
    pub async fn fetch_for_instances(
        &self,
        instances: &[(InstanceRef, Value)],
    ) -> RepositoryResult<Vec<ReservationSet>> {
        try_join_all(
            instances
                .iter()
                .map(|(instance, legacy_state)| self.fetch_network_reservations(instance, legacy_state)),
        )
        .await
    }
}

/// `ip` of the legacy entry for `network_name`
///
/// Strings and numbers are accepted, both in dotted or integer form.
fn legacy_ip(legacy_state: &Value, network_name: &str) -> RepositoryResult<Option<Ipv4Addr>> {
    let Some(entry) = legacy_state.get(network_name).and_then(Value::as_object) else {
        return Ok(None);
    };

    let text = match entry.get("ip") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    parse_address(&text)
        .map(Some)
        .map_err(|source| RepositoryError::InvalidLegacyAddress {
            network: network_name.to_string(),
            value: text,
            source,
        })
}
