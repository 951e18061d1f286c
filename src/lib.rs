// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network topology and IP reservation reconciliation for the Composable
//! Information Machine
//!
//! This crate parses the declared network topology of a cloud config
//! (availability zones, manual and vip networks with their subnets),
//! validates its address-space invariants, derives per-instance network
//! settings and rebuilds the reservations running instances already hold.
//!
//! # Architecture
//!
//! ```text
//! cloud config ──→ Topology::parse ──→ Topology (immutable, Arc-shared)
//!                                        │
//!            ┌───────────────────────────┴──────────────────────┐
//!            ↓                                                  ↓
//!   Network::network_settings(reservation)     NetworkReservationRepository
//!            ↓                                   (IpAddressStore + legacy state)
//!     NetworkSettings                                           ↓
//!                                                        ReservationSet
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod telemetry;

// Re-export commonly used types
pub use config::TopologyConfig;
pub use domain::{
    AvailabilityZone, DefaultCategory, InstanceRef, ManualNetwork, Network, NetworkSettings,
    Reservation, ReservationType, Topology, VipNetwork,
};
pub use errors::{TopologyError, TopologyResult};
pub use repository::{
    InMemoryIpAddressStore, IpAddressRecord, IpAddressStore, NetworkReservationRepository,
    RepositoryError, ReservationSet,
};
