// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Topology Domain Models
//!
//! Value objects and aggregates describing a declared network topology.
//!
//! # Value Objects with Invariants
//!
//! - [`AddressRange`] - Inclusive IPv4 range (single address, `a-b` or CIDR)
//! - [`AvailabilityZone`] - Named fault-isolation domain
//! - [`ManualNetworkSubnet`] - CIDR subnet with gateway, DNS and address pools
//! - [`VipNetworkSubnet`] - Pool of floating static addresses
//! - [`Reservation`] - Binding of an instance to an address on a network
//!
//! # Aggregates
//!
//! - [`ManualNetwork`] / [`VipNetwork`] - Named collections of subnets
//! - [`Network`] - Either network variant
//! - [`Topology`] - Every zone and network of one cloud config

pub mod address;
pub mod availability_zone;
pub mod invariants;
pub mod manual_network;
pub mod manual_subnet;
pub mod network;
pub mod reservation;
pub mod subnet;
pub mod topology;
pub mod vip_network;
pub mod vip_subnet;

pub use address::{AddressError, AddressRange};
pub use availability_zone::AvailabilityZone;
pub use invariants::{CloudProperties, Declaration};
pub use manual_network::ManualNetwork;
pub use manual_subnet::ManualNetworkSubnet;
pub use network::{DefaultCategory, Network, NetworkKind, NetworkSettings, DEFAULT_CATEGORIES};
pub use reservation::{InstanceRef, Reservation, ReservationType};
pub use subnet::Subnet;
pub use topology::Topology;
pub use vip_network::VipNetwork;
pub use vip_subnet::VipNetworkSubnet;
