// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Reservation Value Objects
//!
//! A reservation binds one instance to one address on one network. The
//! type tag decides how the allocator treats it; the address is optional
//! because dynamic reservations are only resolved by the allocator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// Reference to an instance being planned
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceRef {
    /// Persistent instance identity
    pub id: Uuid,

    /// Instance group the instance belongs to
    pub instance_group: String,

    /// Index within the instance group
    pub index: u32,

    /// Zone the instance is placed in, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub availability_zone: Option<String>,
}

impl InstanceRef {
    pub fn new(id: Uuid, instance_group: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            instance_group: instance_group.into(),
            index,
            availability_zone: None,
        }
    }

    pub fn in_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = Some(zone.into());
        self
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.instance_group, self.index, self.id)
    }
}

/// How the allocator must treat a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationType {
    /// Address chosen by the operator from the static pool
    Static,
    /// Address to be chosen by the allocator
    Dynamic,
    /// Address already held by a running instance
    Existing,
}

impl fmt::Display for ReservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationType::Static => write!(f, "static"),
            ReservationType::Dynamic => write!(f, "dynamic"),
            ReservationType::Existing => write!(f, "existing"),
        }
    }
}

/// Binding of an instance to an address on a network
///
/// # Invariants
/// - static and existing reservations always carry an address
/// - dynamic reservations carry one only after [`Reservation::resolve_ip`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    instance: InstanceRef,
    network_name: String,
    ip: Option<Ipv4Addr>,
    #[serde(rename = "type")]
    reservation_type: ReservationType,
}

impl Reservation {
    pub fn new_static(instance: InstanceRef, network_name: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            instance,
            network_name: network_name.into(),
            ip: Some(ip),
            reservation_type: ReservationType::Static,
        }
    }

    pub fn new_dynamic(instance: InstanceRef, network_name: impl Into<String>) -> Self {
        Self {
            instance,
            network_name: network_name.into(),
            ip: None,
            reservation_type: ReservationType::Dynamic,
        }
    }

    pub fn new_existing(instance: InstanceRef, network_name: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            instance,
            network_name: network_name.into(),
            ip: Some(ip),
            reservation_type: ReservationType::Existing,
        }
    }

    pub fn instance(&self) -> &InstanceRef {
        &self.instance
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    pub fn reservation_type(&self) -> ReservationType {
        self.reservation_type
    }

    /// True once an address is bound
    pub fn is_resolved(&self) -> bool {
        self.ip.is_some()
    }

    /// Bind the address chosen by the allocator
    pub fn resolve_ip(&mut self, ip: Ipv4Addr) {
        self.ip = Some(ip);
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            Some(ip) => write!(
                f,
                "{} reservation of {} on network '{}' for {}",
                self.reservation_type, ip, self.network_name, self.instance
            ),
            None => write!(
                f,
                "{} reservation on network '{}' for {}",
                self.reservation_type, self.network_name, self.instance
            ),
        }
    }
}
