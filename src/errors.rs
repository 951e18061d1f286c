// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology parsing and network settings

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::domain::address::AddressError;

/// Errors raised while building or querying a network topology
///
/// Every variant carries enough context (network, zone, offending value)
/// to render an actionable message for an operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A required key is absent
    #[error("Required property '{field}' was not specified in {context}")]
    MissingField { field: String, context: String },

    /// A key is present but has the wrong shape
    #[error("Property '{field}' in {context} must be {expected}, got {actual}")]
    InvalidType {
        field: String,
        context: String,
        expected: &'static str,
        actual: String,
    },

    /// Structurally contradictory network declaration
    #[error("Network '{network}' {reason}")]
    InvalidNetworkProperty { network: String, reason: String },

    /// A subnet references a zone that was never declared
    #[error("Network '{network}' refers to an unknown availability zone '{zone}'")]
    UnknownAvailabilityZone { network: String, zone: String },

    /// Two manual subnets share address space
    #[error("Network '{network}' has overlapping subnets '{first}' and '{second}'")]
    OverlappingSubnets {
        network: String,
        first: String,
        second: String,
    },

    /// Some subnets declare zones and some do not
    #[error("Subnets on network '{network}' must all either specify availability zone or not")]
    InconsistentAvailabilityZoneUsage { network: String },

    /// Settings requested for a reservation that has no address yet
    #[error("Failed to generate network settings for network '{network}': instance network reservation without an IP")]
    MissingIpForReservation { network: String },

    /// Default route hints requested from a floating network
    #[error("Can't provide any defaults for vip network '{network}'")]
    UnsupportedDefaultsForVipNetwork { network: String },

    /// Address, range or CIDR text could not be interpreted
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Gateway fails one of the placement rules
    #[error("Invalid gateway '{gateway}' for network '{network}': {reason}")]
    InvalidGateway {
        network: String,
        gateway: String,
        reason: String,
    },

    /// Reserved entry outside the subnet range
    #[error("Reserved IP '{ip}' is out of network '{network}' range")]
    ReservedIpOutOfRange { network: String, ip: Ipv4Addr },

    /// Static entry outside the usable part of the subnet range
    #[error("Static IP '{ip}' is out of network '{network}' range")]
    StaticIpOutOfRange { network: String, ip: Ipv4Addr },

    /// Static entry collides with the reserved pool
    #[error("Static IP '{ip}' is in network '{network}' reserved range")]
    StaticIpInReservedRange { network: String, ip: Ipv4Addr },

    /// Reservation address belongs to no subnet of the network
    #[error("IP '{ip}' does not belong to any subnet of network '{network}'")]
    IpNotInNetwork { network: String, ip: Ipv4Addr },

    /// Network `type` other than manual or vip
    #[error("Network '{network}' has unsupported type '{kind}'")]
    UnsupportedNetworkType { network: String, kind: String },

    /// Same network name declared twice
    #[error("Duplicate network name '{0}'")]
    DuplicateNetworkName(String),

    /// Same availability zone name declared twice
    #[error("Duplicate availability zone name '{0}'")]
    DuplicateAvailabilityZone(String),

    /// Malformed environment configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;
