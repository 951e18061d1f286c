// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address Value Objects with Validation Invariants
//!
//! IPv4 address parsing, CIDR blocks and inclusive address ranges. All
//! arithmetic used by subnet parsing lives here so it can be exercised
//! without any declaration handling.

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Address validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid address range: {0} (first address must not exceed last)")]
    InvalidRange(String),

    #[error("IPv6 addresses are not supported: {0}")]
    Ipv6Unsupported(String),
}

/// Parse a single IPv4 address
///
/// Accepts dotted-quad text (`192.168.1.1`) and the unsigned 32-bit integer
/// form (`3232235777`) found in older persisted state.
pub fn parse_address(text: &str) -> Result<Ipv4Addr, AddressError> {
    let text = text.trim();

    if let Ok(address) = Ipv4Addr::from_str(text) {
        return Ok(address);
    }

    if let Ok(value) = text.parse::<u32>() {
        return Ok(Ipv4Addr::from(value));
    }

    if text.contains(':') {
        return Err(AddressError::Ipv6Unsupported(text.to_string()));
    }

    Err(AddressError::InvalidIpAddress(text.to_string()))
}

/// Parse a CIDR block, normalising host bits away
///
/// `192.168.0.1/24` yields `192.168.0.0/24`.
pub fn parse_cidr(text: &str) -> Result<Ipv4Network, AddressError> {
    let text = text.trim();

    let (address, prefix) = text
        .split_once('/')
        .ok_or_else(|| AddressError::InvalidCidr(text.to_string()))?;

    let address = parse_address(address)?;
    let prefix = prefix
        .trim()
        .parse::<u8>()
        .map_err(|_| AddressError::InvalidCidr(text.to_string()))?;

    let block = Ipv4Network::new(address, prefix)
        .map_err(|_| AddressError::InvalidCidr(text.to_string()))?;

    Ipv4Network::new(block.network(), prefix)
        .map_err(|_| AddressError::InvalidCidr(text.to_string()))
}

/// Inclusive range of IPv4 addresses
///
/// Invariants:
/// - `first <= last`
///
/// # Examples
///
/// ```rust
/// use cim_network_topology::domain::AddressRange;
///
/// let range = AddressRange::parse("10.0.0.1 - 10.0.0.4").unwrap();
/// assert_eq!(range.len(), 4);
/// assert!(range.contains("10.0.0.3".parse().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressRange {
    first: Ipv4Addr,
    last: Ipv4Addr,
}

impl AddressRange {
    /// Create a range from its bounds
    pub fn new(first: Ipv4Addr, last: Ipv4Addr) -> Result<Self, AddressError> {
        if u32::from(first) > u32::from(last) {
            return Err(AddressError::InvalidRange(format!("{}-{}", first, last)));
        }
        Ok(Self { first, last })
    }

    /// Range holding exactly one address
    pub fn single(address: Ipv4Addr) -> Self {
        Self {
            first: address,
            last: address,
        }
    }

    /// Range spanning a whole CIDR block, network id and broadcast included
    pub fn from_cidr(block: &Ipv4Network) -> Self {
        Self {
            first: block.network(),
            last: block.broadcast(),
        }
    }

    /// Parse a single address, an inclusive `a-b` range or a CIDR block
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let text = text.trim();

        if text.contains('/') {
            return Ok(Self::from_cidr(&parse_cidr(text)?));
        }

        match text.split_once('-') {
            Some((first, last)) => Self::new(parse_address(first)?, parse_address(last)?),
            None => Ok(Self::single(parse_address(text)?)),
        }
    }

    pub fn first(&self) -> Ipv4Addr {
        self.first
    }

    pub fn last(&self) -> Ipv4Addr {
        self.last
    }

    /// Number of addresses in the range
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.last)) - u64::from(u32::from(self.first)) + 1
    }

    /// A range always holds at least one address
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        let value = u32::from(address);
        u32::from(self.first) <= value && value <= u32::from(self.last)
    }

    /// True when the two ranges share at least one address
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        u32::from(self.first) <= u32::from(other.last)
            && u32::from(other.first) <= u32::from(self.last)
    }

    /// Every address of the range in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        (u32::from(self.first)..=u32::from(self.last)).map(Ipv4Addr::from)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

impl FromStr for AddressRange {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AddressRange {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AddressRange> for String {
    fn from(range: AddressRange) -> Self {
        range.to_string()
    }
}

/// True when two CIDR blocks share any address
pub fn blocks_overlap(a: &Ipv4Network, b: &Ipv4Network) -> bool {
    AddressRange::from_cidr(a).overlaps(&AddressRange::from_cidr(b))
}

/// Expand ranges into a discrete, ordered address set
pub fn expand_ranges<'a>(ranges: impl IntoIterator<Item = &'a AddressRange>) -> BTreeSet<Ipv4Addr> {
    ranges.into_iter().flat_map(|range| range.iter()).collect()
}
