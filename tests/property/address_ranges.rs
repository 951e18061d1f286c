// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Address Arithmetic
//!
//! Containment, overlap and expansion properties of address ranges and
//! CIDR blocks that must hold for every input.

use cim_network_topology::domain::address::{blocks_overlap, expand_ranges, parse_cidr};
use cim_network_topology::domain::AddressRange;
use ipnetwork::Ipv4Network;
use proptest::prelude::*;
use std::net::Ipv4Addr;

// ============================================================================
// Strategies
// ============================================================================

/// Ranges of at most 512 addresses so expansion stays cheap
fn small_range() -> impl Strategy<Value = AddressRange> {
    (any::<u32>(), 0u32..512).prop_map(|(start, width)| {
        let first = start.min(u32::MAX - width);
        AddressRange::new(Ipv4Addr::from(first), Ipv4Addr::from(first + width))
            .expect("first never exceeds last")
    })
}

fn cidr_block() -> impl Strategy<Value = Ipv4Network> {
    (any::<u32>(), 8u8..=32).prop_map(|(address, prefix)| {
        let block = Ipv4Network::new(Ipv4Addr::from(address), prefix).expect("valid prefix");
        Ipv4Network::new(block.network(), prefix).expect("valid prefix")
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_range_contains_its_bounds(range in small_range()) {
        prop_assert!(range.contains(range.first()));
        prop_assert!(range.contains(range.last()));
        prop_assert!(range.len() >= 1);
    }

    #[test]
    fn prop_overlap_is_symmetric(a in small_range(), b in small_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn prop_range_overlaps_itself(range in small_range()) {
        prop_assert!(range.overlaps(&range));
    }

    #[test]
    fn prop_expansion_size_matches_len(range in small_range()) {
        let addresses = expand_ranges([&range]);
        prop_assert_eq!(addresses.len() as u64, range.len());
        prop_assert!(addresses.iter().all(|address| range.contains(*address)));
    }

    #[test]
    fn prop_overlap_iff_shared_address(a in small_range(), b in small_range()) {
        let shared = expand_ranges([&a]).intersection(&expand_ranges([&b])).count() > 0;
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn prop_display_round_trips(range in small_range()) {
        let reparsed: AddressRange = range.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, range);
    }

    #[test]
    fn prop_cidr_parse_normalises(address in any::<u32>(), prefix in 8u8..=32) {
        let text = format!("{}/{}", Ipv4Addr::from(address), prefix);
        let block = parse_cidr(&text).unwrap();

        prop_assert_eq!(block.prefix(), prefix);
        prop_assert!(block.contains(Ipv4Addr::from(address)));
        prop_assert_eq!(block.ip(), block.network());
    }

    #[test]
    fn prop_nested_blocks_overlap(block in cidr_block(), extra in 0u8..8) {
        let prefix = (block.prefix() + extra).min(32);
        let inner = Ipv4Network::new(block.network(), prefix).unwrap();

        prop_assert!(blocks_overlap(&block, &inner));
        prop_assert!(blocks_overlap(&inner, &block));
    }
}
