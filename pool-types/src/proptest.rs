// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for prefix and community types using proptest

use crate::community;
use crate::{Prefix, Prefix4, Prefix6};
use proptest::prelude::*;
use std::net::{Ipv4Addr, Ipv6Addr};

// Strategy for generating valid IPv4 prefixes
fn ipv4_prefix_strategy() -> impl Strategy<Value = Prefix4> {
    (any::<u32>(), 0u8..=32u8).prop_map(|(addr_bits, length)| {
        Prefix4::new(Ipv4Addr::from(addr_bits), length)
    })
}

// Strategy for generating valid IPv6 prefixes
fn ipv6_prefix_strategy() -> impl Strategy<Value = Prefix6> {
    (any::<u128>(), 0u8..=128u8).prop_map(|(addr_bits, length)| {
        Prefix6::new(Ipv6Addr::from(addr_bits), length)
    })
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        ipv4_prefix_strategy().prop_map(Prefix::V4),
        ipv6_prefix_strategy().prop_map(Prefix::V6),
    ]
}

proptest! {
    /// Property: host bits are always unset after construction
    #[test]
    fn prop_host_bits_always_unset(prefix in prefix_strategy()) {
        prop_assert!(
            prefix.host_bits_are_unset(),
            "prefix {prefix} should have host bits unset"
        );
    }

    /// Property: display output parses back to the same prefix
    #[test]
    fn prop_display_parses_back(prefix in prefix_strategy()) {
        let parsed: Prefix = prefix.to_string().parse().unwrap();
        prop_assert_eq!(parsed, prefix);
    }

    /// Property: every prefix overlaps itself
    #[test]
    fn prop_overlaps_self(prefix in prefix_strategy()) {
        prop_assert!(prefix.overlaps(&prefix));
    }

    /// Property: overlap is symmetric
    #[test]
    fn prop_overlap_symmetric(a in prefix_strategy(), b in prefix_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Property: a prefix overlaps any shorter prefix of its own address
    #[test]
    fn prop_overlaps_covering_prefix(
        prefix in ipv4_prefix_strategy(),
        shorter in 0u8..=32u8,
    ) {
        let shorter = shorter.min(prefix.length);
        let covering = Prefix4::new(prefix.value, shorter);
        prop_assert!(prefix.within(&covering));
        prop_assert!(prefix.overlaps(&covering));
    }

    /// Property: a prefix contains its own network address
    #[test]
    fn prop_contains_network_address(prefix in prefix_strategy()) {
        let addr = match prefix {
            Prefix::V4(p) => p.value.into(),
            Prefix::V6(p) => p.value.into(),
        };
        prop_assert!(prefix.contains(addr));
    }

    /// Property: community halves survive packing
    #[test]
    fn prop_community_parts(high in any::<u16>(), low in any::<u16>()) {
        let value = community::from_parts(high, low);
        prop_assert_eq!(community::parts(value), (high, low));
        prop_assert_eq!(community::format(value), format!("{high}:{low}"));
    }
}
