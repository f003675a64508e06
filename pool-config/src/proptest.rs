// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for range admission using proptest

use crate::error::{Entity, Error};
use crate::log::discard_logger;
use crate::overlap::RangeTracker;
use pool_types::{Prefix, Prefix4};
use proptest::prelude::*;
use std::net::Ipv4Addr;

// Blocks drawn from a small corner of the address space so that overlaps
// are common.
fn block_strategy() -> impl Strategy<Value = Prefix> {
    (0u32..16, 4u8..=12u8).prop_map(|(net, length)| {
        Prefix::V4(Prefix4::new(Ipv4Addr::from(net << 24), length))
    })
}

fn entity() -> Entity {
    Entity::Pool {
        index: 0,
        name: Some("pool".into()),
    }
}

proptest! {
    /// Property: a sequence of blocks is admitted in full exactly when no
    /// two of them overlap
    #[test]
    fn prop_admits_disjoint_sets(
        blocks in prop::collection::vec(block_strategy(), 1..8)
    ) {
        let log = discard_logger();
        let mut tracker = RangeTracker::new();
        let admitted = blocks
            .iter()
            .all(|b| tracker.admit(&log, &entity(), "pool", *b).is_ok());

        let disjoint = blocks.iter().enumerate().all(|(i, a)| {
            blocks[..i].iter().all(|b| !a.overlaps(b))
        });
        prop_assert_eq!(admitted, disjoint);
    }

    /// Property: the first rejected block is the first one overlapping an
    /// earlier block, and the error cites the earliest such block
    #[test]
    fn prop_rejection_cites_earliest_conflict(
        blocks in prop::collection::vec(block_strategy(), 1..8)
    ) {
        let log = discard_logger();
        let mut tracker = RangeTracker::new();
        let mut rejected = None;
        for (i, b) in blocks.iter().enumerate() {
            if let Err(e) = tracker.admit(&log, &entity(), "pool", *b) {
                rejected = Some((i, e));
                break;
            }
        }

        let expected = blocks.iter().enumerate().find_map(|(i, a)| {
            blocks[..i].iter().find(|b| a.overlaps(b)).map(|b| (i, *b))
        });

        match (rejected, expected) {
            (None, None) => {}
            (Some((i, e)), Some((j, prior))) => {
                prop_assert_eq!(i, j);
                match e {
                    Error::DuplicateCidr { cidr, .. } => {
                        prop_assert_eq!(cidr, prior);
                    }
                    Error::OverlappingCidr { existing, .. } => {
                        prop_assert_eq!(existing, prior);
                    }
                    e => prop_assert!(false, "unexpected error {}", e),
                }
            }
            (got, want) => prop_assert!(
                false,
                "rejected {:?}, expected {:?}",
                got.map(|(i, _)| i),
                want
            ),
        }
    }
}
