// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::community::CommunityDictionary;
use crate::error::{Entity, Error};
use crate::raw::RawAdvertisement;
use pool_types::{AddressFamily, Prefix};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_LOCAL_PREF: u32 = 0;

/// How addresses handed out from a pool are announced.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct Advertisement {
    /// Prefix length at which allocated addresses are aggregated before
    /// being announced. The family host length announces each address
    /// individually.
    pub aggregation_length: u8,

    pub local_pref: u32,

    pub communities: BTreeSet<u32>,
}

/// Validate one advertisement of a pool whose blocks are `cidrs`.
///
/// The aggregation length defaults to the host length of `family` and may
/// not be shorter than the prefix of any block in the pool.
pub fn validate(
    entity: Entity,
    raw: Option<RawAdvertisement>,
    family: AddressFamily,
    cidrs: &[Prefix],
    dictionary: &CommunityDictionary,
) -> Result<Advertisement, Error> {
    let raw = raw.unwrap_or_default();
    let max = family.host_length();

    let aggregation_length = match raw.aggregation_length {
        None => max,
        Some(length) if length > u32::from(max) => {
            return Err(Error::AggregationLengthTooLong {
                entity,
                length,
                max,
                family,
            })
        }
        Some(length) => length as u8,
    };

    if let Some(cidr) =
        cidrs.iter().find(|c| c.length() > aggregation_length)
    {
        return Err(Error::IncompatibleAggregationLength {
            entity,
            length: aggregation_length,
            cidr: *cidr,
        });
    }

    let mut communities = BTreeSet::new();
    for value in raw.communities.unwrap_or_default() {
        match dictionary.resolve(&value) {
            Ok(c) => {
                communities.insert(c);
            }
            Err(source) => {
                return Err(Error::Community {
                    entity,
                    value,
                    source,
                })
            }
        }
    }

    Ok(Advertisement {
        aggregation_length,
        local_pref: raw.localpref.unwrap_or(DEFAULT_LOCAL_PREF),
        communities,
    })
}
