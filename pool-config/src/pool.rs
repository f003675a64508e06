// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::advertisement::{self, Advertisement};
use crate::community::CommunityDictionary;
use crate::error::{Entity, Error};
use crate::log::config_log;
use crate::overlap::RangeTracker;
use crate::raw::RawPool;
use crate::UNIT_POOL;
use pool_types::{AddressFamily, Prefix};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::collections::BTreeSet;
use std::net::IpAddr;

/// A named group of address ranges with a shared advertisement policy.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct Pool {
    pub name: String,
    pub cidr: Vec<Prefix>,

    /// Skip the network and broadcast addresses of each block when handing
    /// out addresses, for clients that mishandle them.
    pub avoid_buggy_ips: bool,

    pub advertisements: Vec<Advertisement>,
}

impl Pool {
    /// The family of the first block. Pools without blocks are IPv4.
    pub fn address_family(&self) -> AddressFamily {
        family_of(&self.cidr)
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.cidr.iter().any(|c| c.contains(addr))
    }
}

fn family_of(cidr: &[Prefix]) -> AddressFamily {
    cidr.first().map(Prefix::family).unwrap_or(AddressFamily::Ipv4)
}

/// Validates pools in document order, carrying the names and address ranges
/// seen so far.
pub struct PoolValidator<'a> {
    log: Logger,
    dictionary: &'a CommunityDictionary,
    names: BTreeSet<String>,
    ranges: RangeTracker,
}

impl<'a> PoolValidator<'a> {
    pub fn new(log: Logger, dictionary: &'a CommunityDictionary) -> Self {
        Self {
            log,
            dictionary,
            names: BTreeSet::new(),
            ranges: RangeTracker::new(),
        }
    }

    /// Validate the pool at position `index` of the document.
    pub fn validate(
        &mut self,
        index: usize,
        raw: Option<RawPool>,
    ) -> Result<Pool, Error> {
        let raw = raw.unwrap_or_default();

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(Error::MissingField {
                    entity: Entity::Pool { index, name: None },
                    field: "name",
                })
            }
        };
        let entity = Entity::Pool {
            index,
            name: Some(name.clone()),
        };
        if self.names.contains(&name) {
            return Err(Error::DuplicatePool { entity });
        }

        let mut cidr = Vec::new();
        for value in raw.cidr.unwrap_or_default() {
            let block: Prefix = match value.parse() {
                Ok(block) => block,
                Err(source) => {
                    return Err(Error::Cidr {
                        entity,
                        value,
                        source,
                    })
                }
            };
            self.ranges.admit(&self.log, &entity, &name, block)?;
            cidr.push(block);
        }

        let family = family_of(&cidr);
        let mut advertisements = Vec::new();
        for (i, adv) in
            raw.advertisements.unwrap_or_default().into_iter().enumerate()
        {
            let entity = Entity::Advertisement {
                pool: name.clone(),
                index: i,
            };
            advertisements.push(advertisement::validate(
                entity,
                adv,
                family,
                &cidr,
                self.dictionary,
            )?);
        }

        config_log!(self.log, debug, UNIT_POOL,
            "validated pool {}", name;
            "index" => index,
            "blocks" => cidr.len(),
            "advertisements" => advertisements.len()
        );

        self.names.insert(name.clone());
        Ok(Pool {
            name,
            cidr,
            avoid_buggy_ips: raw.avoid_buggy_ips.unwrap_or(false),
            advertisements,
        })
    }
}
