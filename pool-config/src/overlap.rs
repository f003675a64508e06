// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracks the CIDR blocks accepted so far in a document so that no two
//! pools can claim intersecting address space.

use crate::error::{Entity, Error};
use crate::log::config_log;
use crate::UNIT_OVERLAP;
use pool_types::Prefix;
use slog::Logger;

#[derive(Debug, Clone)]
struct Admitted {
    block: Prefix,
    pool: String,
}

/// Accumulates blocks in admission order. Scoped to a single parse.
#[derive(Debug, Default, Clone)]
pub struct RangeTracker {
    admitted: Vec<Admitted>,
}

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `block` on behalf of `pool`. The block is rejected if it is
    /// identical to, or its address range intersects with, any block
    /// admitted earlier. The earliest conflicting block is cited.
    pub fn admit(
        &mut self,
        log: &Logger,
        entity: &Entity,
        pool: &str,
        block: Prefix,
    ) -> Result<(), Error> {
        if let Some(prior) = self.admitted.iter().find(|a| a.block.overlaps(&block))
        {
            config_log!(log, debug, UNIT_OVERLAP,
                "rejected {}, conflicts with {}", block, prior.block;
                "pool" => pool,
                "prior_pool" => prior.pool.as_str()
            );
            if prior.block == block {
                return Err(Error::DuplicateCidr {
                    entity: entity.clone(),
                    cidr: block,
                    pool: prior.pool.clone(),
                });
            }
            return Err(Error::OverlappingCidr {
                entity: entity.clone(),
                cidr: block,
                existing: prior.block,
                pool: prior.pool.clone(),
            });
        }

        config_log!(log, debug, UNIT_OVERLAP,
            "admitted {}", block;
            "pool" => pool
        );
        self.admitted.push(Admitted {
            block,
            pool: pool.to_string(),
        });
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.admitted.len()
    }
}
