// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::community::CommunityDictionary;
use crate::error::Error;
use crate::log::{config_log, discard_logger};
use crate::peer::{self, Peer};
use crate::pool::{Pool, PoolValidator};
use crate::raw::decode;
use crate::UNIT_CONFIG;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::collections::BTreeMap;
use std::net::IpAddr;

/// A validated configuration.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct Config {
    pub peers: Vec<Peer>,

    /// Pools keyed by name. No two pools have overlapping blocks.
    pub pools: BTreeMap<String, Pool>,
}

impl Config {
    /// The pool owning `addr`, if any. Pools never overlap, so at most one
    /// pool can match.
    pub fn pool_for(&self, addr: IpAddr) -> Option<&Pool> {
        self.pools.values().find(|p| p.contains(addr))
    }
}

/// Builds [`Config`]s from documents, logging as it goes.
#[derive(Clone)]
pub struct ConfigParser {
    log: Logger,
}

impl ConfigParser {
    pub fn new(log: Logger) -> Self {
        Self { log }
    }

    /// Decode and validate a document. Either every peer and pool is valid
    /// and a complete configuration is returned, or the first error found
    /// is returned and nothing else.
    pub fn parse(&self, raw: &[u8]) -> Result<Config, Error> {
        match self.build(raw) {
            Ok(config) => {
                config_log!(self.log, info, UNIT_CONFIG,
                    "configuration loaded";
                    "peers" => config.peers.len(),
                    "pools" => config.pools.len()
                );
                Ok(config)
            }
            Err(e) => {
                config_log!(self.log, warn, UNIT_CONFIG,
                    "configuration rejected: {}", e;
                    "kind" => format!("{:?}", e.kind())
                );
                Err(e)
            }
        }
    }

    fn build(&self, raw: &[u8]) -> Result<Config, Error> {
        let doc = decode(raw)?;

        let peers = doc
            .peers
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, p)| peer::validate(&self.log, i, p))
            .collect::<Result<Vec<_>, _>>()?;

        let dictionary = CommunityDictionary::build(
            &self.log,
            doc.communities.unwrap_or_default(),
        )?;

        let mut validator = PoolValidator::new(self.log.clone(), &dictionary);
        let mut pools = BTreeMap::new();
        for (i, p) in
            doc.address_pools.unwrap_or_default().into_iter().enumerate()
        {
            let pool = validator.validate(i, p)?;
            pools.insert(pool.name.clone(), pool);
        }

        Ok(Config { peers, pools })
    }
}

/// Decode and validate a document without logging.
pub fn parse(raw: &[u8]) -> Result<Config, Error> {
    ConfigParser::new(discard_logger()).parse(raw)
}
