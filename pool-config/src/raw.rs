// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode targets for configuration documents.
//!
//! Every field is optional so that an absent key can be told apart from a
//! key explicitly set to its default. List entries are optional as well: a
//! bare `-` decodes as `None` and is treated as an entry with every field
//! absent.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub peers: Option<Vec<Option<RawPeer>>>,
    pub communities: Option<BTreeMap<String, String>>,
    pub address_pools: Option<Vec<Option<RawPool>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawPeer {
    pub my_asn: Option<u32>,
    pub peer_asn: Option<u32>,
    pub peer_address: Option<String>,
    pub peer_port: Option<u16>,
    pub hold_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawPool {
    pub name: Option<String>,
    pub cidr: Option<Vec<String>>,
    pub avoid_buggy_ips: Option<bool>,
    pub advertisements: Option<Vec<Option<RawAdvertisement>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawAdvertisement {
    pub aggregation_length: Option<u32>,
    pub localpref: Option<u32>,
    pub communities: Option<Vec<String>>,
}

/// Decode a document. An empty or whitespace-only document decodes to the
/// empty configuration, as does a document holding only a null value.
pub fn decode(raw: &[u8]) -> Result<RawConfig, serde_yaml::Error> {
    if raw.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(RawConfig::default());
    }
    let doc: Option<RawConfig> = serde_yaml::from_slice(raw)?;
    Ok(doc.unwrap_or_default())
}
