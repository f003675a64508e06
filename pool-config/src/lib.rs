// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser and validator for BGP address pool configuration.
//!
//! A configuration document describes the BGP peers to establish sessions
//! with and named pools of address ranges, each with the advertisement
//! policy used to announce addresses handed out from it. [`parse`] turns a
//! YAML document into a [`Config`] that is guaranteed to be internally
//! consistent: pool names are unique, no two CIDR blocks overlap, community
//! values fit in their 16-bit halves and aggregation lengths are compatible
//! with the pools they apply to.
//!
//! Parsing is all-or-nothing. The first validation failure aborts the build
//! and no partial configuration is returned.

pub mod advertisement;
pub mod community;
pub mod config;
pub mod error;
pub mod log;
pub mod overlap;
pub mod peer;
pub mod pool;
pub mod raw;

#[cfg(test)]
mod proptest;

pub use advertisement::Advertisement;
pub use config::{parse, Config, ConfigParser};
pub use error::{Entity, Error, ErrorKind};
pub use peer::Peer;
pub use pool::Pool;

pub const COMPONENT_POOL_CONFIG: &str = "pool-config";
pub const UNIT_PEER: &str = "peer";
pub const UNIT_COMMUNITY: &str = "community";
pub const UNIT_POOL: &str = "pool";
pub const UNIT_OVERLAP: &str = "overlap";
pub const UNIT_CONFIG: &str = "config";
