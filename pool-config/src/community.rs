// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Community literals and the symbolic community dictionary.
//!
//! Communities are written either as a literal `<asn>:<number>` pair or as
//! the name of an entry in the document's `communities` section.

use crate::error::{Entity, ErrorKind};
use crate::log::config_log;
use crate::UNIT_COMMUNITY;
use pool_types::community;
use slog::Logger;
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("expected <asn>:<number>")]
    Format,

    #[error("ASN part {0:?} is not a number")]
    MalformedAsn(String),

    #[error("community number part {0:?} is not a number")]
    MalformedNumber(String),

    #[error("ASN part {0} doesn't fit in 16 bits")]
    AsnOverflow(String),

    #[error("community number part {0} doesn't fit in 16 bits")]
    NumberOverflow(String),

    #[error("unknown community reference")]
    UnknownReference,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format | Self::MalformedAsn(_) | Self::MalformedNumber(_) => {
                ErrorKind::MalformedValue
            }
            Self::AsnOverflow(_) | Self::NumberOverflow(_) => {
                ErrorKind::RangeViolation
            }
            Self::UnknownReference => ErrorKind::Inconsistent,
        }
    }
}

enum Half {
    Malformed,
    Overflow,
}

fn parse_half(s: &str) -> Result<u16, Half> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Half::Malformed);
    }
    // Only digits remain, so the parse can only fail by overflowing.
    s.parse::<u16>().map_err(|_| Half::Overflow)
}

/// Parse a literal `<asn>:<number>` community into its 32-bit value.
pub fn parse_literal(s: &str) -> Result<u32, Error> {
    let (asn, number) = s.split_once(':').ok_or(Error::Format)?;

    let high = parse_half(asn).map_err(|e| match e {
        Half::Malformed => Error::MalformedAsn(asn.to_string()),
        Half::Overflow => Error::AsnOverflow(asn.to_string()),
    })?;
    let low = parse_half(number).map_err(|e| match e {
        Half::Malformed => Error::MalformedNumber(number.to_string()),
        Half::Overflow => Error::NumberOverflow(number.to_string()),
    })?;

    Ok(community::from_parts(high, low))
}

/// Symbolic community names defined by a document, resolved to their values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommunityDictionary {
    entries: BTreeMap<String, u32>,
}

impl CommunityDictionary {
    /// Build the dictionary, parsing every entry as a literal. An entry that
    /// does not parse fails the build whether or not any pool refers to it.
    pub fn build(
        log: &Logger,
        raw: BTreeMap<String, String>,
    ) -> Result<Self, crate::Error> {
        let mut entries = BTreeMap::new();
        for (name, literal) in raw {
            let value = match parse_literal(&literal) {
                Ok(value) => value,
                Err(source) => {
                    return Err(crate::Error::Community {
                        entity: Entity::Community(name),
                        value: literal,
                        source,
                    })
                }
            };
            config_log!(log, debug, UNIT_COMMUNITY,
                "defined community {}", name;
                "value" => community::format(value)
            );
            entries.insert(name, value);
        }
        Ok(Self { entries })
    }

    /// Resolve a community written as a literal or as a dictionary name.
    /// Anything containing a `:` is treated as a literal.
    pub fn resolve(&self, s: &str) -> Result<u32, Error> {
        if s.contains(':') {
            return parse_literal(s);
        }
        self.get(s).ok_or(Error::UnknownReference)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.get(name).copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
