// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pool_types::{AddressFamily, Prefix, PrefixParseError};
use std::fmt::{self, Display};
use std::time::Duration;

fn fmt_duration(d: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*d)
}

/// The part of a configuration document an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A peer, by position in the `peers` list.
    Peer(usize),

    /// An entry of the `communities` dictionary.
    Community(String),

    /// An address pool, by position and, once known, by name.
    Pool { index: usize, name: Option<String> },

    /// An advertisement, by position within its pool.
    Advertisement { pool: String, index: usize },
}

impl Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer(index) => write!(f, "peer #{index}"),
            Self::Community(name) => write!(f, "community {name:?}"),
            Self::Pool { name: Some(name), .. } => write!(f, "pool {name:?}"),
            Self::Pool { index, name: None } => write!(f, "pool #{index}"),
            Self::Advertisement { pool, index } => {
                write!(f, "pool {pool:?} advertisement #{index}")
            }
        }
    }
}

/// Broad classification of configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is not well-formed.
    Decode,
    /// A required key is absent.
    MissingField,
    /// A value is present but does not parse into its target type.
    MalformedValue,
    /// A numeric value is outside its valid domain.
    RangeViolation,
    /// A value is well-formed but inconsistent with the rest of the document.
    Inconsistent,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("document decode error: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("{entity}: missing required field {field}")]
    MissingField {
        entity: Entity,
        field: &'static str,
    },

    #[error("{entity}: invalid {field} {value:?}: {reason}")]
    Malformed {
        entity: Entity,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{entity}: invalid CIDR {value:?}: {source}")]
    Cidr {
        entity: Entity,
        value: String,
        source: PrefixParseError,
    },

    #[error(
        "{entity}: hold time {} too small, must be 0s or at least {}",
        fmt_duration(.got),
        fmt_duration(.min)
    )]
    HoldTimeTooSmall {
        entity: Entity,
        got: Duration,
        min: Duration,
    },

    #[error(
        "{entity}: aggregation length {length} too long, max is {max} for {family}"
    )]
    AggregationLengthTooLong {
        entity: Entity,
        length: u32,
        max: u8,
        family: AddressFamily,
    },

    #[error(
        "{entity}: incompatible aggregation length {length} for CIDR {cidr}"
    )]
    IncompatibleAggregationLength {
        entity: Entity,
        length: u8,
        cidr: Prefix,
    },

    #[error("{entity}: community {value:?}: {source}")]
    Community {
        entity: Entity,
        value: String,
        source: crate::community::Error,
    },

    #[error("{entity}: duplicate pool definition")]
    DuplicatePool { entity: Entity },

    #[error("{entity}: CIDR {cidr} is already defined in pool {pool:?}")]
    DuplicateCidr {
        entity: Entity,
        cidr: Prefix,
        pool: String,
    },

    #[error("{entity}: CIDR {cidr} overlaps with {existing} in pool {pool:?}")]
    OverlappingCidr {
        entity: Entity,
        cidr: Prefix,
        existing: Prefix,
        pool: String,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::Malformed { .. } => ErrorKind::MalformedValue,
            Self::Cidr { source, .. } => match source {
                PrefixParseError::LengthOutOfRange { .. } => {
                    ErrorKind::RangeViolation
                }
                _ => ErrorKind::MalformedValue,
            },
            Self::HoldTimeTooSmall { .. }
            | Self::AggregationLengthTooLong { .. } => {
                ErrorKind::RangeViolation
            }
            Self::Community { source, .. } => source.kind(),
            Self::IncompatibleAggregationLength { .. }
            | Self::DuplicatePool { .. }
            | Self::DuplicateCidr { .. }
            | Self::OverlappingCidr { .. } => ErrorKind::Inconsistent,
        }
    }

    /// The document entity this error refers to. Decode errors are not
    /// attributable to a single entity.
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Self::Decode(_) => None,
            Self::MissingField { entity, .. }
            | Self::Malformed { entity, .. }
            | Self::Cidr { entity, .. }
            | Self::HoldTimeTooSmall { entity, .. }
            | Self::AggregationLengthTooLong { entity, .. }
            | Self::IncompatibleAggregationLength { entity, .. }
            | Self::Community { entity, .. }
            | Self::DuplicatePool { entity }
            | Self::DuplicateCidr { entity, .. }
            | Self::OverlappingCidr { entity, .. } => Some(entity),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entity_display() {
        assert_eq!(Entity::Peer(2).to_string(), "peer #2");
        assert_eq!(
            Entity::Pool {
                index: 0,
                name: None
            }
            .to_string(),
            "pool #0"
        );
        assert_eq!(
            Entity::Pool {
                index: 0,
                name: Some("pool1".into())
            }
            .to_string(),
            "pool \"pool1\""
        );
        assert_eq!(
            Entity::Advertisement {
                pool: "pool1".into(),
                index: 1
            }
            .to_string(),
            "pool \"pool1\" advertisement #1"
        );
    }

    #[test]
    fn hold_time_message() {
        let e = Error::HoldTimeTooSmall {
            entity: Entity::Peer(0),
            got: Duration::from_secs(1),
            min: Duration::from_secs(3),
        };
        assert_eq!(e.kind(), ErrorKind::RangeViolation);
        assert_eq!(
            e.to_string(),
            "peer #0: hold time 1s too small, must be 0s or at least 3s"
        );
    }
}
