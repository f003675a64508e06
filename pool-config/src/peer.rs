// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::{Entity, Error};
use crate::log::config_log;
use crate::raw::RawPeer;
use crate::UNIT_PEER;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_PEER_PORT: u16 = 179;
pub const DEFAULT_HOLD_TIME: Duration = Duration::from_secs(90);

/// Smallest non-zero hold time allowed by BGP (RFC 4271 4.2).
pub const MIN_HOLD_TIME: Duration = Duration::from_secs(3);

/// A BGP session to establish.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct Peer {
    /// Autonomous system number of this speaker.
    pub my_asn: u32,

    /// Autonomous system number of the peer.
    pub asn: u32,

    pub addr: IpAddr,
    pub port: u16,

    /// Zero disables keepalives entirely.
    pub hold_time: Duration,
}

/// Validate and normalize the peer at position `index` of the document.
pub fn validate(
    log: &Logger,
    index: usize,
    raw: Option<RawPeer>,
) -> Result<Peer, Error> {
    let entity = Entity::Peer(index);
    let raw = raw.unwrap_or_default();

    let my_asn = raw.my_asn.ok_or_else(|| Error::MissingField {
        entity: entity.clone(),
        field: "my-asn",
    })?;
    let asn = raw.peer_asn.ok_or_else(|| Error::MissingField {
        entity: entity.clone(),
        field: "peer-asn",
    })?;

    let address = raw.peer_address.ok_or_else(|| Error::MissingField {
        entity: entity.clone(),
        field: "peer-address",
    })?;
    let addr: IpAddr = match address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            return Err(Error::Malformed {
                entity,
                field: "peer-address",
                value: address,
                reason: format!("{e}"),
            })
        }
    };

    let port = raw.peer_port.unwrap_or(DEFAULT_PEER_PORT);

    let hold_time = match raw.hold_time {
        None => DEFAULT_HOLD_TIME,
        Some(s) => {
            let hold_time = match humantime::parse_duration(&s) {
                Ok(d) => d,
                Err(e) => {
                    return Err(Error::Malformed {
                        entity,
                        field: "hold-time",
                        value: s,
                        reason: format!("{e}"),
                    })
                }
            };
            if !hold_time.is_zero() && hold_time < MIN_HOLD_TIME {
                return Err(Error::HoldTimeTooSmall {
                    entity,
                    got: hold_time,
                    min: MIN_HOLD_TIME,
                });
            }
            hold_time
        }
    };

    config_log!(log, debug, UNIT_PEER,
        "validated peer #{}", index;
        "my_asn" => my_asn,
        "peer_asn" => asn,
        "peer_addr" => addr.to_string(),
        "peer_port" => port,
        "hold_time" => format!("{}", humantime::format_duration(hold_time))
    );

    Ok(Peer {
        my_asn,
        asn,
        addr,
        port,
        hold_time,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::log::discard_logger;

    fn raw(hold_time: Option<&str>) -> RawPeer {
        RawPeer {
            my_asn: Some(42),
            peer_asn: Some(142),
            peer_address: Some("1.2.3.4".into()),
            peer_port: None,
            hold_time: hold_time.map(String::from),
        }
    }

    #[test]
    fn defaults() {
        let p = validate(&discard_logger(), 0, Some(raw(None))).unwrap();
        assert_eq!(p.port, DEFAULT_PEER_PORT);
        assert_eq!(p.hold_time, Duration::from_secs(90));
        assert_eq!(p.addr, "1.2.3.4".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn hold_time_bounds() {
        let log = discard_logger();
        for (s, secs) in [("0s", 0), ("3s", 3), ("180s", 180), ("2m", 120)] {
            let p = validate(&log, 0, Some(raw(Some(s)))).unwrap();
            assert_eq!(p.hold_time, Duration::from_secs(secs), "{s}");
        }

        for s in ["1s", "2s", "2999ms"] {
            let e = validate(&log, 0, Some(raw(Some(s)))).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::RangeViolation, "{s}");
        }

        let e = validate(&log, 3, Some(raw(Some("foo")))).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MalformedValue);
        assert_eq!(e.entity(), Some(&Entity::Peer(3)));
    }

    #[test]
    fn required_fields() {
        let log = discard_logger();

        let mut r = raw(None);
        r.my_asn = None;
        let e = validate(&log, 1, Some(r)).unwrap_err();
        assert!(matches!(
            e,
            Error::MissingField { field: "my-asn", .. }
        ));
        assert_eq!(e.to_string(), "peer #1: missing required field my-asn");

        let mut r = raw(None);
        r.peer_asn = None;
        let e = validate(&log, 0, Some(r)).unwrap_err();
        assert!(matches!(
            e,
            Error::MissingField {
                field: "peer-asn",
                ..
            }
        ));

        let e = validate(&log, 0, None).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn bad_address() {
        let mut r = raw(None);
        r.peer_address = Some("1.2.3.400".into());
        let e = validate(&discard_logger(), 0, Some(r)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MalformedValue);

        let mut r = raw(None);
        r.peer_address = Some("2001:db8::1".into());
        let p = validate(&discard_logger(), 0, Some(r)).unwrap();
        assert!(p.addr.is_ipv6());
    }
}
