// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types for address pool configuration.
//!
//! This crate provides the prefix and community types shared by the pool
//! configuration engine and its tooling. It has minimal dependencies and can
//! be used by consumers of a validated configuration without pulling in the
//! YAML decoding machinery.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

pub mod community;

#[cfg(test)]
mod proptest;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrefixParseError {
    #[error("expected CIDR representation <addr>/<length>, got {0:?}")]
    Cidr(String),

    #[error("malformed ip addr {0:?}")]
    Addr(String),

    #[error("malformed prefix length {0:?}")]
    Length(String),

    #[error("prefix length {length} out of range for {family}, max is {max}")]
    LengthOutOfRange {
        length: u32,
        family: AddressFamily,
        max: u8,
    },
}

/// Split `<addr>/<length>` and parse the length as plain decimal digits.
fn split_cidr(s: &str) -> Result<(&str, u32), PrefixParseError> {
    let (value, length) = s
        .split_once('/')
        .ok_or_else(|| PrefixParseError::Cidr(s.to_string()))?;

    if length.is_empty() || !length.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrefixParseError::Length(length.to_string()));
    }
    let length = length
        .parse::<u32>()
        .map_err(|_| PrefixParseError::Length(length.to_string()))?;

    Ok((value, length))
}

fn check_length(
    length: u32,
    family: AddressFamily,
) -> Result<u8, PrefixParseError> {
    let max = family.host_length();
    if length > u32::from(max) {
        return Err(PrefixParseError::LengthOutOfRange {
            length,
            family,
            max,
        });
    }
    Ok(length as u8)
}

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, JsonSchema,
)]
pub struct Prefix4 {
    pub value: Ipv4Addr,
    pub length: u8,
}

impl PartialOrd for Prefix4 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Prefix4 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.value != other.value {
            return self.value.cmp(&other.value);
        }
        self.length.cmp(&other.length)
    }
}

impl Prefix4 {
    pub const HOST_MASK: u8 = 32;

    /// Create a new `Prefix4` from an IP address and net mask.
    /// The newly created `Prefix4` will have its host bits zeroed upon creation
    /// e.g.
    /// ```
    /// use pool_types::Prefix4;
    /// use std::net::Ipv4Addr;
    /// use std::str::FromStr;
    /// let p4 = Prefix4::new(Ipv4Addr::from_str("10.0.0.10").unwrap(), 24);
    /// assert_eq!(p4.value, Ipv4Addr::from_str("10.0.0.0").unwrap());
    /// ```
    pub fn new(ip: Ipv4Addr, length: u8) -> Self {
        let mut new = Self { value: ip, length };
        new.unset_host_bits();
        new
    }

    fn mask(length: u8) -> u32 {
        match length {
            0 => 0,
            _ => (!0u32) << (Self::HOST_MASK - length),
        }
    }

    pub fn host_bits_are_unset(&self) -> bool {
        self.value.to_bits() & Self::mask(self.length) == self.value.to_bits()
    }

    pub fn unset_host_bits(&mut self) {
        self.value =
            Ipv4Addr::from_bits(self.value.to_bits() & Self::mask(self.length))
    }

    /// Check if this prefix is contained within another prefix.
    /// Returns true if this prefix is equal to or more specific than the other.
    pub fn within(&self, other: &Prefix4) -> bool {
        // A less specific prefix cannot be within a more specific one
        if self.length < other.length {
            return false;
        }

        let mask = Self::mask(other.length);
        self.value.to_bits() & mask == other.value.to_bits() & mask
    }

    /// Two prefixes overlap iff one of them is within the other.
    pub fn overlaps(&self, other: &Prefix4) -> bool {
        self.within(other) || other.within(self)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        Prefix4::new(addr, Self::HOST_MASK).within(self)
    }
}

impl fmt::Display for Prefix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.length)
    }
}

impl FromStr for Prefix4 {
    type Err = PrefixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, length) = split_cidr(s)?;
        let value: Ipv4Addr = value
            .parse()
            .map_err(|_| PrefixParseError::Addr(value.to_string()))?;
        let length = check_length(length, AddressFamily::Ipv4)?;
        Ok(Self::new(value, length))
    }
}

#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, JsonSchema,
)]
pub struct Prefix6 {
    pub value: Ipv6Addr,
    pub length: u8,
}

impl PartialOrd for Prefix6 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Prefix6 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.value != other.value {
            return self.value.cmp(&other.value);
        }
        self.length.cmp(&other.length)
    }
}

impl fmt::Display for Prefix6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.length)
    }
}

impl Prefix6 {
    pub const HOST_MASK: u8 = 128;

    /// Create a new `Prefix6` from an IP address and net mask.
    /// The newly created `Prefix6` will have its host bits zeroed upon creation
    /// e.g.
    /// ```
    /// use pool_types::Prefix6;
    /// use std::net::Ipv6Addr;
    /// use std::str::FromStr;
    /// let p6 = Prefix6::new(Ipv6Addr::from_str("2001:db8::1").unwrap(), 64);
    /// assert_eq!(p6.value, Ipv6Addr::from_str("2001:db8::").unwrap());
    /// ```
    pub fn new(ip: Ipv6Addr, length: u8) -> Self {
        let mut new = Self { value: ip, length };
        new.unset_host_bits();
        new
    }

    fn mask(length: u8) -> u128 {
        match length {
            0 => 0,
            _ => (!0u128) << (Self::HOST_MASK - length),
        }
    }

    pub fn host_bits_are_unset(&self) -> bool {
        self.value.to_bits() & Self::mask(self.length) == self.value.to_bits()
    }

    pub fn unset_host_bits(&mut self) {
        self.value =
            Ipv6Addr::from_bits(self.value.to_bits() & Self::mask(self.length))
    }

    /// Check if this prefix is contained within another prefix.
    /// Returns true if this prefix is equal to or more specific than the other.
    pub fn within(&self, other: &Prefix6) -> bool {
        if self.length < other.length {
            return false;
        }

        let mask = Self::mask(other.length);
        self.value.to_bits() & mask == other.value.to_bits() & mask
    }

    /// Two prefixes overlap iff one of them is within the other.
    pub fn overlaps(&self, other: &Prefix6) -> bool {
        self.within(other) || other.within(self)
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        Prefix6::new(addr, Self::HOST_MASK).within(self)
    }
}

impl FromStr for Prefix6 {
    type Err = PrefixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, length) = split_cidr(s)?;
        let value: Ipv6Addr = value
            .parse()
            .map_err(|_| PrefixParseError::Addr(value.to_string()))?;
        let length = check_length(length, AddressFamily::Ipv6)?;
        Ok(Self::new(value, length))
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Serialize,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    JsonSchema,
    PartialOrd,
    Ord,
)]
pub enum Prefix {
    V4(Prefix4),
    V6(Prefix6),
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Prefix::V4(p) => p.fmt(f),
            Prefix::V6(p) => p.fmt(f),
        }
    }
}

impl From<Prefix4> for Prefix {
    fn from(value: Prefix4) -> Self {
        Self::V4(value)
    }
}

impl From<Prefix6> for Prefix {
    fn from(value: Prefix6) -> Self {
        Self::V6(value)
    }
}

impl FromStr for Prefix {
    type Err = PrefixParseError;

    /// Parse a CIDR block. Host bits are masked off, so `10.20.30.40/24`
    /// yields `10.20.30.0/24`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, _) = split_cidr(s)?;
        match value.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => Ok(Self::V4(s.parse()?)),
            Ok(IpAddr::V6(_)) => Ok(Self::V6(s.parse()?)),
            Err(_) => Err(PrefixParseError::Addr(value.to_string())),
        }
    }
}

impl Prefix {
    pub fn new(ip: IpAddr, length: u8) -> Self {
        match ip {
            IpAddr::V4(ip4) => Self::V4(Prefix4::new(ip4, length)),
            IpAddr::V6(ip6) => Self::V6(Prefix6::new(ip6, length)),
        }
    }

    pub fn length(&self) -> u8 {
        match self {
            Self::V4(p4) => p4.length,
            Self::V6(p6) => p6.length,
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            Self::V4(_) => AddressFamily::Ipv4,
            Self::V6(_) => AddressFamily::Ipv6,
        }
    }

    pub fn host_bits_are_unset(&self) -> bool {
        match self {
            Self::V4(p4) => p4.host_bits_are_unset(),
            Self::V6(p6) => p6.host_bits_are_unset(),
        }
    }

    /// Check if this prefix is contained within another prefix.
    /// Returns true if this prefix is equal to or more specific than the other.
    /// Returns false for cross-family comparisons.
    pub fn within(&self, other: &Prefix) -> bool {
        match (self, other) {
            (Prefix::V4(a), Prefix::V4(b)) => a.within(b),
            (Prefix::V6(a), Prefix::V6(b)) => a.within(b),
            _ => false, // Cross-family always false
        }
    }

    /// Check whether the address ranges of two prefixes intersect. Identical
    /// prefixes overlap. Returns false for cross-family comparisons.
    pub fn overlaps(&self, other: &Prefix) -> bool {
        match (self, other) {
            (Prefix::V4(a), Prefix::V4(b)) => a.overlaps(b),
            (Prefix::V6(a), Prefix::V6(b)) => a.overlaps(b),
            _ => false,
        }
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self, addr) {
            (Prefix::V4(p4), IpAddr::V4(a)) => p4.contains(a),
            (Prefix::V6(p6), IpAddr::V6(a)) => p6.contains(a),
            _ => false,
        }
    }
}

/// Represents the address family (protocol version) of a prefix.
#[derive(
    Clone,
    Copy,
    Eq,
    Debug,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum AddressFamily {
    /// Internet Protocol Version 4 (IPv4)
    Ipv4,
    /// Internet Protocol Version 6 (IPv6)
    Ipv6,
}

impl AddressFamily {
    /// Prefix length of a single host address in this family.
    pub fn host_length(&self) -> u8 {
        match self {
            Self::Ipv4 => Prefix4::HOST_MASK,
            Self::Ipv6 => Prefix6::HOST_MASK,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "ipv4"),
            Self::Ipv6 => write!(f, "ipv6"),
        }
    }
}
