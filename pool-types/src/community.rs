// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BGP community values (RFC 1997).
//!
//! A community is a 32-bit value conventionally written `high:low`, where
//! `high` is an ASN and `low` is an operator-defined tag.

use std::fmt;

/// Pack the two 16-bit halves of a community into its 32-bit value.
pub fn from_parts(high: u16, low: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

/// Split a community value into its `(high, low)` halves.
pub fn parts(value: u32) -> (u16, u16) {
    ((value >> 16) as u16, value as u16)
}

/// Displays a community value in `high:low` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display(pub u32);

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (high, low) = parts(self.0);
        write!(f, "{high}:{low}")
    }
}

pub fn format(value: u32) -> String {
    Display(value).to_string()
}
