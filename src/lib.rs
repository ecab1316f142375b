// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
IPv4/IPv6 addresses as fixed-width binary values, plus decomposition of
arbitrary inclusive address ranges into minimal sets of CIDR blocks.

Addresses are immutable big-endian byte sequences (4 bytes for v4, 16 for
v6) with lossless binary / bit-string / textual representations. A range is
a normalized `(min, max)` pair of same-family addresses; mixing families in
one range is a compile error by construction. An IPv4 address and its
`::ffff:0:0/96` embedded IPv6 form compare equal across families.
*/

mod address;
mod masks;
mod range;
mod strings;

use std::{error, fmt, net::IpAddr};
use strings::*;

pub use address::{Address, IpClass, Ipv4Address, Ipv6Address, Ipv6Format};
pub use range::{IpRange, Ipv4Range, Ipv6Range};

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;
pub(crate) const IPV4_BYTES: usize = 4;
pub(crate) const IPV6_BYTES: usize = 16;

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// malformed textual IP address
    Parse(String),
    /// IPv6 address outside the ::ffff:0:0/96 embedding
    IncompatibleFamily(String),
    /// unrecognized IPv4 class letter
    InvalidClass(char),
    /// endpoints are not the same IP family (v4 vs v6)
    FamilyMismatch(IpAddr, IpAddr),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Parse(ip) => {
                write!(f, "{ERR_PARSE}: '{ip}'")
            }
            AddressError::IncompatibleFamily(ip) => {
                write!(f, "{ERR_INCOMPATIBLE}: {ip}")
            }
            AddressError::InvalidClass(letter) => {
                write!(f, "{ERR_CLASS}: '{letter}'")
            }
            AddressError::FamilyMismatch(a, b) => {
                write!(f, "{ERR_MISMATCH}: {a} - {b}")
            }
        }
    }
}

impl error::Error for AddressError {}
