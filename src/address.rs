// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{masks, strings::*, AddressError, IPV4_BITS, IPV4_BYTES, IPV6_BITS, IPV6_BYTES};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{Ipv4Addr, Ipv6Addr},
    ops::{BitAnd, BitOr, Not},
    str::FromStr,
};

lazy_static! {
    /// Runs of two or more zero groups in a medium-form IPv6 string.
    static ref ZERO_RUN: Regex = Regex::new(r"(^|:)(0(:0)+)(:|$)").unwrap();
}

/**
An immutable fixed-width IP address value.

Implementors store exactly [BITS](Address::BITS) bits in big-endian byte
order; byte-wise lexicographic comparison ([Ord]) therefore matches numeric
address order. The shared constructors and representations (binary, bit
string, CIDR mask, inverse) live here as provided methods so that both
families run the same arithmetic.
*/
pub trait Address:
    Copy + Ord + fmt::Display + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    /// 32 for IPv4, 128 for IPv6.
    const BITS: u8;
    /// 4 for IPv4, 16 for IPv6.
    const BYTES: usize;

    /**
    Create an address from raw big-endian bytes. Never fails: short input
    is left-zero-padded, long input keeps its trailing [BYTES](Address::BYTES)
    bytes.
    */
    fn from_binary(bytes: &[u8]) -> Self;

    /// The raw big-endian bytes of the address.
    fn octets(&self) -> &[u8];

    /// The address promoted to its 16-byte `::ffff:0:0/96` embedded form.
    /// IPv6 addresses return their own bytes. This is the common currency
    /// for cross-family equality and containment.
    fn embedded_octets(&self) -> [u8; IPV6_BYTES];

    /// Create an address from an ASCII '0'/'1' series, MSB first. Any
    /// other character counts as '0'; the string is fitted to
    /// [BITS](Address::BITS) (left-padded / right-truncated).
    fn from_bit_string(bits: &str) -> Self {
        Self::from_binary(&masks::pack_bit_string(bits, Self::BITS))
    }

    /// Create the network mask for a CIDR prefix (clamped to the family
    /// width): the high `prefix` bits set, the rest zero.
    fn from_cidr_prefix(prefix: u8) -> Self {
        Self::from_binary(&masks::cidr_prefix_to_mask(prefix, Self::BITS))
    }

    /// The address as an ASCII '0'/'1' series, MSB first.
    fn to_bit_string(&self) -> String {
        masks::unpack_bit_string(self.octets())
    }

    /// Bitwise NOT of every byte. Turns a network mask into a wildcard mask.
    fn inverse(&self) -> Self {
        let inverted: Vec<u8> = self.octets().iter().map(|b| !b).collect();
        Self::from_binary(&inverted)
    }
}

/* -------------------------------------------------------------------------- */

/// An IPv4 address: 4 bytes, network byte order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Ipv4Address {
    octets: [u8; IPV4_BYTES],
}

impl Address for Ipv4Address {
    const BITS: u8 = IPV4_BITS;
    const BYTES: usize = IPV4_BYTES;

    fn from_binary(bytes: &[u8]) -> Self {
        let mut octets = [0u8; IPV4_BYTES];
        let tail: &[u8] = &bytes[bytes.len().saturating_sub(IPV4_BYTES)..];
        octets[IPV4_BYTES - tail.len()..].copy_from_slice(tail);
        Self { octets }
    }

    fn octets(&self) -> &[u8] {
        &self.octets
    }

    fn embedded_octets(&self) -> [u8; IPV6_BYTES] {
        let mut out = [0u8; IPV6_BYTES];
        out[10] = 0xFF;
        out[11] = 0xFF;
        out[12..].copy_from_slice(&self.octets);
        out
    }
}

impl Ipv4Address {
    /// The address embedded at the low 32 bits of `::ffff:0:0/96`.
    pub fn to_ipv6(&self) -> Ipv6Address {
        Ipv6Address::from_binary(&self.embedded_octets())
    }

    /// The classful network class of the address, by its leading bits.
    pub fn ip_class(&self) -> IpClass {
        let first: u8 = self.octets[0];
        if first & 0x80 == 0 {
            IpClass::A
        } else if first & 0x40 == 0 {
            IpClass::B
        } else if first & 0x20 == 0 {
            IpClass::C
        } else if first & 0x10 == 0 {
            IpClass::D
        } else {
            IpClass::E
        }
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for Ipv4Address {
    type Err = AddressError;

    /// Strict dotted-decimal: exactly four parts, each 0..=255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; IPV4_BYTES];
        let mut count: usize = 0;

        for part in s.split('.') {
            if count == IPV4_BYTES
                || part.is_empty()
                || !part.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(AddressError::Parse(s.into()));
            }
            octets[count] = part.parse().map_err(|_| AddressError::Parse(s.into()))?;
            count += 1;
        }
        if count != IPV4_BYTES {
            return Err(AddressError::Parse(s.into()));
        }
        Ok(Self { octets })
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self { octets: ip.octets() }
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(ip: Ipv4Address) -> Self {
        Ipv4Addr::from(ip.octets)
    }
}

impl From<[u8; IPV4_BYTES]> for Ipv4Address {
    fn from(octets: [u8; IPV4_BYTES]) -> Self {
        Self { octets }
    }
}

impl PartialEq<Ipv6Address> for Ipv4Address {
    /// True iff `other` is this address under the `::ffff:0:0/96` embedding.
    fn eq(&self, other: &Ipv6Address) -> bool {
        self.embedded_octets() == other.octets
    }
}

/* -------------------------------------------------------------------------- */

/// An IPv6 address: 16 bytes, network byte order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Ipv6Address {
    octets: [u8; IPV6_BYTES],
}

impl Address for Ipv6Address {
    const BITS: u8 = IPV6_BITS;
    const BYTES: usize = IPV6_BYTES;

    fn from_binary(bytes: &[u8]) -> Self {
        let mut octets = [0u8; IPV6_BYTES];
        let tail: &[u8] = &bytes[bytes.len().saturating_sub(IPV6_BYTES)..];
        octets[IPV6_BYTES - tail.len()..].copy_from_slice(tail);
        Self { octets }
    }

    fn octets(&self) -> &[u8] {
        &self.octets
    }

    fn embedded_octets(&self) -> [u8; IPV6_BYTES] {
        self.octets
    }
}

impl Ipv6Address {
    /// True iff the address lies within the `::ffff:0:0/96` IPv4 embedding:
    /// bytes 0..10 zero and bytes 10..12 equal to `FF FF`.
    pub fn is_ipv4_compatible(&self) -> bool {
        self.octets[..10].iter().all(|&b| b == 0)
            && self.octets[10] == 0xFF
            && self.octets[11] == 0xFF
    }

    /// Extract the embedded IPv4 address, or fail if the address is not
    /// within the `::ffff:0:0/96` prefix.
    pub fn to_ipv4(&self) -> Result<Ipv4Address, AddressError> {
        if !self.is_ipv4_compatible() {
            return Err(AddressError::IncompatibleFamily(self.to_string()));
        }
        Ok(Ipv4Address::from_binary(&self.octets))
    }

    /// Format the address in the requested [Ipv6Format].
    pub fn to_string_form(&self, form: Ipv6Format) -> String {
        let groups: Vec<String> = self
            .octets
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .map(|group| match form {
                Ipv6Format::Long => format!("{group:04x}"),
                _ => format!("{group:x}"),
            })
            .collect();

        let joined: String = groups.join(COLON);
        match form {
            Ipv6Format::Short => compress_zero_run(&joined),
            _ => joined,
        }
    }
}

/**
Replace the longest run of two or more zero groups with `::`.
The leftmost run wins ties.
*/
fn compress_zero_run(medium: &str) -> String {
    let mut best: Option<regex::Match> = None;
    for caps in ZERO_RUN.captures_iter(medium) {
        if let Some(run) = caps.get(2) {
            if best.map_or(true, |b| run.len() > b.len()) {
                best = Some(run);
            }
        }
    }
    let Some(run) = best else {
        return medium.to_string();
    };

    let head: &str = medium[..run.start()].trim_end_matches(COLON);
    let tail: &str = medium[run.end()..].trim_start_matches(COLON);
    format!("{head}{DOUBLE_COLON}{tail}")
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_form(Ipv6Format::Short))
    }
}

impl FromStr for Ipv6Address {
    type Err = AddressError;

    /// Colon-hex with at most one `::` compression. Each group is 1-4 hex
    /// digits; the compression must elide at least one group.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || AddressError::Parse(s.into());

        let groups: Vec<u16> = match s.find(DOUBLE_COLON) {
            Some(pos) => {
                let (head, tail) = (&s[..pos], &s[pos + 2..]);
                if tail.contains(DOUBLE_COLON) {
                    return Err(parse_err());
                }
                let head: Vec<u16> = parse_hex_groups(head).ok_or_else(parse_err)?;
                let tail: Vec<u16> = parse_hex_groups(tail).ok_or_else(parse_err)?;
                if head.len() + tail.len() > 7 {
                    return Err(parse_err());
                }
                let mut groups: Vec<u16> = head;
                groups.resize(8 - tail.len(), 0);
                groups.extend(tail);
                groups
            }
            None => {
                let groups: Vec<u16> = parse_hex_groups(s).ok_or_else(parse_err)?;
                if groups.len() != 8 {
                    return Err(parse_err());
                }
                groups
            }
        };

        let mut octets = [0u8; IPV6_BYTES];
        for (i, group) in groups.iter().enumerate() {
            octets[i * 2..i * 2 + 2].copy_from_slice(&group.to_be_bytes());
        }
        Ok(Self { octets })
    }
}

/// Parse a colon-separated list of 1-4 digit hex groups. An empty string
/// yields an empty list (one side of a `::`).
fn parse_hex_groups(part: &str) -> Option<Vec<u16>> {
    if part.is_empty() {
        return Some(Vec::new());
    }
    part.split(COLON)
        .map(|group| {
            if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return None;
            }
            u16::from_str_radix(group, 16).ok()
        })
        .collect()
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self { octets: ip.octets() }
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(ip: Ipv6Address) -> Self {
        Ipv6Addr::from(ip.octets)
    }
}

impl From<[u8; IPV6_BYTES]> for Ipv6Address {
    fn from(octets: [u8; IPV6_BYTES]) -> Self {
        Self { octets }
    }
}

impl PartialEq<Ipv4Address> for Ipv6Address {
    fn eq(&self, other: &Ipv4Address) -> bool {
        other == self
    }
}

/* -------------------------------------------------------------------------- */

macro_rules! impl_bit_ops {
    ($addr:ty) => {
        impl BitAnd for $addr {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                let mut octets = self.octets;
                for (byte, other) in octets.iter_mut().zip(rhs.octets) {
                    *byte &= other;
                }
                Self { octets }
            }
        }

        impl BitOr for $addr {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                let mut octets = self.octets;
                for (byte, other) in octets.iter_mut().zip(rhs.octets) {
                    *byte |= other;
                }
                Self { octets }
            }
        }

        impl Not for $addr {
            type Output = Self;

            fn not(self) -> Self {
                let mut octets = self.octets;
                for byte in octets.iter_mut() {
                    *byte = !*byte;
                }
                Self { octets }
            }
        }
    };
}

impl_bit_ops!(Ipv4Address);
impl_bit_ops!(Ipv6Address);

/* -------------------------------------------------------------------------- */

/// Classful IPv4 address class, identified by the first octet's high bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum IpClass {
    A,
    B,
    C,
    D,
    E,
}

impl IpClass {
    /// The fixed high-order bit pattern of this class.
    pub fn high_order_bits(&self) -> &'static str {
        match self {
            IpClass::A => "0",
            IpClass::B => "10",
            IpClass::C => "110",
            IpClass::D => "1110",
            IpClass::E => "1111",
        }
    }
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl TryFrom<char> for IpClass {
    type Error = AddressError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        match letter.to_ascii_uppercase() {
            'A' => Ok(IpClass::A),
            'B' => Ok(IpClass::B),
            'C' => Ok(IpClass::C),
            'D' => Ok(IpClass::D),
            'E' => Ok(IpClass::E),
            _ => Err(AddressError::InvalidClass(letter)),
        }
    }
}

/// Output form for [Ipv6Address::to_string_form].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Ipv6Format {
    /// All groups zero-padded to four digits.
    Long,
    /// Leading zeros trimmed from each group.
    Medium,
    /// Medium with the longest zero run compressed to `::`.
    #[default]
    Short,
}

/* -------------------------------------------------------------------------- */
