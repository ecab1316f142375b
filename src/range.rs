// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{masks, Address, AddressError, Ipv4Address, Ipv6Address};
use ipnet::{Ipv4Net, Ipv6Net};
use serde::Serialize;
use std::{fmt, net::IpAddr};
use tracing::trace;

/**
An inclusive range of IP addresses of a single family.

Always normalized so that `min <= max` (byte-wise on the fixed-width
representation) regardless of construction order. A range built from a
single address and a CIDR prefix remembers that prefix; a range built from
two arbitrary endpoints does not, even if it happens to be block-aligned.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct IpRange<A: Address> {
    min: A,
    max: A,
    cidr_prefix: Option<u8>,
}

pub type Ipv4Range = IpRange<Ipv4Address>;
pub type Ipv6Range = IpRange<Ipv6Address>;

impl<A: Address> IpRange<A> {
    /// Create a range from two endpoints, swapping them if necessary.
    pub fn from_ip_interval(a: A, b: A) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self { min, max, cidr_prefix: None }
    }

    /// Create a range from two raw big-endian endpoint values
    /// (padded/truncated like [Address::from_binary]).
    pub fn from_binary_interval(min: &[u8], max: &[u8]) -> Self {
        Self::from_ip_interval(A::from_binary(min), A::from_binary(max))
    }

    /**
    Create the CIDR block containing `ip` at the given prefix length:
    `min = ip & mask`, `max = min | !mask`. The prefix (clamped to the
    family width) is remembered and reported by [cidr_prefix](Self::cidr_prefix).
    */
    pub fn from_ip_with_cidr_prefix(ip: A, prefix: u8) -> Self {
        let prefix: u8 = prefix.min(A::BITS);
        let mask: A = A::from_cidr_prefix(prefix);
        let min: A = ip & mask;
        Self {
            min,
            max: min | !mask,
            cidr_prefix: Some(prefix),
        }
    }

    pub fn min_ip(&self) -> &A {
        &self.min
    }

    pub fn max_ip(&self) -> &A {
        &self.max
    }

    /// The CIDR prefix this range was built from, if any.
    pub fn cidr_prefix(&self) -> Option<u8> {
        self.cidr_prefix
    }

    /**
    Check if `self` is entirely inside `other`. Ranges of different
    families are compared through the `::ffff:0:0/96` embedding, so an
    IPv4 range can lie within an IPv6 range and vice versa. Reflexive:
    every range is within itself.
    */
    pub fn is_within<B: Address>(&self, other: &IpRange<B>) -> bool {
        self.min.embedded_octets() >= other.min.embedded_octets()
            && self.max.embedded_octets() <= other.max.embedded_octets()
    }

    /**
    Decompose the range into the minimal ordered list of CIDR blocks whose
    union is exactly `[min, max]`.

    The result is in ascending address order, the blocks are pairwise
    disjoint, and every block carries its derived prefix. Decomposing a
    range that already is a CIDR block returns that single block.
    */
    pub fn to_cidr_notations(&self) -> Vec<Self> {
        // Whole address space collapses to /0.
        if self.min.octets().iter().all(|&b| b == 0)
            && self.max.octets().iter().all(|&b| b == 0xFF)
        {
            return vec![Self::from_ip_with_cidr_prefix(self.min, 0)];
        }
        // A single address is its own full-length block.
        if self.min == self.max {
            return vec![Self::from_ip_with_cidr_prefix(self.min, A::BITS)];
        }

        /*
        A multi-address block must start on an even address and end on an
        odd one. Shave off non-conforming endpoints as /32 (/128) blocks;
        they stay first/last in the output.
        */
        let (first, min, max, last) = Self::clean_boundaries(self.min, self.max);

        let mut ranges: Vec<Self> = Vec::new();
        ranges.extend(first);

        if min == max {
            ranges.push(Self::from_ip_with_cidr_prefix(min, A::BITS));
        } else {
            let dmin: String = min.to_bit_string();
            let dmax: String = max.to_bit_string();
            let fix: usize = count_fix_bits(&dmin, &dmax);

            let min_rest_zero: bool = dmin[fix..].bytes().all(|b| b == b'0');
            let max_rest_one: bool = dmax[fix..].bytes().all(|b| b == b'1');
            if min_rest_zero && max_rest_one {
                // the cleaned interval is exactly one aligned block
                ranges.push(Self::from_ip_with_cidr_prefix(min, fix as u8));
            } else {
                Self::ascend_from_min(&dmin, fix, &mut ranges);
                Self::descend_to_max(&dmax, fix, &mut ranges);
            }
        }

        ranges.extend(last);
        trace!(blocks = ranges.len(), "range decomposed into CIDR blocks");
        ranges
    }

    /// Split off an odd minimum and/or even maximum as single-address
    /// blocks, returning them with the adjusted interval.
    #[rustfmt::skip]
    fn clean_boundaries(mut min: A, mut max: A) -> (Option<Self>, A, A, Option<Self>) {
        let mut first: Option<Self> = None;
        let mut last: Option<Self> = None;

        if min.octets()[A::BYTES - 1] & 1 == 1 {
            first = Some(Self::from_ip_with_cidr_prefix(min, A::BITS));
            min = A::from_binary(&masks::increment(min.octets()));
        }
        if min != max && max.octets()[A::BYTES - 1] & 1 == 0 {
            last = Some(Self::from_ip_with_cidr_prefix(max, A::BITS));
            max = A::from_binary(&masks::decrement(max.octets()));
        }

        (first, min, max, last)
    }

    /**
    Emit the ascending run of power-of-two blocks that covers from `min`
    up to the lower half of the fixed prefix: first the largest block
    starting at `min`, then ever larger blocks obtained by stripping
    trailing ones and flipping the next free bit.
    */
    fn ascend_from_min(dmin: &str, fix: usize, out: &mut Vec<Self>) {
        let Some(pos) = dmin.as_bytes()[fix..]
            .iter()
            .rposition(|&b| b == b'1')
            .map(|p| p + fix)
        else {
            // min sits at the bottom of the fixed region, so the whole
            // lower half is one block
            out.push(Self::from_ip_with_cidr_prefix(
                A::from_bit_string(dmin),
                (fix + 1) as u8,
            ));
            return;
        };
        out.push(Self::from_ip_with_cidr_prefix(
            A::from_bit_string(dmin),
            (pos + 1) as u8,
        ));

        let trimmed: &str = dmin.trim_end_matches('0').trim_end_matches('1');
        let mut bits: String = trimmed.to_string();
        while bits.len() > fix + 1 {
            let pos: usize = bits.len() - 1;
            bits.replace_range(pos.., "1");
            let padded: String = format!("{bits:0<width$}", width = A::BITS as usize);
            out.push(Self::from_ip_with_cidr_prefix(
                A::from_bit_string(&padded),
                (pos + 1) as u8,
            ));
            bits.truncate(bits.trim_end_matches('1').len());
        }
    }

    /**
    Emit the descending run of power-of-two blocks that approaches `max`
    from below: for every '1' bit of `max` between the fixed prefix and
    the trailing all-ones tail, the block with that bit cleared; finally
    the block holding `max` itself.
    */
    fn descend_to_max(dmax: &str, fix: usize, out: &mut Vec<Self>) {
        let bytes: &[u8] = dmax.as_bytes();
        /*
        One past the last '0' bit, i.e. where the trailing ones begin.
        Never shorter than fix+1: the final block must stay inside the
        upper half of the fixed region even when the whole remainder of
        max is ones.
        */
        let end: usize = bytes
            .iter()
            .rposition(|&b| b == b'0')
            .map_or(0, |p| p + 1)
            .max(fix + 1);

        let mut pos: usize = fix;
        loop {
            let next: Option<usize> = bytes[pos + 1..]
                .iter()
                .position(|&b| b == b'1')
                .map(|p| p + pos + 1);
            match next {
                Some(p) if p < end => pos = p,
                _ => break,
            }
            let flipped: String = format!("{}0{}", &dmax[..pos], &dmax[pos + 1..]);
            out.push(Self::from_ip_with_cidr_prefix(
                A::from_bit_string(&flipped),
                (pos + 1) as u8,
            ));
        }
        out.push(Self::from_ip_with_cidr_prefix(
            A::from_bit_string(dmax),
            end as u8,
        ));
    }
}

/// Length of the common leading-bit prefix of two '0'/'1' series.
pub(crate) fn count_fix_bits(min: &str, max: &str) -> usize {
    min.bytes()
        .zip(max.bytes())
        .take_while(|(a, b)| a == b)
        .count()
}

impl<A: Address> fmt::Display for IpRange<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/* ---------------------------------- */

impl From<Ipv4Net> for Ipv4Range {
    fn from(net: Ipv4Net) -> Self {
        Self::from_ip_with_cidr_prefix(net.addr().into(), net.prefix_len())
    }
}

impl From<Ipv6Net> for Ipv6Range {
    fn from(net: Ipv6Net) -> Self {
        Self::from_ip_with_cidr_prefix(net.addr().into(), net.prefix_len())
    }
}

impl Ipv4Range {
    /// The range as an [Ipv4Net], if it was built from a CIDR prefix.
    pub fn to_ipnet(&self) -> Option<Ipv4Net> {
        self.cidr_prefix
            .and_then(|p| Ipv4Net::new((*self.min_ip()).into(), p).ok())
    }
}

impl Ipv6Range {
    /// The range as an [Ipv6Net], if it was built from a CIDR prefix.
    pub fn to_ipnet(&self) -> Option<Ipv6Net> {
        self.cidr_prefix
            .and_then(|p| Ipv6Net::new((*self.min_ip()).into(), p).ok())
    }
}

impl TryFrom<(IpAddr, IpAddr)> for Ipv4Range {
    type Error = AddressError;

    fn try_from((a, b): (IpAddr, IpAddr)) -> Result<Self, Self::Error> {
        match (a, b) {
            (IpAddr::V4(a), IpAddr::V4(b)) => Ok(Self::from_ip_interval(a.into(), b.into())),
            _ => Err(AddressError::FamilyMismatch(a, b)),
        }
    }
}

impl TryFrom<(IpAddr, IpAddr)> for Ipv6Range {
    type Error = AddressError;

    fn try_from((a, b): (IpAddr, IpAddr)) -> Result<Self, Self::Error> {
        match (a, b) {
            (IpAddr::V6(a), IpAddr::V6(b)) => Ok(Self::from_ip_interval(a.into(), b.into())),
            _ => Err(AddressError::FamilyMismatch(a, b)),
        }
    }
}

/* -------------------------------------------------------------------------- */
