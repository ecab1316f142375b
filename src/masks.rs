// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CIDR mask construction and bit arithmetic over raw big-endian byte
//! sequences, shared by both address families. All functions are pure and
//! return fresh buffers.

/**
Build a binary network mask with the high `prefix` bits set.

The prefix is clamped to `size_in_bits` (32 or 128). Output is
`size_in_bits / 8` bytes: whole `0xFF` bytes first, then one partial byte
with the top `prefix % 8` bits set, then zero-fill.
*/
pub(crate) fn cidr_prefix_to_mask(prefix: u8, size_in_bits: u8) -> Vec<u8> {
    let prefix: u8 = prefix.min(size_in_bits);
    let full: usize = (prefix / 8) as usize;
    let rest: u8 = prefix % 8;

    let mut mask: Vec<u8> = vec![0xFF; full];
    if rest != 0 {
        mask.push(!(0xFFu8 >> rest));
    }
    mask.resize((size_in_bits / 8) as usize, 0);
    mask
}

/**
Pack an ASCII bit string into bytes, most-significant bit first.

Every character other than '1' counts as '0'. The string is left-padded
with zeros to `size_in_bits` if shorter, and right-truncated if longer
(leading bits win).
*/
pub(crate) fn pack_bit_string(bits: &str, size_in_bits: u8) -> Vec<u8> {
    let size: usize = size_in_bits as usize;
    let mut normalized: Vec<u8> = vec![b'0'; size.saturating_sub(bits.len())];
    normalized.extend(bits.bytes().map(|b| if b == b'1' { b'1' } else { b'0' }));
    normalized.truncate(size);

    normalized
        .chunks(8)
        .map(|byte_bits| {
            byte_bits
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | (bit == b'1') as u8)
        })
        .collect()
}

/// Unpack bytes into an ASCII '0'/'1' bit string, most-significant bit first.
pub(crate) fn unpack_bit_string(bytes: &[u8]) -> String {
    let mut bits: String = String::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push(if byte >> shift & 1 == 1 { '1' } else { '0' });
        }
    }
    bits
}

/// Add 1 to a big-endian byte sequence (carry walk, wraps at all-ones).
pub(crate) fn increment(bytes: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = bytes.to_vec();
    for byte in out.iter_mut().rev() {
        if *byte == 0xFF {
            *byte = 0;
        } else {
            *byte += 1;
            break;
        }
    }
    out
}

/// Subtract 1 from a big-endian byte sequence (borrow walk, wraps at zero).
pub(crate) fn decrement(bytes: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = bytes.to_vec();
    for byte in out.iter_mut().rev() {
        if *byte == 0 {
            *byte = 0xFF;
        } else {
            *byte -= 1;
            break;
        }
    }
    out
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IPV4_BITS, IPV6_BITS};

    #[test]
    fn test_mask_v4_byte_boundaries() {
        assert_eq!(cidr_prefix_to_mask(0, IPV4_BITS), vec![0, 0, 0, 0]);
        assert_eq!(cidr_prefix_to_mask(8, IPV4_BITS), vec![0xFF, 0, 0, 0]);
        assert_eq!(cidr_prefix_to_mask(16, IPV4_BITS), vec![0xFF, 0xFF, 0, 0]);
        assert_eq!(cidr_prefix_to_mask(24, IPV4_BITS), vec![0xFF, 0xFF, 0xFF, 0]);
        assert_eq!(cidr_prefix_to_mask(32, IPV4_BITS), vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_mask_v4_partial_byte() {
        assert_eq!(cidr_prefix_to_mask(1, IPV4_BITS), vec![0x80, 0, 0, 0]);
        assert_eq!(cidr_prefix_to_mask(17, IPV4_BITS), vec![0xFF, 0xFF, 0x80, 0]);
        assert_eq!(cidr_prefix_to_mask(18, IPV4_BITS), vec![0xFF, 0xFF, 0xC0, 0]);
        assert_eq!(cidr_prefix_to_mask(31, IPV4_BITS), vec![0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_mask_clamps_prefix() {
        assert_eq!(cidr_prefix_to_mask(64, IPV4_BITS), vec![0xFF; 4]);
        assert_eq!(cidr_prefix_to_mask(255, IPV6_BITS), vec![0xFF; 16]);
    }

    #[test]
    fn test_mask_v6_whole_bytes() {
        for i in 0..=16u8 {
            let mut expected: Vec<u8> = vec![0xFF; i as usize];
            expected.resize(16, 0);
            assert_eq!(cidr_prefix_to_mask(i * 8, IPV6_BITS), expected);
        }
    }

    #[test]
    fn test_mask_leading_ones_exact() {
        for prefix in 0..=IPV4_BITS {
            let bits: String = unpack_bit_string(&cidr_prefix_to_mask(prefix, IPV4_BITS));
            let ones: usize = bits.bytes().take_while(|&b| b == b'1').count();
            assert_eq!(ones, prefix as usize);
            assert!(bits[ones..].bytes().all(|b| b == b'0'));
        }
    }

    #[test]
    fn test_pack_bit_string() {
        let bits = "01111111000000000000000000000001";
        assert_eq!(pack_bit_string(bits, IPV4_BITS), vec![0x7F, 0, 0, 1]);
        // any non-'1' character counts as zero
        let dirty = "01111111000000000000000A00000001";
        assert_eq!(pack_bit_string(dirty, IPV4_BITS), vec![0x7F, 0, 0, 1]);
    }

    #[test]
    fn test_pack_bit_string_pads_left() {
        assert_eq!(pack_bit_string("1", IPV4_BITS), vec![0, 0, 0, 1]);
        assert_eq!(pack_bit_string("", IPV4_BITS), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_pack_bit_string_truncates_right() {
        let long = format!("{}{}", "1".repeat(32), "0".repeat(8));
        assert_eq!(pack_bit_string(&long, IPV4_BITS), vec![0xFF; 4]);
    }

    #[test]
    fn test_bit_string_round_trip() {
        let bytes = [0xC0u8, 0x20, 0x00, 0xFE];
        assert_eq!(pack_bit_string(&unpack_bit_string(&bytes), IPV4_BITS), bytes);
    }

    #[test]
    fn test_increment_carry() {
        assert_eq!(increment(&[0, 0, 0, 0]), vec![0, 0, 0, 1]);
        assert_eq!(increment(&[0, 0, 0, 0xFF]), vec![0, 0, 1, 0]);
        assert_eq!(increment(&[0, 0xFF, 0xFF, 0xFF]), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_decrement_borrow() {
        assert_eq!(decrement(&[0, 0, 0, 1]), vec![0, 0, 0, 0]);
        assert_eq!(decrement(&[0, 0, 1, 0]), vec![0, 0, 0, 0xFF]);
        assert_eq!(decrement(&[1, 0, 0, 0]), vec![0, 0xFF, 0xFF, 0xFF]);
    }
}
