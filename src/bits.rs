//! Bit/symbol and byte/bit layering, all MSB-first.
//!
//! MSB-first ordering is load-bearing: both directions of the byte<->bit and
//! bit<->symbol packers must agree, or a non-byte-aligned tail silently corrupts on
//! round trip.

use crate::profile::Profile;

/// Unpack bytes into individual bits, MSB (bit 7) first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    bits
}

/// Repack bits into bytes, MSB first. Trailing bits that don't complete a byte (< 8
/// remaining) are discarded.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit))
        .collect()
}

/// Group bits left-to-right into `profile.bits_per_symbol`-wide symbols, MSB first.
///
/// A trailing partial group is left-shifted to fill, with the missing low bits set to
/// zero (e.g. a single leftover bit `1` with `bits_per_symbol = 3` becomes symbol `0b100`).
pub fn bits_to_symbols(profile: &Profile, bits: &[u8]) -> Vec<u8> {
    let k = profile.bits_per_symbol as usize;
    bits.chunks(k)
        .map(|chunk| {
            let mut symbol = 0u8;
            for i in 0..k {
                let bit = chunk.get(i).copied().unwrap_or(0);
                symbol = (symbol << 1) | bit;
            }
            symbol
        })
        .collect()
}

/// Expand symbols back into bits, MSB first per symbol.
pub fn symbols_to_bits(profile: &Profile, symbols: &[u8]) -> Vec<u8> {
    let k = profile.bits_per_symbol;
    let mut bits = Vec::with_capacity(symbols.len() * k as usize);
    for &symbol in symbols {
        for i in (0..k).rev() {
            bits.push((symbol >> i) & 1);
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_bit_round_trip() {
        let bytes = [0x00u8, 0xFF, 0xA5, 0x01];
        let bits = bytes_to_bits(&bytes);
        assert_eq!(bits.len(), 32);
        assert_eq!(bits_to_bytes(&bits), bytes);
    }

    #[test]
    fn byte_bit_msb_first_order() {
        let bits = bytes_to_bits(&[0b1010_0000]);
        assert_eq!(bits, [1, 0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn symbol_round_trip_audible_two_bits() {
        let profile = Profile::audible();
        let bits = vec![0, 1, 1, 0, 1, 1, 0, 0];
        let symbols = bits_to_symbols(&profile, &bits);
        assert_eq!(symbols, vec![0b01, 0b10, 0b11, 0b00]);
        assert_eq!(symbols_to_bits(&profile, &symbols), bits);
    }

    #[test]
    fn symbol_round_trip_ultrasonic_three_bits() {
        let profile = Profile::ultrasonic();
        let bits: Vec<u8> = bytes_to_bits(&[0xAB, 0xCD]);
        let symbols = bits_to_symbols(&profile, &bits);
        assert_eq!(symbols_to_bits(&profile, &symbols), bits);
    }

    #[test]
    fn trailing_partial_group_is_left_shifted() {
        let profile = Profile::ultrasonic(); // 3 bits/symbol
        let bits = vec![1, 0, 1, 1]; // 4 bits: one full group + 1 leftover bit
        let symbols = bits_to_symbols(&profile, &bits);
        assert_eq!(symbols, vec![0b101, 0b100]);
    }

    #[test]
    fn bits_to_bytes_drops_short_trailing_group() {
        let bits = vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1]; // 11 bits -> 1 byte + 3 dropped
        assert_eq!(bits_to_bytes(&bits), vec![0xFF]);
    }
}
