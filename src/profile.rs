//! The fixed, immutable configuration chosen at session start.
//!
//! Two profiles are fixed by the external interface: [`Profile::audible`] and
//! [`Profile::ultrasonic`]. Both share the same engine — tone generator, codec,
//! framing, detector, and session state machines are all parameterized by a single
//! `Profile` value rather than duplicated per variant.

/// Maximum symbol alphabet size (`M`); both profiles fit within it.
pub const MAX_ALPHABET: usize = 8;

/// A fixed configuration for one acoustic session: sample rate, symbol timing, carrier
/// frequencies, and framing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub sample_rate: u32,
    pub symbol_duration_secs: f32,
    /// `round(sample_rate * symbol_duration_secs)`.
    pub samples_per_symbol: usize,
    /// Ordered `symbol_index -> carrier_frequency_hz`; only the first `alphabet_size`
    /// entries are meaningful.
    pub symbol_alphabet: [f32; MAX_ALPHABET],
    pub alphabet_size: usize,
    pub bits_per_symbol: u32,
    /// Payload bytes per DATA packet.
    pub payload_chunk_size: usize,
    /// Symbol-index preamble pattern; empty when the profile has no preamble.
    pub preamble_pattern: &'static [u8],
    pub amplitude_scale: f32,
}

impl Profile {
    /// Audible profile: 4 tones in the 1–2.5 kHz band, 5 ms symbols, no preamble.
    pub const fn audible() -> Self {
        let sample_rate = 44_100;
        let symbol_duration_secs = 0.005;
        Self {
            sample_rate,
            symbol_duration_secs,
            samples_per_symbol: samples_per_symbol(sample_rate, symbol_duration_secs),
            symbol_alphabet: [1000.0, 1500.0, 2000.0, 2500.0, 0.0, 0.0, 0.0, 0.0],
            alphabet_size: 4,
            bits_per_symbol: 2,
            payload_chunk_size: 32,
            preamble_pattern: &[],
            amplitude_scale: 1.0,
        }
    }

    /// Ultrasonic profile: 8 tones spaced 485 Hz apart starting at 17 kHz, 4 ms symbols,
    /// preamble-synchronized for streaming use.
    pub const fn ultrasonic() -> Self {
        let sample_rate = 44_100;
        let symbol_duration_secs = 0.004;
        Self {
            sample_rate,
            symbol_duration_secs,
            samples_per_symbol: samples_per_symbol(sample_rate, symbol_duration_secs),
            symbol_alphabet: [
                17_000.0, 17_485.0, 17_970.0, 18_455.0, 18_940.0, 19_425.0, 19_910.0, 20_395.0,
            ],
            alphabet_size: 8,
            bits_per_symbol: 3,
            payload_chunk_size: 64,
            preamble_pattern: &[0, 7, 0, 7],
            amplitude_scale: 0.9,
        }
    }

    /// The alphabet's active carrier frequencies.
    pub fn frequencies(&self) -> &[f32] {
        &self.symbol_alphabet[..self.alphabet_size]
    }

    pub fn preamble_enabled(&self) -> bool {
        !self.preamble_pattern.is_empty()
    }
}

const fn samples_per_symbol(sample_rate: u32, symbol_duration_secs: f32) -> usize {
    // `round()` isn't const yet; both fixed profiles land on an exact integer
    // (44100 * 0.005 = 220.5 rounds to 220... actually not exact, so round manually).
    let scaled = sample_rate as f32 * symbol_duration_secs;
    (scaled + 0.5) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audible_matches_external_interface_table() {
        let p = Profile::audible();
        assert_eq!(p.alphabet_size, 4);
        assert_eq!(p.bits_per_symbol, 2);
        assert_eq!(p.payload_chunk_size, 32);
        assert_eq!(p.frequencies(), &[1000.0, 1500.0, 2000.0, 2500.0]);
        assert!(!p.preamble_enabled());
        // 5ms @ 44100Hz = 220.5 samples, rounds to 221 per the spec's round() rule.
        assert_eq!(p.samples_per_symbol, 221);
    }

    #[test]
    fn ultrasonic_matches_external_interface_table() {
        let p = Profile::ultrasonic();
        assert_eq!(p.alphabet_size, 8);
        assert_eq!(p.bits_per_symbol, 3);
        assert_eq!(p.payload_chunk_size, 64);
        assert_eq!(p.frequencies()[0], 17_000.0);
        assert_eq!(p.frequencies()[7], 20_395.0);
        assert!(p.preamble_enabled());
        assert_eq!(p.preamble_pattern, &[0, 7, 0, 7]);
        // 4ms @ 44100Hz = 176.4 samples, rounds to 176.
        assert_eq!(p.samples_per_symbol, 176);
    }
}
