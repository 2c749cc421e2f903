//! Tone generation: one MFSK symbol in, one contiguous block of PCM samples out.
//!
//! Total and allocation-light — this never fails for a valid symbol index, and
//! concatenating the output of successive calls yields the full signal with no
//! inter-symbol gap (no windowing is applied).

use crate::profile::Profile;

/// Generate exactly `profile.samples_per_symbol` samples of `sin(2*pi*f*t)` for the
/// carrier frequency assigned to `symbol`.
///
/// # Panics
///
/// Panics if `symbol >= profile.alphabet_size`; callers only ever invoke this with
/// symbol indices that came out of [`crate::bits::bits_to_symbols`], which always
/// produces values within the alphabet.
pub fn generate_tone(profile: &Profile, symbol: u8) -> Vec<f32> {
    let freq = profile.frequencies()[symbol as usize];
    let n = profile.samples_per_symbol;
    let sample_rate = profile.sample_rate as f32;

    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

/// Generate the concatenated tone for a full sequence of symbols.
pub fn generate_tones(profile: &Profile, symbols: &[u8]) -> Vec<f32> {
    let mut out = Vec::with_capacity(symbols.len() * profile.samples_per_symbol);
    for &s in symbols {
        out.extend(generate_tone(profile, s));
    }
    out
}
