//! Goertzel-bank symbol detector.
//!
//! The per-sample inner loop is the hot path of the whole pipeline, so the bank
//! precomputes `(k, omega, coeff, cos_omega, sin_omega)` for every symbol once, from the
//! profile, rather than recomputing it per window.

use crate::profile::{MAX_ALPHABET, Profile};

#[derive(Debug, Clone, Copy)]
struct GoertzelCoeffs {
    coeff: f32,
    cos_omega: f32,
    sin_omega: f32,
}

/// A precomputed bank of per-symbol Goertzel coefficients for one profile.
pub struct GoertzelBank {
    coeffs: [GoertzelCoeffs; MAX_ALPHABET],
    alphabet_size: usize,
    window_len: usize,
}

impl GoertzelBank {
    pub fn new(profile: &Profile) -> Self {
        let n = profile.samples_per_symbol as f32;
        let mut coeffs = [GoertzelCoeffs {
            coeff: 0.0,
            cos_omega: 0.0,
            sin_omega: 0.0,
        }; MAX_ALPHABET];

        for (i, &freq) in profile.frequencies().iter().enumerate() {
            let k = (n * freq / profile.sample_rate as f32).round();
            let omega = 2.0 * std::f32::consts::PI * k / n;
            coeffs[i] = GoertzelCoeffs {
                coeff: 2.0 * omega.cos(),
                cos_omega: omega.cos(),
                sin_omega: omega.sin(),
            };
        }

        Self {
            coeffs,
            alphabet_size: profile.alphabet_size,
            window_len: profile.samples_per_symbol,
        }
    }

    /// The exact window length this bank expects, i.e. `profile.samples_per_symbol`.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Estimate the most-likely symbol in a window of exactly `window_len` samples.
    ///
    /// Returns `None` if `window` is shorter than `window_len` (the caller should treat
    /// this as end-of-stream). Ties (exact float equality) are broken by the lower
    /// symbol index, since `>` below only updates on a strict improvement.
    pub fn detect(&self, window: &[f32]) -> Option<u8> {
        if window.len() < self.window_len {
            return None;
        }

        let window = &window[..self.window_len];

        let mut best_symbol = 0u8;
        let mut best_energy = f32::NEG_INFINITY;

        for symbol in 0..self.alphabet_size {
            let c = &self.coeffs[symbol];
            let mut q1 = 0.0f32;
            let mut q2 = 0.0f32;

            for &x in window {
                let q0 = c.coeff * q1 - q2 + x;
                q2 = q1;
                q1 = q0;
            }

            let real = q1 - q2 * c.cos_omega;
            let imag = q2 * c.sin_omega;
            let energy = real * real + imag * imag;

            if energy > best_energy {
                best_energy = energy;
                best_symbol = symbol as u8;
            }
        }

        Some(best_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::generate_tone;

    #[test]
    fn recovers_exact_symbol_with_zero_noise() {
        for profile in [Profile::audible(), Profile::ultrasonic()] {
            let bank = GoertzelBank::new(&profile);
            for symbol in 0..profile.alphabet_size as u8 {
                let tone = generate_tone(&profile, symbol);
                assert_eq!(bank.detect(&tone), Some(symbol));
            }
        }
    }

    #[test]
    fn short_window_is_rejected() {
        let profile = Profile::audible();
        let bank = GoertzelBank::new(&profile);
        let short = vec![0.0f32; bank.window_len() - 1];
        assert_eq!(bank.detect(&short), None);
    }

    #[test]
    fn window_len_matches_profile() {
        let profile = Profile::ultrasonic();
        let bank = GoertzelBank::new(&profile);
        assert_eq!(bank.window_len(), profile.samples_per_symbol);
    }
}
