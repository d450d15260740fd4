//! Bounded randomness behind a swappable strategy.
//!
//! Every generator in the crate draws through [`RandomSource`], so the
//! strategy can be swapped (deterministic for tests, OS entropy for real
//! use, the reference clock fold for parity runs) without touching any
//! other component.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Produces bounded non-negative integers.
///
/// The result is in `[0, bound)`. When `non_zero` is set, a raw draw of
/// 0 is remapped to 1 (not resampled), giving `[1, bound)` with a small
/// extra weight on 1.
pub trait RandomSource {
    fn next_bounded(&mut self, bound: u64, non_zero: bool) -> u64;
}

/// ChaCha20-backed source seeded from OS entropy, or from a fixed seed
/// for reproducible runs.
pub struct EntropySource {
    rng: ChaCha20Rng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a seeded source for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_bounded(&mut self, bound: u64, non_zero: bool) -> u64 {
        debug_assert!(bound > 0);
        let raw = self.rng.gen_range(0..bound);
        if raw == 0 && non_zero {
            1
        } else {
            raw
        }
    }
}

/// The reference strategy: folds the decimal digits of a nanosecond
/// timestamp through a multiplicative accumulator and reduces it modulo
/// the bound.
///
/// This is NOT a secure source of randomness — consecutive draws are
/// strongly correlated with the clock. It exists as the replaceable
/// reference behavior; use [`EntropySource`] for anything real.
pub struct ClockSource;

impl RandomSource for ClockSource {
    fn next_bounded(&mut self, bound: u64, non_zero: bool) -> u64 {
        debug_assert!(bound > 0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        // factor = (factor + d) * d for each nonzero decimal digit d,
        // seeded at 1, high-order digits first.
        let mut factor: u128 = 1;
        let mut scale: u128 = 1;
        while scale <= nanos / 10 {
            scale *= 10;
        }
        while scale > 0 {
            let digit = (nanos / scale) % 10;
            if digit != 0 {
                factor = (factor + digit) * digit;
            }
            scale /= 10;
        }

        let value = (factor % bound as u128) as u64;
        if value == 0 && non_zero {
            1
        } else {
            value
        }
    }
}

/// Draw one signed noise term: sign by a fair coin (a draw of 1 means
/// negative), magnitude in `[1, max_error]` via the non-zero draw.
pub fn noise_term(source: &mut dyn RandomSource, max_error: i64) -> i64 {
    let negative = source.next_bounded(2, false) == 1;
    let magnitude = source.next_bounded(max_error as u64, true) as i64;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
