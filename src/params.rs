//! Scheme parameters derived from the modulus.
//!
//! Every constant the scheme needs is a pure function of the modulus q:
//! the per-equation noise bound, the decode tolerance, the number of
//! public equations summed per embedded bit, and the public-key size.
//! The component limit is chosen so that worst-case accumulated noise
//! (`component_limit * max_error`) never leaves the decode band
//! (`tolerance`), which is what keeps the two bands disjoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted modulus. Guarantees `max_error >= 1` and a usable
/// component limit.
pub const MIN_MODULUS: u64 = 23;

/// Largest accepted modulus. Keeps coefficient and constant magnitudes
/// (and persisted file sizes) bounded.
pub const MAX_MODULUS: u64 = 499;

/// Per-equation noise bound: floor(q * 0.05).
pub fn max_error(q: u64) -> i64 {
    (q / 20) as i64
}

/// Half-width of the decode acceptance band around each target value.
pub fn tolerance(q: u64) -> i64 {
    (q / 4) as i64 - 1
}

/// Number of public equations summed per embedded bit.
///
/// Returns 0 when `max_error(q)` vanishes (q below 20); such moduli are
/// rejected by [`validate_modulus`] before any arithmetic runs.
pub fn component_limit(q: u64) -> usize {
    let bound = max_error(q);
    if bound == 0 {
        return 0;
    }
    (tolerance(q) / bound) as usize
}

/// Number of equations in a public key.
pub fn equation_count(q: u64) -> usize {
    (q / 2) as usize
}

/// Trial division up to floor(sqrt(n)).
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut i: u64 = 2;
    while (i as u128) * (i as u128) <= n as u128 {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// A single violated modulus-acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulusViolation {
    NotPrime,
    BelowMinimum,
    AboveMaximum,
    /// The derived component limit is zero, so no bit can be embedded.
    ZeroComponentLimit,
}

impl fmt::Display for ModulusViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModulusViolation::NotPrime => write!(f, "modulus is not prime"),
            ModulusViolation::BelowMinimum => {
                write!(f, "modulus must be {} or larger", MIN_MODULUS)
            }
            ModulusViolation::AboveMaximum => {
                write!(f, "modulus must be {} or smaller", MAX_MODULUS)
            }
            ModulusViolation::ZeroComponentLimit => {
                write!(f, "encapsulation component limit is zero")
            }
        }
    }
}

/// Check a proposed modulus against every acceptance policy.
///
/// Policies are checked independently, so one modulus can violate
/// several at once (500 is both composite and above the maximum).
pub fn validate_modulus(q: u64) -> Vec<ModulusViolation> {
    let mut violations = Vec::new();
    if !is_prime(q) {
        violations.push(ModulusViolation::NotPrime);
    }
    if q < MIN_MODULUS {
        violations.push(ModulusViolation::BelowMinimum);
    }
    if q > MAX_MODULUS {
        violations.push(ModulusViolation::AboveMaximum);
    }
    if component_limit(q) < 1 {
        violations.push(ModulusViolation::ZeroComponentLimit);
    }
    violations
}

/// Derived constants for one accepted modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeParams {
    /// Scheme modulus q. Bounds random draws and decode thresholds only;
    /// equation arithmetic itself is never reduced mod q.
    pub modulus: u64,
    /// Per-equation noise bound.
    pub max_error: i64,
    /// Decode band half-width.
    pub tolerance: i64,
    /// Public equations summed per embedded bit.
    pub component_limit: usize,
    /// Equations in a public key.
    pub equation_count: usize,
}

impl SchemeParams {
    /// Derive all constants for `modulus`, rejecting it with the full
    /// violation list before any generation work happens.
    pub fn derive(modulus: u64) -> Result<Self> {
        let violations = validate_modulus(modulus);
        if !violations.is_empty() {
            return Err(Error::Parameter { violations });
        }
        Ok(Self {
            modulus,
            max_error: max_error(modulus),
            tolerance: tolerance(modulus),
            component_limit: component_limit(modulus),
            equation_count: equation_count(modulus),
        })
    }

    /// Center of the affirmative decode band; also the constant bias
    /// added when embedding a 1 bit.
    pub fn bias_unit(&self) -> i64 {
        (self.modulus / 2) as i64
    }
}
