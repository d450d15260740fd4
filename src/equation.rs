//! The noisy linear equation value type.
//!
//! An equation is the pair `(coefficients, constant)` standing for
//! `constant ≈ dot(coefficients, secret) + noise`. All arithmetic here
//! is over unbounded signed integers: unlike textbook LWE, neither the
//! running dot product nor the constant is ever reduced mod q. The
//! modulus only bounds random draws and decode thresholds elsewhere.

use serde::{Deserialize, Serialize};

/// One linear equation over the secret vector.
///
/// Value object: combining equations always produces a new one. The
/// persisted form is the two-element record `[coefficients, constant]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Vec<i64>, i64)", into = "(Vec<i64>, i64)")]
pub struct Equation {
    pub coefficients: Vec<i64>,
    pub constant: i64,
}

impl From<(Vec<i64>, i64)> for Equation {
    fn from((coefficients, constant): (Vec<i64>, i64)) -> Self {
        Self {
            coefficients,
            constant,
        }
    }
}

impl From<Equation> for (Vec<i64>, i64) {
    fn from(eq: Equation) -> Self {
        (eq.coefficients, eq.constant)
    }
}

impl Equation {
    pub fn new(coefficients: Vec<i64>, constant: i64) -> Self {
        Self {
            coefficients,
            constant,
        }
    }

    /// The additive identity accumulator: no coefficients, constant 0.
    /// The first addition adopts the operand's full coefficient vector.
    pub fn empty() -> Self {
        Self {
            coefficients: Vec::new(),
            constant: 0,
        }
    }

    /// Sum two equations: element-wise over the shared prefix, with the
    /// longer operand's tail appended. Missing positions are absent, not
    /// zero — accumulation grows the shorter vector instead of padding
    /// it. Operands of equal length get the plain vector sum.
    pub fn add(&self, other: &Equation) -> Equation {
        let mut coefficients: Vec<i64> = self
            .coefficients
            .iter()
            .zip(&other.coefficients)
            .map(|(a, b)| a + b)
            .collect();
        if self.coefficients.len() < other.coefficients.len() {
            coefficients.extend_from_slice(&other.coefficients[self.coefficients.len()..]);
        } else if other.coefficients.len() < self.coefficients.len() {
            coefficients.extend_from_slice(&self.coefficients[other.coefficients.len()..]);
        }
        Equation {
            coefficients,
            constant: self.constant + other.constant,
        }
    }

    /// Fold a value into the constant, leaving coefficients untouched.
    pub fn embed(&self, value: i64) -> Equation {
        Equation {
            coefficients: self.coefficients.clone(),
            constant: self.constant + value,
        }
    }

    /// Dot product of the coefficients with a secret vector.
    pub fn evaluate(&self, secret: &[i64]) -> i64 {
        debug_assert_eq!(self.coefficients.len(), secret.len());
        self.coefficients
            .iter()
            .zip(secret)
            .map(|(c, s)| c * s)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(coefficients: &[i64], constant: i64) -> Equation {
        Equation::new(coefficients.to_vec(), constant)
    }

    #[test]
    fn addition_is_commutative_for_equal_lengths() {
        let a = eq(&[1, 2, 3], 10);
        let b = eq(&[4, 5, 6], -2);
        assert_eq!(a.add(&b), b.add(&a));
        assert_eq!(a.add(&b), eq(&[5, 7, 9], 8));
    }

    #[test]
    fn addition_is_associative_for_equal_lengths() {
        let a = eq(&[1, 2], 1);
        let b = eq(&[3, 4], 2);
        let c = eq(&[5, 6], 3);
        assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn adding_into_the_empty_accumulator_adopts_the_operand() {
        let acc = Equation::empty();
        let a = eq(&[7, 8, 9], 4);
        assert_eq!(acc.add(&a), a);
    }

    #[test]
    fn asymmetric_lengths_append_the_tail() {
        // Absent positions are appended, not padded with zeros and
        // summed; the numeric outcome coincides, the growth is the point.
        let short = eq(&[1, 2], 5);
        let long = eq(&[10, 20, 30, 40], 1);
        let sum = short.add(&long);
        assert_eq!(sum, eq(&[11, 22, 30, 40], 6));
        let sum_rev = long.add(&short);
        assert_eq!(sum_rev, eq(&[11, 22, 30, 40], 6));
    }

    #[test]
    fn embed_only_touches_the_constant() {
        let a = eq(&[1, 2, 3], 10);
        let embedded = a.embed(44);
        assert_eq!(embedded.coefficients, a.coefficients);
        assert_eq!(embedded.constant, 54);
    }

    #[test]
    fn evaluate_is_the_plain_dot_product() {
        let a = eq(&[2, 3, 4], 0);
        assert_eq!(a.evaluate(&[1, 1, 1]), 9);
        assert_eq!(a.evaluate(&[10, 0, -1]), 16);
    }

    #[test]
    fn serde_shape_is_a_two_element_record() {
        let a = eq(&[1, 2, 3], 7);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "[[1,2,3],7]");
        let back: Equation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
