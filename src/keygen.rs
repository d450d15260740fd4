//! Key generation and the persisted key forms.
//!
//! The private key is a vector of q nonzero residues; the public key is
//! q/2 linear equations over that vector, each offset by a bounded noise
//! term. Both are persisted as JSON: the secret as a bare list of
//! integers, the public key as a list of `[coefficients, constant]`
//! records. The modulus is implicit in the data (secret length, or the
//! coefficient arity of the first public equation), so loading never
//! needs extra context and never regenerates.

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::equation::Equation;
use crate::error::{Error, Result};
use crate::params::SchemeParams;
use crate::random::{noise_term, RandomSource};

/// The private key: q residues in `[1, q)`.
///
/// Zeroized on drop. Does not implement `Debug` to prevent accidental
/// logging of secret material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretKey {
    entries: Vec<i64>,
}

impl SecretKey {
    /// Draw q entries, each nonzero.
    pub fn generate(params: &SchemeParams, source: &mut dyn RandomSource) -> Self {
        let entries = (0..params.modulus)
            .map(|_| source.next_bounded(params.modulus, true) as i64)
            .collect();
        debug!(modulus = params.modulus, "generated secret vector");
        Self { entries }
    }

    /// Build a key from existing entries (loaded or fixed for tests).
    pub fn from_entries(entries: Vec<i64>) -> Self {
        Self { entries }
    }

    /// Strict parse of the persisted form: a JSON list of integers.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let key: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedKeyData(e.to_string()))?;
        if key.entries.is_empty() {
            return Err(Error::MalformedKeyData("secret key is empty".into()));
        }
        Ok(key)
    }

    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    /// The modulus is the vector length.
    pub fn modulus(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn params(&self) -> Result<SchemeParams> {
        SchemeParams::derive(self.modulus())
    }
}

/// The public key: q/2 equations statistically tied to the secret
/// vector by bounded noise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey {
    equations: Vec<Equation>,
}

impl PublicKey {
    /// Synthesize the equation set for an existing secret vector.
    ///
    /// Per equation: q nonzero coefficients, then
    /// `constant = dot(coefficients, secret) + noise`. The dot product
    /// and constant are plain integers — no reduction mod q.
    pub fn generate(
        params: &SchemeParams,
        secret: &SecretKey,
        source: &mut dyn RandomSource,
    ) -> Self {
        debug_assert_eq!(secret.modulus(), params.modulus);
        let mut equations = Vec::with_capacity(params.equation_count);
        for _ in 0..params.equation_count {
            let coefficients: Vec<i64> = (0..params.modulus)
                .map(|_| source.next_bounded(params.modulus, true) as i64)
                .collect();
            let mut constant = 0i64;
            for (c, s) in coefficients.iter().zip(secret.entries()) {
                constant += c * s;
            }
            constant += noise_term(source, params.max_error);
            equations.push(Equation::new(coefficients, constant));
        }
        debug!(
            modulus = params.modulus,
            equations = equations.len(),
            "generated public equation set"
        );
        Self { equations }
    }

    /// Strict parse of the persisted form: a JSON list of
    /// `[coefficients, constant]` records with uniform arity and exactly
    /// q/2 entries.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let key: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedKeyData(e.to_string()))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<()> {
        let first = self
            .equations
            .first()
            .ok_or_else(|| Error::MalformedKeyData("public key has no equations".into()))?;
        let arity = first.coefficients.len();
        if arity == 0 {
            return Err(Error::MalformedKeyData(
                "public equation has no coefficients".into(),
            ));
        }
        for (index, equation) in self.equations.iter().enumerate() {
            if equation.coefficients.len() != arity {
                return Err(Error::MalformedKeyData(format!(
                    "equation {index} has {} coefficients, expected {arity}",
                    equation.coefficients.len()
                )));
            }
        }
        let expected = crate::params::equation_count(arity as u64);
        if self.equations.len() != expected {
            return Err(Error::MalformedKeyData(format!(
                "public key has {} equations, expected {expected} for modulus {arity}",
                self.equations.len()
            )));
        }
        Ok(())
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// The modulus is the coefficient arity.
    pub fn modulus(&self) -> u64 {
        self.equations
            .first()
            .map(|eq| eq.coefficients.len() as u64)
            .unwrap_or(0)
    }

    pub fn params(&self) -> Result<SchemeParams> {
        SchemeParams::derive(self.modulus())
    }
}

/// Generate a fresh key pair for `modulus`.
///
/// The modulus is validated first; on rejection no generation work
/// happens at all.
pub fn generate_keys(
    modulus: u64,
    source: &mut dyn RandomSource,
) -> Result<(SecretKey, PublicKey)> {
    let params = SchemeParams::derive(modulus)?;
    let secret = SecretKey::generate(&params, source);
    let public = PublicKey::generate(&params, &secret, source);
    Ok((secret, public))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::EntropySource;

    #[test]
    fn secret_key_has_q_nonzero_entries() {
        let params = SchemeParams::derive(101).unwrap();
        let mut source = EntropySource::with_seed(1);
        let secret = SecretKey::generate(&params, &mut source);
        assert_eq!(secret.entries().len(), 101);
        assert_eq!(secret.modulus(), 101);
        for &entry in secret.entries() {
            assert!(entry >= 1 && entry < 101);
        }
    }

    #[test]
    fn public_key_noise_stays_bounded() {
        let params = SchemeParams::derive(101).unwrap();
        let mut source = EntropySource::with_seed(2);
        let secret = SecretKey::generate(&params, &mut source);
        let public = PublicKey::generate(&params, &secret, &mut source);

        assert_eq!(public.equations().len(), 50);
        for equation in public.equations() {
            assert_eq!(equation.coefficients.len(), 101);
            for &c in &equation.coefficients {
                assert!(c >= 1 && c < 101);
            }
            let noise = equation.constant - equation.evaluate(secret.entries());
            assert!(noise != 0);
            assert!(noise.abs() <= params.max_error);
        }
    }

    #[test]
    fn generate_keys_rejects_bad_modulus_before_any_work() {
        let mut source = EntropySource::with_seed(3);
        assert!(matches!(
            generate_keys(21, &mut source),
            Err(Error::Parameter { .. })
        ));
    }

    #[test]
    fn secret_key_persists_as_a_bare_list() {
        let secret = SecretKey::from_entries(vec![3, 1, 4, 1, 5]);
        let json = serde_json::to_vec(&secret).unwrap();
        assert_eq!(json, b"[3,1,4,1,5]");
    }

    #[test]
    fn loading_a_secret_key_is_idempotent() {
        let params = SchemeParams::derive(89).unwrap();
        let mut source = EntropySource::with_seed(4);
        let secret = SecretKey::generate(&params, &mut source);
        let json = serde_json::to_vec(&secret).unwrap();
        let once = SecretKey::from_json(&json).unwrap();
        let twice = SecretKey::from_json(&json).unwrap();
        assert_eq!(once.entries(), secret.entries());
        assert_eq!(once.entries(), twice.entries());
    }

    #[test]
    fn loading_a_public_key_is_idempotent() {
        let mut source = EntropySource::with_seed(5);
        let (_, public) = generate_keys(89, &mut source).unwrap();
        let json = serde_json::to_vec(&public).unwrap();
        let once = PublicKey::from_json(&json).unwrap();
        let twice = PublicKey::from_json(&json).unwrap();
        assert_eq!(once, public);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_secret_key_is_malformed() {
        assert!(matches!(
            SecretKey::from_json(b"[]"),
            Err(Error::MalformedKeyData(_))
        ));
        assert!(matches!(
            SecretKey::from_json(b"{\"oops\": 1}"),
            Err(Error::MalformedKeyData(_))
        ));
    }

    #[test]
    fn ragged_public_key_is_malformed() {
        let json = br#"[[[1,2,3],4],[[1,2],3]]"#;
        assert!(matches!(
            PublicKey::from_json(json),
            Err(Error::MalformedKeyData(_))
        ));
    }

    #[test]
    fn truncated_public_key_is_malformed() {
        let mut source = EntropySource::with_seed(6);
        let (_, public) = generate_keys(89, &mut source).unwrap();
        let truncated: Vec<_> = public.equations()[..10].to_vec();
        let json = serde_json::to_vec(&truncated).unwrap();
        assert!(matches!(
            PublicKey::from_json(&json),
            Err(Error::MalformedKeyData(_))
        ));
    }
}
