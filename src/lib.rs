//! lweq: a toy asymmetric cipher over noisy linear equations.
//!
//! # ⚠️ WARNING: NOT A SECURE SCHEME ⚠️
//!
//! This is a learning toy in the style of Learning With Errors, kept
//! faithful to its original design, weaknesses included. Do not protect
//! anything with it.
//!
//! Key components:
//! - A secret vector of q residues as the private key
//! - q/2 noisy linear equations over that vector as the public key
//! - Bit embedding: sum a random multiset of public equations, then add
//!   a q/2 bias for a 1 bit
//! - Band decoding: classify the residual against the secret vector
//!   into "bit 1", "bit 0", or "ambiguous"
//!
//! Unlike textbook LWE, dot products and constants are never reduced
//! mod q; the modulus only bounds random draws and decode thresholds.
//! That deviation is deliberate and load-bearing — the decode bands are
//! calibrated for unbounded arithmetic.

pub mod decrypt;
pub mod encrypt;
pub mod equation;
pub mod error;
pub mod keygen;
pub mod params;
pub mod random;
pub mod store;

pub use decrypt::{classify, decrypt, decrypt_with_fallback, BitClass, DecodeReport};
pub use encrypt::{embed_bit, encrypt, encrypt_char, Ciphertext, BITS_PER_CHAR};
pub use equation::Equation;
pub use error::{Error, Result};
pub use keygen::{generate_keys, PublicKey, SecretKey};
pub use params::{validate_modulus, ModulusViolation, SchemeParams};
pub use random::{ClockSource, EntropySource, RandomSource};
pub use store::{ArtifactKind, DirRepository, KeyRepository};
