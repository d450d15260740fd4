//! Decryption: recovering bits from embedded equations.
//!
//! The secret-vector holder recomputes each equation's implied value and
//! classifies the residual `constant - dot(coefficients, secret)` into
//! one of two acceptance bands: around `q/2` for a 1 bit, around 0 for a
//! 0 bit, each `tolerance` wide. A residual outside both bands is
//! ambiguous. The strict API surfaces ambiguity as a typed error; the
//! fallback API reproduces the reference behavior (random substitution)
//! but counts every substituted bit and character instead of hiding
//! them.

use tracing::warn;

use crate::encrypt::{Ciphertext, BITS_PER_CHAR};
use crate::equation::Equation;
use crate::error::{Error, Result};
use crate::keygen::SecretKey;
use crate::params::SchemeParams;
use crate::random::RandomSource;

/// Printable ASCII range accepted by the character decoder.
const PRINTABLE_MIN: u8 = 32;
const PRINTABLE_MAX: u8 = 126;

/// Band classification of one decoded residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitClass {
    Zero,
    One,
    /// Residual outside both bands: decode failure for this bit.
    Ambiguous,
}

/// Classify one equation against the secret vector.
///
/// Pure function of `(equation, secret, params)`: the affirmative band
/// `q/2 ± tolerance` is checked first, then the negative band
/// `0 ± tolerance`.
pub fn classify(equation: &Equation, secret: &SecretKey, params: &SchemeParams) -> BitClass {
    let residual = equation.constant - equation.evaluate(secret.entries());
    if (residual - params.bias_unit()).abs() <= params.tolerance {
        BitClass::One
    } else if residual.abs() <= params.tolerance {
        BitClass::Zero
    } else {
        BitClass::Ambiguous
    }
}

/// Outcome of a fallback decode: the plaintext plus a count of every
/// substitution the fallback made. Nonzero counts mean the plaintext
/// contains silently guessed material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub plaintext: String,
    pub ambiguous_bits: usize,
    pub substituted_chars: usize,
}

impl DecodeReport {
    /// True when nothing had to be guessed.
    pub fn is_exact(&self) -> bool {
        self.ambiguous_bits == 0 && self.substituted_chars == 0
    }
}

fn check_block<'a>(
    block: &'a [Equation],
    secret: &SecretKey,
    char_index: usize,
) -> Result<&'a [Equation]> {
    if block.len() != BITS_PER_CHAR {
        return Err(Error::MalformedCiphertext(format!(
            "character {char_index} has {} equations, expected {BITS_PER_CHAR}",
            block.len()
        )));
    }
    for equation in block {
        if equation.coefficients.len() != secret.entries().len() {
            return Err(Error::MalformedCiphertext(format!(
                "character {char_index} has coefficient arity {}, secret key length is {}",
                equation.coefficients.len(),
                secret.entries().len()
            )));
        }
    }
    Ok(block)
}

/// Decrypt a ciphertext, failing on the first ambiguous residual or
/// unprintable character.
///
/// This is the recommended mode: nothing is ever silently substituted,
/// and the error pinpoints the failing character and bit.
pub fn decrypt(secret: &SecretKey, ciphertext: &Ciphertext) -> Result<String> {
    let params = secret.params()?;
    let mut plaintext = String::with_capacity(ciphertext.char_count());

    for (char_index, block) in ciphertext.blocks().iter().enumerate() {
        let block = check_block(block, secret, char_index)?;
        let mut value: u8 = 0;
        for (bit_index, equation) in block.iter().enumerate() {
            value <<= 1;
            match classify(equation, secret, &params) {
                BitClass::One => value |= 1,
                BitClass::Zero => {}
                BitClass::Ambiguous => {
                    return Err(Error::AmbiguousBit {
                        char_index,
                        bit_index,
                    });
                }
            }
        }
        if !(PRINTABLE_MIN..=PRINTABLE_MAX).contains(&value) {
            return Err(Error::UnprintableCharacter { char_index, value });
        }
        plaintext.push(char::from(value));
    }

    Ok(plaintext)
}

/// Decrypt with the reference fallback behavior: an ambiguous residual
/// becomes a uniformly random bit and an unprintable character a
/// uniformly random printable one.
///
/// Every substitution is a guess over corrupted data, so each one is
/// counted in the returned [`DecodeReport`] and logged.
pub fn decrypt_with_fallback(
    secret: &SecretKey,
    ciphertext: &Ciphertext,
    source: &mut dyn RandomSource,
) -> Result<DecodeReport> {
    let params = secret.params()?;
    let mut plaintext = String::with_capacity(ciphertext.char_count());
    let mut ambiguous_bits = 0usize;
    let mut substituted_chars = 0usize;

    for (char_index, block) in ciphertext.blocks().iter().enumerate() {
        let block = check_block(block, secret, char_index)?;
        let mut value: u8 = 0;
        for (bit_index, equation) in block.iter().enumerate() {
            value <<= 1;
            match classify(equation, secret, &params) {
                BitClass::One => value |= 1,
                BitClass::Zero => {}
                BitClass::Ambiguous => {
                    warn!(char_index, bit_index, "ambiguous residual, substituting a random bit");
                    ambiguous_bits += 1;
                    if source.next_bounded(2, false) == 1 {
                        value |= 1;
                    }
                }
            }
        }
        if !(PRINTABLE_MIN..=PRINTABLE_MAX).contains(&value) {
            warn!(char_index, value, "unprintable decode, substituting a random character");
            substituted_chars += 1;
            let span = (PRINTABLE_MAX - PRINTABLE_MIN + 1) as u64;
            value = source.next_bounded(span, false) as u8 + PRINTABLE_MIN;
        }
        plaintext.push(char::from(value));
    }

    Ok(DecodeReport {
        plaintext,
        ambiguous_bits,
        substituted_chars,
    })
}
