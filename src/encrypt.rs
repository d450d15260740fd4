//! Encryption: embedding plaintext bits into synthesized equations.
//!
//! # Encryption path
//!
//! 1. **Bit**: sum `component_limit` public equations, chosen
//!    independently and uniformly at random with replacement, then add
//!    `(q/2) * bit` to the constant. The capped component count keeps
//!    worst-case accumulated noise inside the decode tolerance.
//! 2. **Character**: low 8 bits of the code point, most-significant bit
//!    first, one embedded equation per bit. Code points above 255 are
//!    truncated by this encoding, so practical plaintext is 0–255.
//! 3. **String**: one 8-equation block per character, order preserving.
//!    The ciphertext is only produced once every character succeeded.

use serde::{Deserialize, Serialize};

use crate::equation::Equation;
use crate::error::{Error, Result};
use crate::keygen::PublicKey;
use crate::params::SchemeParams;
use crate::random::RandomSource;

/// Bits embedded per plaintext character.
pub const BITS_PER_CHAR: usize = 8;

/// A full encrypted string: one 8-equation block per character.
///
/// Persisted as a JSON list (one element per character) of 8-element
/// lists of `[coefficients, constant]` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext {
    blocks: Vec<Vec<Equation>>,
}

impl Ciphertext {
    /// Strict parse of the persisted form.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let ciphertext: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedCiphertext(e.to_string()))?;
        ciphertext.validate()?;
        Ok(ciphertext)
    }

    fn validate(&self) -> Result<()> {
        let mut arity = None;
        for (char_index, block) in self.blocks.iter().enumerate() {
            if block.len() != BITS_PER_CHAR {
                return Err(Error::MalformedCiphertext(format!(
                    "character {char_index} has {} equations, expected {BITS_PER_CHAR}",
                    block.len()
                )));
            }
            for equation in block {
                let len = equation.coefficients.len();
                match arity {
                    None => arity = Some(len),
                    Some(expected) if expected != len => {
                        return Err(Error::MalformedCiphertext(format!(
                            "character {char_index} mixes coefficient arities {expected} and {len}"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn blocks(&self) -> &[Vec<Equation>] {
        &self.blocks
    }

    /// Number of encrypted characters.
    pub fn char_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Synthesize one equation carrying a single bit.
pub fn embed_bit(
    public: &PublicKey,
    params: &SchemeParams,
    bit: bool,
    source: &mut dyn RandomSource,
) -> Equation {
    let mut accumulator = Equation::empty();
    for _ in 0..params.component_limit {
        let index = source.next_bounded(params.equation_count as u64, false) as usize;
        accumulator = accumulator.add(&public.equations()[index]);
    }
    let bias = params.bias_unit() * i64::from(bit);
    accumulator.embed(bias)
}

/// Encrypt one character as 8 embedded-bit equations, MSB first.
pub fn encrypt_char(
    public: &PublicKey,
    params: &SchemeParams,
    character: char,
    source: &mut dyn RandomSource,
) -> Vec<Equation> {
    let code = (character as u32 & 0xff) as u8;
    (0..BITS_PER_CHAR)
        .rev()
        .map(|bit_index| embed_bit(public, params, (code >> bit_index) & 1 == 1, source))
        .collect()
}

/// Encrypt a string against a public key.
///
/// The modulus (and every derived constant) comes from the key itself,
/// so a key whose arity fails the modulus policy is rejected here.
pub fn encrypt(
    public: &PublicKey,
    plaintext: &str,
    source: &mut dyn RandomSource,
) -> Result<Ciphertext> {
    let params = public.params()?;
    let blocks = plaintext
        .chars()
        .map(|character| encrypt_char(public, &params, character, source))
        .collect();
    Ok(Ciphertext { blocks })
}
