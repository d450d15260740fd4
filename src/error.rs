use thiserror::Error;

use crate::params::ModulusViolation;

fn join_violations(violations: &[ModulusViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("modulus rejected: {}", join_violations(.violations))]
    Parameter { violations: Vec<ModulusViolation> },

    #[error("malformed key data: {0}")]
    MalformedKeyData(String),

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("ambiguous residual at character {char_index}, bit {bit_index}")]
    AmbiguousBit { char_index: usize, bit_index: usize },

    #[error("character {char_index} decoded to unprintable code {value}")]
    UnprintableCharacter { char_index: usize, value: u8 },

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
