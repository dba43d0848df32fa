//! Error type shared by configuration loading and dictionary record checks.
//!
//! Queries never fail; only construction-time paths return `PunError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PunError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cannot serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The phonetic sequence does not line up with the characters of `text`.
    #[error("malformed record {text:?}: {chars} characters but {positions} phonetic positions")]
    MalformedItem {
        text: String,
        chars: usize,
        positions: usize,
    },

    /// No character of `text` has a known pronunciation.
    #[error("record {0:?} has no resolvable phonetic key")]
    Unresolvable(String),
}

pub type Result<T> = std::result::Result<T, PunError>;
