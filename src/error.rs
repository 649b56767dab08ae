use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Everything here is either a configuration mistake caught at startup or a
/// contract violation on the part of the caller; nothing in the hot loop
/// (stepping organisms, grid queries) is fallible.
#[derive(Debug, Error)]
pub enum EvoError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("mating requires at least one survivor")]
    NoSurvivors,

    #[error("genome length mismatch: {a} vs {b}")]
    GenomeLengthMismatch { a: usize, b: usize },
}

pub type EvoResult<T> = Result<T, EvoError>;
