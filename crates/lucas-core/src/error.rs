use lucas_explore::SearchError;
use lucas_model::InvalidInput;

use crate::limits::LimitViolation;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Input(#[from] InvalidInput),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("limit exceeded: {0}")]
    LimitExceeded(#[from] LimitViolation),

    #[error("invalid run configuration: {0}")]
    Config(String),

    #[error("no coset of the Hamming code seeds n={n}, s={s}")]
    NoSeed { n: u32, s: u32 },
}
