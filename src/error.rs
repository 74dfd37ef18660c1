use thiserror::Error;

/// Internal failure signal for the recovery tiers.
///
/// Nothing in this crate surfaces an `Error` to callers of the public
/// extraction entry points; tiers return `Result` so the driver can fall
/// through to the next, more aggressive strategy, and the last fall-through
/// degrades to an empty or partial value.
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
