use thiserror::Error;

/// Error type for access token operations.
///
/// Verification failures collapse into two kinds: `Expired` for a genuine
/// token past its `exp`, and `Invalid` for everything else.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token expiration is out of range")]
    ExpirationOutOfRange,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}
