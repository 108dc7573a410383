use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash string could not be parsed. A wrong password is not an
    /// error; it is reported as `Ok(false)`.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}
