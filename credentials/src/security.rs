use chrono::Duration;
use ::config::ConfigError;

use crate::config::SecurityConfig;
use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::keys::KeyLoadError;
use crate::keys::KeyPair;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Credential coordinator combining token issuance, token verification and
/// password hashing.
///
/// Built once at startup and shared (e.g. behind `Arc`) by every request
/// handler; all operations take `&self` and touch only immutable state.
#[derive(Clone)]
pub struct Security {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    password_hasher: PasswordHasher,
}

/// Startup errors; the process must not serve requests after one of these.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Key load error: {0}")]
    KeyLoad(#[from] KeyLoadError),
}

/// Login operation errors.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Security {
    /// Create a coordinator from already loaded keys.
    ///
    /// # Arguments
    /// * `keys` - RSA key pair
    /// * `default_lifetime` - Access token lifetime used when no override is given
    /// * `password_hasher` - Hasher carrying the configured cost
    pub fn new(keys: KeyPair, default_lifetime: Duration, password_hasher: PasswordHasher) -> Self {
        Self {
            issuer: TokenIssuer::new(&keys, default_lifetime),
            verifier: TokenVerifier::new(&keys),
            password_hasher,
        }
    }

    /// Load the key files named by the configuration and build a coordinator.
    ///
    /// # Errors
    /// * `Config` - The configuration fails validation
    /// * `KeyLoad` - A key file is missing, unreadable or not an RSA PEM key
    pub fn from_config(config: &SecurityConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let default_lifetime = config.default_token_lifetime()?;
        let keys = KeyPair::load(config)?;

        Ok(Self::new(keys, default_lifetime, PasswordHasher::new()))
    }

    /// Create a signed access token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Identifier the token asserts, stored as its string form
    /// * `expires_in` - Optional lifetime override
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn create_access_token(
        &self,
        subject: impl ToString,
        expires_in: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.issuer.create_access_token(subject, expires_in)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `Expired` - Token is past its expiration
    /// * `Invalid` - Signature, structure or algorithm is wrong
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verifier.decode_access_token(token)
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Whether a stored hash should be replaced after the next successful login.
    pub fn password_needs_rehash(&self, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.needs_rehash(stored_hash)
    }

    /// Verify credentials and issue an access token with the default lifetime.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier to put in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `TokenError` - Token generation failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<String, LoginError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(LoginError::InvalidCredentials);
        }

        Ok(self.issuer.create_access_token(subject, None)?)
    }
}
