use std::fs;
use std::path::Path;
use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::KeyLoadError;
use crate::config::SecurityConfig;

/// RSA key pair used for RS256 token signing and verification.
///
/// Parsed once at startup and immutable afterwards. Keys sit behind `Arc`
/// so clones share the same material.
#[derive(Clone)]
pub struct KeyPair {
    signing: Arc<EncodingKey>,
    verification: Arc<DecodingKey>,
}

impl KeyPair {
    /// Read and parse both key files named by the configuration.
    ///
    /// # Errors
    /// * `Read` - A key file is missing or unreadable
    /// * `InvalidKey` - A key file does not hold a usable RSA PEM key
    pub fn load(config: &SecurityConfig) -> Result<Self, KeyLoadError> {
        let private_pem = read_key_file(&config.private_key_path)?;
        let public_pem = read_key_file(&config.public_key_path)?;

        let keys = Self::from_pem(&private_pem, &public_pem)?;

        tracing::info!(
            private_key_path = %config.private_key_path.display(),
            public_key_path = %config.public_key_path.display(),
            "Signing keys loaded"
        );

        Ok(keys)
    }

    /// Build a key pair from PEM text already in memory.
    ///
    /// The two keys are not checked against each other; a mismatched pair
    /// shows up as rejected tokens.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, KeyLoadError> {
        let signing = EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(|e| {
            KeyLoadError::InvalidKey {
                key: "private",
                reason: e.to_string(),
            }
        })?;

        let verification = DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(|e| {
            KeyLoadError::InvalidKey {
                key: "public",
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            signing: Arc::new(signing),
            verification: Arc::new(verification),
        })
    }

    pub(crate) fn signing_key(&self) -> Arc<EncodingKey> {
        Arc::clone(&self.signing)
    }

    pub(crate) fn verification_key(&self) -> Arc<DecodingKey> {
        Arc::clone(&self.verification)
    }
}

fn read_key_file(path: &Path) -> Result<String, KeyLoadError> {
    fs::read_to_string(path).map_err(|source| KeyLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
