use std::sync::Arc;

use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::get_current_timestamp;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::ALGORITHM;
use crate::keys::KeyPair;

/// Validates access tokens against the public key.
///
/// Only RS256 is accepted, with no clock leeway. `sub` and `exp` must both
/// be present; `nbf` is enforced when a token carries one.
#[derive(Clone)]
pub struct TokenVerifier {
    verification_key: Arc<DecodingKey>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: &KeyPair) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            verification_key: keys.verification_key(),
            validation,
        }
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `Expired` - Signature is valid but `exp` is not in the future
    /// * `Invalid` - Any other failure (signature, structure, algorithm, claims)
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.verification_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        // The library still accepts a token in its final second.
        if token_data.claims.is_expired(get_current_timestamp() as i64) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
