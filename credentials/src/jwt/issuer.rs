use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;
use super::ALGORITHM;
use crate::keys::KeyPair;

/// Issues RS256-signed access tokens.
///
/// Holds only the private half of the key pair.
#[derive(Clone)]
pub struct TokenIssuer {
    signing_key: Arc<EncodingKey>,
    default_lifetime: Duration,
}

impl TokenIssuer {
    /// Create a new issuer.
    ///
    /// # Arguments
    /// * `keys` - Loaded key pair; only the private key is kept
    /// * `default_lifetime` - Lifetime applied when a caller gives no override
    pub fn new(keys: &KeyPair, default_lifetime: Duration) -> Self {
        Self {
            signing_key: keys.signing_key(),
            default_lifetime,
        }
    }

    pub fn default_lifetime(&self) -> Duration {
        self.default_lifetime
    }

    /// Create a signed access token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Identifier the token asserts; stored as its string form
    /// * `expires_in` - Lifetime override; a negative value yields an already expired token
    ///
    /// # Returns
    /// Compact JWS string carrying `sub` and `exp`
    ///
    /// # Errors
    /// * `ExpirationOutOfRange` - `now + expires_in` is not a representable instant
    /// * `EncodingFailed` - Signing failed
    pub fn create_access_token(
        &self,
        subject: impl ToString,
        expires_in: Option<Duration>,
    ) -> Result<String, TokenError> {
        let expires_at = Utc::now()
            .checked_add_signed(expires_in.unwrap_or(self.default_lifetime))
            .ok_or(TokenError::ExpirationOutOfRange)?;
        let claims = Claims::new(subject, expires_at);

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(ALGORITHM);

        encode(&header, claims, &self.signing_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use super::*;

    fn test_keys() -> KeyPair {
        KeyPair::from_pem(
            include_str!("../../tests/fixtures/private.pem"),
            include_str!("../../tests/fixtures/public.pem"),
        )
        .expect("Failed to parse test keys")
    }

    fn decode_segment(segment: &str) -> serde_json::Value {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .expect("Segment is not base64url");
        serde_json::from_slice(&bytes).expect("Segment is not JSON")
    }

    #[test]
    fn test_token_has_three_segments() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::minutes(60));

        let token = issuer
            .create_access_token("user123", None)
            .expect("Failed to create token");

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_header_declares_rs256() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::minutes(60));

        let token = issuer
            .create_access_token("user123", None)
            .expect("Failed to create token");
        let header = decode_segment(token.split('.').next().unwrap());

        assert_eq!(header["alg"], "RS256");
    }

    #[test]
    fn test_payload_uses_default_lifetime() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::minutes(30));
        let before = Utc::now().timestamp();

        let token = issuer
            .create_access_token(7, None)
            .expect("Failed to create token");
        let after = Utc::now().timestamp();
        let payload = decode_segment(token.split('.').nth(1).unwrap());

        assert_eq!(payload["sub"], "7");
        let exp = payload["exp"].as_i64().expect("exp is not an integer");
        assert!(exp >= before + 30 * 60);
        assert!(exp <= after + 30 * 60);
        assert_eq!(payload.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::minutes(30));

        let too_late = issuer.create_access_token("user123", Some(Duration::MAX));
        assert_eq!(too_late, Err(TokenError::ExpirationOutOfRange));

        let too_early = issuer.create_access_token("user123", Some(Duration::MIN));
        assert_eq!(too_early, Err(TokenError::ExpirationOutOfRange));
    }

    #[test]
    fn test_out_of_range_default_lifetime_is_an_error() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::MAX);

        let result = issuer.create_access_token("user123", None);
        assert_eq!(result, Err(TokenError::ExpirationOutOfRange));
    }

    #[test]
    fn test_payload_uses_override() {
        let issuer = TokenIssuer::new(&test_keys(), Duration::minutes(30));
        let before = Utc::now().timestamp();

        let token = issuer
            .create_access_token("user123", Some(Duration::seconds(90)))
            .expect("Failed to create token");
        let after = Utc::now().timestamp();
        let payload = decode_segment(token.split('.').nth(1).unwrap());

        let exp = payload["exp"].as_i64().expect("exp is not an integer");
        assert!(exp >= before + 90);
        assert!(exp <= after + 90);
    }
}
