use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Access token claims.
///
/// Issued tokens carry only `sub` and `exp`. Tokens minted elsewhere with the
/// same key may carry more; those land in `extra` instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Any other claims present in the token
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(subject: impl ToString, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            extra: Map::new(),
        }
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is only live while `exp` is strictly in the future.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
