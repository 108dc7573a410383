//! Credential utilities
//!
//! Issues and validates RS256 access tokens and hashes user passwords:
//! - Key loading (RSA PEM key pair, read once at startup)
//! - Password hashing (Argon2id, legacy bcrypt verification)
//! - Access token issuance and verification
//!
//! Everything is immutable after construction, so a single [`Security`]
//! can be shared across threads.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```no_run
//! use credentials::{Security, SecurityConfig};
//!
//! let config = SecurityConfig::load().unwrap();
//! let security = Security::from_config(&config).unwrap();
//!
//! let token = security.create_access_token(42, None).unwrap();
//! let claims = security.decode_access_token(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod config;
pub mod jwt;
pub mod keys;
pub mod password;
pub mod security;

// Re-export commonly used items
pub use crate::config::SecurityConfig;
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use keys::KeyLoadError;
pub use keys::KeyPair;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use security::LoginError;
pub use security::StartupError;
pub use security::Security;
