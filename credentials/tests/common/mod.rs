#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use chrono::Duration;
use credentials::KeyPair;
use credentials::PasswordHasher;
use credentials::Security;
use credentials::SecurityConfig;

/// Path to a PEM file in tests/fixtures
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Configuration pointing at the primary fixture key pair
pub fn test_config() -> SecurityConfig {
    SecurityConfig::new(fixture("private.pem"), fixture("public.pem"), 60)
}

/// Security built from the primary key pair, with a cheap password hasher
pub fn test_security() -> Security {
    let keys = KeyPair::load(&test_config()).expect("Failed to load test keys");
    Security::new(keys, Duration::minutes(60), fast_hasher())
}

/// Security built from a key pair unrelated to the primary one
pub fn other_security() -> Security {
    let config = SecurityConfig::new(
        fixture("other_private.pem"),
        fixture("other_public.pem"),
        60,
    );
    let keys = KeyPair::load(&config).expect("Failed to load other test keys");
    Security::new(keys, Duration::minutes(60), fast_hasher())
}

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Failed to build hasher")
}
