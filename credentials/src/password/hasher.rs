use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Prefixes of bcrypt hashes written by the earlier bcrypt-based deployment.
const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

/// Argon2 version every new hash is written with.
const ARGON2_VERSION: Version = Version::V0x13;

/// Password hashing implementation.
///
/// New hashes are Argon2id PHC strings, which embed algorithm, cost
/// parameters and salt. Legacy bcrypt hashes are still accepted for
/// verification.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance using the argon2 crate's default Argon2id cost
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Create a hasher with explicit Argon2id cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are outside what Argon2 accepts
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::HashingFailed(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, ARGON2_VERSION, params),
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored hash, Argon2 PHC string or legacy bcrypt
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash string cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()));
        }

        let parsed_hash = parse_phc(hash)?;

        // Argon2 verifies with the parameters embedded in the hash, not ours.
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    /// Whether a stored hash should be replaced by a fresh one.
    ///
    /// True for legacy bcrypt hashes and for Argon2 hashes produced with a
    /// different variant, version, cost or output length than this hasher's. Callers re-hash after a
    /// successful verification, when the plaintext is at hand.
    ///
    /// # Errors
    /// * `MalformedHash` - Hash string cannot be parsed
    pub fn needs_rehash(&self, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt(hash) {
            return Ok(true);
        }

        let parsed_hash = parse_phc(hash)?;

        if parsed_hash.algorithm != Algorithm::Argon2id.ident() {
            return Ok(true);
        }

        // A PHC string without `v=` is version 0x10.
        if parsed_hash.version != Some(ARGON2_VERSION as u32) {
            return Ok(true);
        }

        let stored = Params::try_from(&parsed_hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        let current = self.argon2.params();

        let stored_output_len = parsed_hash.hash.map(|output| output.len());
        let current_output_len = current.output_len().unwrap_or(Params::DEFAULT_OUTPUT_LEN);

        Ok(stored.m_cost() != current.m_cost()
            || stored.t_cost() != current.t_cost()
            || stored.p_cost() != current.p_cost()
            || stored_output_len != Some(current_output_len))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

fn parse_phc(hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::MalformedHash(format!("Invalid password hash: {}", e)))?;

    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(PasswordError::MalformedHash(
            "Password hash has no salt or digest".to_string(),
        ));
    }

    Ok(parsed_hash)
}
