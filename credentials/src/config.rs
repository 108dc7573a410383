use std::env;
use std::path::PathBuf;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Default lifetime of an access token when the caller does not override it.
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60;

/// Environment variables read as configuration; everything else is ignored.
const ENVIRONMENT_KEYS: [&str; 3] = [
    "PRIVATE_KEY_PATH",
    "PUBLIC_KEY_PATH",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
];

/// Settings needed to bring the credential layer up.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// PEM file holding the RSA private key used for signing
    pub private_key_path: PathBuf,

    /// PEM file holding the matching RSA public key used for verification
    pub public_key_path: PathBuf,

    /// Default access token lifetime in minutes
    pub access_token_expire_minutes: i64,
}

impl SecurityConfig {
    pub fn new(
        private_key_path: impl Into<PathBuf>,
        public_key_path: impl Into<PathBuf>,
        access_token_expire_minutes: i64,
    ) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
            access_token_expire_minutes,
        }
    }

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PRIVATE_KEY_PATH, PUBLIC_KEY_PATH, ACCESS_TOKEN_EXPIRE_MINUTES)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in default token lifetime
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // PRIVATE_KEY_PATH=... overrides private_key_path
            .add_source(environment(env::vars()));

        Self::from_builder(builder)
    }

    /// Access token lifetime applied when no override is given.
    ///
    /// # Errors
    /// * `Message` - The configured minutes do not fit in a duration
    pub fn default_token_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.access_token_expire_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "access_token_expire_minutes is out of range: {}",
                self.access_token_expire_minutes
            ))
        })
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let configuration = builder
            .set_default(
                "access_token_expire_minutes",
                DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            )?
            .build()?;

        let config: SecurityConfig = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check the values regardless of where they came from.
    ///
    /// # Errors
    /// * `Message` - A key path is empty or the lifetime is not a positive, representable duration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.private_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "private_key_path must not be empty".to_string(),
            ));
        }

        if self.public_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "public_key_path must not be empty".to_string(),
            ));
        }

        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "access_token_expire_minutes must be positive, got {}",
                self.access_token_expire_minutes
            )));
        }

        self.default_token_lifetime()?;

        Ok(())
    }
}

/// Environment source limited to the configuration keys, so unrelated
/// variables never reach deserialization.
fn environment(vars: impl Iterator<Item = (String, String)>) -> Environment {
    let source: config::Map<String, String> = vars
        .filter(|(key, _)| ENVIRONMENT_KEYS.contains(&key.as_str()))
        .collect();

    Environment::default().source(Some(source))
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<SecurityConfig, ConfigError> {
        let builder = ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml));
        SecurityConfig::from_builder(builder)
    }

    #[test]
    fn test_load_with_default_lifetime() {
        let config = from_toml(
            r#"
            private_key_path = "keys/private.pem"
            public_key_path = "keys/public.pem"
            "#,
        )
        .expect("Failed to load config");

        assert_eq!(config.private_key_path, PathBuf::from("keys/private.pem"));
        assert_eq!(config.public_key_path, PathBuf::from("keys/public.pem"));
        assert_eq!(
            config.access_token_expire_minutes,
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
        );
        assert_eq!(
            config.default_token_lifetime().unwrap(),
            chrono::Duration::minutes(60)
        );
    }

    #[test]
    fn test_load_with_explicit_lifetime() {
        let config = from_toml(
            r#"
            private_key_path = "keys/private.pem"
            public_key_path = "keys/public.pem"
            access_token_expire_minutes = 15
            "#,
        )
        .expect("Failed to load config");

        assert_eq!(config.access_token_expire_minutes, 15);
    }

    #[test]
    fn test_missing_key_path_is_rejected() {
        let result = from_toml(r#"public_key_path = "keys/public.pem""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_key_path_is_rejected() {
        let result = from_toml(
            r#"
            private_key_path = ""
            public_key_path = "keys/public.pem"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_non_positive_lifetime_is_rejected() {
        let result = from_toml(
            r#"
            private_key_path = "keys/private.pem"
            public_key_path = "keys/public.pem"
            access_token_expire_minutes = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_oversized_lifetime_is_rejected() {
        let result = from_toml(&format!(
            r#"
            private_key_path = "keys/private.pem"
            public_key_path = "keys/public.pem"
            access_token_expire_minutes = {}
            "#,
            i64::MAX
        ));
        assert!(matches!(result, Err(ConfigError::Message(_))));

        let config = SecurityConfig::new("keys/private.pem", "keys/public.pem", i64::MAX);
        assert!(config.default_token_lifetime().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_reads_only_known_keys() {
        let vars = vec![
            ("PRIVATE_KEY_PATH".to_string(), "keys/private.pem".to_string()),
            ("PUBLIC_KEY_PATH".to_string(), "1234".to_string()),
            ("ACCESS_TOKEN_EXPIRE_MINUTES".to_string(), "15".to_string()),
            ("PRIVATE_KEY_PATH_BACKUP".to_string(), "42".to_string()),
            ("SHLVL".to_string(), "1".to_string()),
        ];
        let builder = ConfigBuilder::builder().add_source(environment(vars.into_iter()));

        let config = SecurityConfig::from_builder(builder).expect("Failed to load config");

        assert_eq!(config.private_key_path, PathBuf::from("keys/private.pem"));
        assert_eq!(config.public_key_path, PathBuf::from("1234"));
        assert_eq!(config.access_token_expire_minutes, 15);
    }
}
