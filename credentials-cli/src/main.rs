use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use credentials::PasswordHasher;
use credentials::Security;
use credentials::SecurityConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Operator tool for access tokens and password hashes
#[derive(Parser)]
#[command(name = "credentialsctl")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hash a password for storage
    HashPassword {
        password: String,
    },

    /// Check a password against a stored hash (exit code 1 on mismatch)
    VerifyPassword {
        password: String,
        hash: String,
    },

    /// Issue a signed access token for a subject
    IssueToken {
        subject: String,

        /// Lifetime override; defaults to ACCESS_TOKEN_EXPIRE_MINUTES
        #[arg(long, allow_negative_numbers = true)]
        expires_in_minutes: Option<i64>,
    },

    /// Verify an access token and print its claims
    DecodeToken {
        token: String,
    },
}

fn main() -> Result<ExitCode, anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credentials=info,credentialsctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::HashPassword { password } => {
            let hash = PasswordHasher::new().hash(&password)?;
            println!("{}", hash);
        }
        Command::VerifyPassword { password, hash } => {
            let hasher = PasswordHasher::new();
            let is_valid = hasher.verify(&password, &hash)?;
            println!("{}", is_valid);

            if !is_valid {
                return Ok(ExitCode::FAILURE);
            }

            if hasher.needs_rehash(&hash)? {
                tracing::warn!("Stored hash uses outdated parameters and should be replaced");
            }
        }
        Command::IssueToken {
            subject,
            expires_in_minutes,
        } => {
            let expires_in = expires_in_minutes
                .map(|minutes| {
                    chrono::Duration::try_minutes(minutes)
                        .with_context(|| format!("Lifetime of {} minutes is out of range", minutes))
                })
                .transpose()?;

            let security = load_security()?;
            let token = security.create_access_token(&subject, expires_in)?;
            println!("{}", token);
        }
        Command::DecodeToken { token } => {
            let security = load_security()?;
            let claims = security.decode_access_token(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_security() -> Result<Security, anyhow::Error> {
    let config = SecurityConfig::load().context("Failed to load configuration")?;

    tracing::debug!(
        private_key_path = %config.private_key_path.display(),
        public_key_path = %config.public_key_path.display(),
        access_token_expire_minutes = config.access_token_expire_minutes,
        "Configuration loaded"
    );

    let security = Security::from_config(&config).context("Failed to initialize credentials")?;

    Ok(security)
}
