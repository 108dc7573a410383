use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while bringing the signing keys up at startup.
///
/// Neither variant is recoverable: the process must not serve requests
/// without both keys.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("Failed to read key file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid RSA {key} key: {reason}")]
    InvalidKey { key: &'static str, reason: String },
}
