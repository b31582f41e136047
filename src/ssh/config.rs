//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Per-attempt handshake budget before moving to the next candidate port.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// SSH connection configuration.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// SSH username.
    pub user: String,

    /// Path to the private key file.
    pub key_path: PathBuf,

    /// How long a single port attempt may take.
    pub connect_timeout: Duration,
}

impl SshConfig {
    pub fn new(user: impl Into<String>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            key_path: key_path.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
