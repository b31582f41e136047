use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourirError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Name {0} not found")]
    InstanceNotFound(String),

    #[error("You have to choose a correct instance between 0 and {max}, not {chosen}")]
    InvalidSelection { chosen: usize, max: usize },

    #[error("private key {} nor {} found", .bare.display(), .pem.display())]
    KeyNotFound { bare: PathBuf, pem: PathBuf },

    #[error("could not connect to {host}, ports tried: {ports:?}")]
    ConnectionFailed { host: String, ports: Vec<u16> },

    #[error("SSH connection error: {0}")]
    Ssh(String),

    #[error("SSH protocol error: {0}")]
    SshProtocol(#[from] russh::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, CourirError>;
