//! Pure Rust SSH stack for courir.
//!
//! No external ssh binaries; everything runs over russh.
//!
//! ## Modules
//!
//! - [`keys`] - private key resolution (`name`, then `name.pem`) and parsing
//! - [`negotiate`] - candidate-port walking with bounded attempts
//! - [`client`] - connection management and authentication
//! - [`exec`] - remote command execution with full stream capture
//! - [`bridge`] - raw-terminal interactive relay

pub mod bridge;
pub mod client;
pub mod config;
pub mod exec;
pub mod keys;
pub mod negotiate;

pub use client::SshClient;
pub use config::SshConfig;
pub use exec::CommandOutput;
