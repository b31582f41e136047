//! Candidate-port walking.
//!
//! The SSH daemon may listen on any of the configured ports, so attempts run
//! strictly in config order and stop at the first established session.
//! Refusals and timeouts mean "try the next port"; anything else (bad key,
//! protocol failure) is a real error and propagates immediately.

use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CourirError, Result};

/// One connection attempt against a single host:port.
///
/// Abstracted so the port walk is testable without a live SSH server.
#[async_trait]
pub trait Dial {
    type Conn: Send;

    async fn dial(&self, host: &str, port: u16) -> Result<Self::Conn>;
}

/// Walk `ports` in order and return the first established connection
/// together with the port that won.
pub async fn negotiate<D: Dial + Sync>(
    dialer: &D,
    host: &str,
    ports: &[u16],
    timeout: Duration,
) -> Result<(D::Conn, u16)> {
    if ports.is_empty() {
        return Err(CourirError::Config(
            "candidate port list is empty".to_string(),
        ));
    }

    for &port in ports {
        tracing::debug!("attempting {}:{}", host, port);

        match tokio::time::timeout(timeout, dialer.dial(host, port)).await {
            Ok(Ok(conn)) => {
                tracing::debug!("connected on port {}", port);
                return Ok((conn, port));
            }
            Ok(Err(e)) if is_retryable(&e) => {
                tracing::debug!("port {} unavailable: {}", port, e);
            }
            Ok(Err(e)) => return Err(e),
            Err(_elapsed) => {
                tracing::debug!("port {} timed out after {:?}", port, timeout);
            }
        }
    }

    Err(CourirError::ConnectionFailed {
        host: host.to_string(),
        ports: ports.to_vec(),
    })
}

/// Only refusal and timeout suggest the service listens elsewhere.
fn is_retryable(err: &CourirError) -> bool {
    let kind = match err {
        CourirError::Io(e) => Some(e.kind()),
        CourirError::SshProtocol(russh::Error::IO(e)) => Some(e.kind()),
        _ => None,
    };

    matches!(kind, Some(ErrorKind::ConnectionRefused | ErrorKind::TimedOut))
}
