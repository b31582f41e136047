//! Interactive session bridging.
//!
//! Puts the local terminal in raw mode and relays bytes between it and the
//! remote shell channel until either side reaches EOF. Raw mode is held by
//! an RAII guard so the terminal is restored on every exit path, including
//! errors and interrupts.

use russh::client::Handle;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{CourirError, Result};
use crate::ssh::client::ClientHandler;

/// Printed to the local terminal when the remote side closes the channel.
const EOF_MARKER: &[u8] = b"\r\n*** EOF\r\n";

/// Start an interactive shell on an established session.
pub async fn interactive_shell(session: &Handle<ClientHandler>) -> Result<()> {
    let mut channel = session.channel_open_session().await?;

    let (width, height) = terminal_size();

    channel
        .request_pty(true, "xterm-256color", width as u32, height as u32, 0, 0, &[])
        .await?;

    channel.request_shell(true).await?;

    let _raw = RawModeGuard::enter()?;

    relay(
        tokio::io::stdin(),
        tokio::io::stdout(),
        channel.into_stream(),
    )
    .await
}

/// Relay bytes between a local input/output pair and the remote channel.
///
/// Both directions are observed from one `select!` loop, so neither can
/// starve the other. Remote EOF writes the visible marker before returning;
/// local EOF half-closes the remote side and returns quietly.
pub async fn relay<L, O, R>(mut local_in: L, mut local_out: O, mut remote: R) -> Result<()>
where
    L: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
    R: AsyncRead + AsyncWrite + Unpin,
{
    let mut local_buf = [0u8; 1024];
    let mut remote_buf = [0u8; 8192];

    loop {
        tokio::select! {
            read = local_in.read(&mut local_buf) => {
                match read {
                    Ok(0) => {
                        remote.shutdown().await.ok();
                        break;
                    }
                    Ok(n) => {
                        remote.write_all(&local_buf[..n]).await?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            read = remote.read(&mut remote_buf) => {
                match read {
                    Ok(0) => {
                        local_out.write_all(EOF_MARKER).await?;
                        local_out.flush().await?;
                        break;
                    }
                    Ok(n) => {
                        local_out.write_all(&remote_buf[..n]).await?;
                        local_out.flush().await?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

fn terminal_size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((80, 24))
}

/// RAII guard over the local terminal's raw mode.
///
/// Restoration happens in `Drop`, which covers success, error returns, and
/// unwinds alike; a terminal left raw after exit corrupts the user's shell.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()
            .map_err(|e| CourirError::Ssh(format!("failed to enable raw mode: {}", e)))?;

        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[tokio::test]
    async fn test_remote_bytes_reach_local_output_with_eof_marker() {
        let (mut remote_feed, remote) = tokio::io::duplex(1024);
        // Held open so the local side never reports EOF during the test.
        let (_local_feed, local_in) = tokio::io::duplex(16);
        let (local_out, mut local_echo) = tokio::io::duplex(1024);

        let bridge = tokio::spawn(relay(local_in, local_out, remote));

        remote_feed.write_all(b"welcome to the machine").await.unwrap();
        remote_feed.shutdown().await.unwrap();

        bridge.await.unwrap().unwrap();

        let mut seen = Vec::new();
        local_echo.read_to_end(&mut seen).await.unwrap();

        let mut expected = b"welcome to the machine".to_vec();
        expected.extend_from_slice(EOF_MARKER);
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_local_bytes_reach_remote() {
        let (mut local_feed, local_in) = tokio::io::duplex(1024);
        let (local_out, _local_echo) = tokio::io::duplex(1024);
        let (remote, mut remote_echo) = tokio::io::duplex(1024);

        let bridge = tokio::spawn(relay(local_in, local_out, remote));

        local_feed.write_all(b"ls -la\n").await.unwrap();
        local_feed.shutdown().await.unwrap();

        bridge.await.unwrap().unwrap();

        let mut seen = Vec::new();
        remote_echo.read_to_end(&mut seen).await.unwrap();
        assert_eq!(seen, b"ls -la\n");
    }

    #[tokio::test]
    async fn test_local_eof_ends_loop_without_marker() {
        let (local_feed, local_in) = tokio::io::duplex(16);
        let (local_out, mut local_echo) = tokio::io::duplex(1024);
        let (remote, _remote_keep) = tokio::io::duplex(1024);

        drop(local_feed);

        relay(local_in, local_out, remote).await.unwrap();

        let mut seen = Vec::new();
        local_echo.read_to_end(&mut seen).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_remote_error_propagates_after_partial_output() {
        let remote = tokio_test::io::Builder::new()
            .read(b"partial")
            .read_error(std::io::Error::new(ErrorKind::ConnectionReset, "reset"))
            .build();
        let (_local_feed, local_in) = tokio::io::duplex(16);
        let (local_out, mut local_echo) = tokio::io::duplex(1024);

        let result = relay(local_in, local_out, remote).await;
        assert!(result.is_err());

        let mut seen = Vec::new();
        local_echo.read_to_end(&mut seen).await.unwrap();
        assert_eq!(seen, b"partial");
    }
}
