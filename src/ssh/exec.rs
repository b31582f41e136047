//! Remote command execution.
//!
//! One exec channel, both output streams drained from the same message
//! loop so neither side can fill its buffer and stall the other.

use russh::client::Handle;
use russh::ChannelMsg;

use crate::error::Result;
use crate::ssh::client::ClientHandler;

/// Captured output of a remote command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output, verbatim.
    pub stdout: String,

    /// Standard error, verbatim.
    pub stderr: String,
}

impl CommandOutput {
    /// The remote command's own failure is data, not a transport fault:
    /// anything on stderr (beyond whitespace) counts as failure.
    pub fn success(&self) -> bool {
        self.stderr.trim().is_empty()
    }
}

/// Run `command` on the remote host and collect stdout/stderr to completion.
pub async fn exec_command(session: &Handle<ClientHandler>, command: &str) -> Result<CommandOutput> {
    let mut channel = session.channel_open_session().await?;

    channel.exec(true, command.as_bytes()).await?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => {
                stdout.extend_from_slice(&data);
            }
            Some(ChannelMsg::ExtendedData { data, ext }) => {
                if ext == 1 {
                    stderr.extend_from_slice(&data);
                }
            }
            Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                break;
            }
            _ => {}
        }
    }

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
    })
}
