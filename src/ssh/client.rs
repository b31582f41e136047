//! SSH client implementation using russh.
//!
//! Connection establishment, publickey authentication, and the handle the
//! session modes run on.

use std::net::ToSocketAddrs;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh_keys::PrivateKey;

use crate::error::{CourirError, Result};
use crate::ssh::config::SshConfig;
use crate::ssh::exec::CommandOutput;
use crate::ssh::keys;
use crate::ssh::negotiate::{negotiate, Dial};

/// SSH client wrapper over russh.
pub struct SshClient {
    session: Handle<ClientHandler>,
    host: String,
    port: u16,
}

impl SshClient {
    /// Connect to `host`, walking `ports` in order until one accepts the
    /// handshake and authenticates the configured key.
    pub async fn connect(host: &str, ports: &[u16], config: &SshConfig) -> Result<Self> {
        let key = keys::load_key(&config.key_path)?;

        tracing::debug!(
            "connecting to {} with ports {:?} and user {}",
            host,
            ports,
            config.user
        );

        let dialer = RusshDial {
            user: &config.user,
            key,
        };

        let (session, port) = negotiate(&dialer, host, ports, config.connect_timeout).await?;

        Ok(Self {
            session,
            host: host.to_string(),
            port,
        })
    }

    pub fn endpoint(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// Execute a command on the remote host (non-interactive).
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        crate::ssh::exec::exec_command(&self.session, command).await
    }

    /// Start an interactive shell session with PTY.
    pub async fn shell(&self) -> Result<()> {
        crate::ssh::bridge::interactive_shell(&self.session).await
    }
}

/// Production dialer: TCP connect, SSH handshake, publickey auth.
///
/// Auth failures come back as [`CourirError::Ssh`], which the negotiator
/// treats as fatal rather than a reason to try another port.
struct RusshDial<'a> {
    user: &'a str,
    key: Arc<PrivateKey>,
}

#[async_trait]
impl Dial for RusshDial<'_> {
    type Conn = Handle<ClientHandler>;

    async fn dial(&self, host: &str, port: u16) -> Result<Handle<ClientHandler>> {
        let russh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            keepalive_interval: Some(std::time::Duration::from_secs(15)),
            keepalive_max: 4,
            ..Default::default()
        });

        let addr = format!("{}:{}", host, port)
            .to_socket_addrs()
            .map_err(CourirError::Io)?
            .next()
            .ok_or_else(|| CourirError::Ssh(format!("no address found for {}", host)))?;

        let mut session = client::connect(russh_config, addr, ClientHandler).await?;

        let authenticated = session
            .authenticate_publickey(self.user, self.key.clone())
            .await?;

        if !authenticated {
            return Err(CourirError::Ssh(format!(
                "server rejected the key for user {}",
                self.user
            )));
        }

        Ok(session)
    }
}

/// Client handler for russh connection callbacks.
///
/// Unknown host keys are trusted without confirmation, the equivalent of
/// OpenSSH `StrictHostKeyChecking=no`. Deliberate low-friction choice for
/// short-lived cloud instances whose keys change on every rebuild; the
/// trade-off is no protection against a man-in-the-middle on first contact.
pub struct ClientHandler;

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = CourirError;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
