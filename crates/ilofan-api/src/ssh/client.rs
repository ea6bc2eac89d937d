// russh-backed command session.
//
// Each `exec` opens a fresh exec channel on the shared transport, collects
// stdout/stderr until the controller closes the channel, and reports the
// exit status if one was sent.

use std::sync::Arc;
use std::time::Duration;

use russh::keys::{HashAlg, PublicKey};
use russh::{ChannelMsg, Disconnect, client};
use secrecy::ExposeSecret;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::options::SessionOptions;
use super::{CommandOutput, CommandSession, SessionConnector};
use crate::auth::Credentials;
use crate::error::Error;

/// Host-key policy for management controllers: accept and log.
///
/// iLO generates a self-signed host key on first boot, so there is nothing
/// to verify it against. Mirrors the relaxed TLS policy of the Redfish side.
struct ControllerHandler {
    host: String,
}

impl client::Handler for ControllerHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            host = %self.host,
            fingerprint = %server_public_key.fingerprint(HashAlg::Sha256),
            "accepting controller host key"
        );
        Ok(true)
    }
}

/// Opens password-authenticated SSH sessions with explicit key exchange.
#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    options: SessionOptions,
}

impl SshConnector {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }
}

impl SessionConnector for SshConnector {
    type Session = SshSession;

    async fn connect(&self, credentials: &Credentials) -> Result<SshSession, Error> {
        let host = credentials.hostname().to_owned();
        let timeout_secs = self.options.timeout_secs();
        let config = Arc::new(self.options.client_config());
        let handler = ControllerHandler { host: host.clone() };

        debug!(
            host = %host,
            port = self.options.port,
            kex = ?self.options.kex,
            "opening command session"
        );

        let connecting = client::connect(config, (host.as_str(), self.options.port), handler);
        let mut handle = timeout(self.options.timeout, connecting)
            .await
            .map_err(|_| Error::Timeout { timeout_secs })?
            .map_err(|e| Error::Connect {
                host: host.clone(),
                reason: e.to_string(),
            })?;

        let auth = timeout(
            self.options.timeout,
            handle.authenticate_password(
                credentials.username.as_str(),
                credentials.password.expose_secret(),
            ),
        )
        .await
        .map_err(|_| Error::Timeout { timeout_secs })?
        .map_err(|e| Error::Connect {
            host: host.clone(),
            reason: e.to_string(),
        })?;

        if !auth.success() {
            return Err(Error::Authentication {
                username: credentials.username.clone(),
            });
        }

        Ok(SshSession {
            handle,
            timeout: self.options.timeout,
        })
    }
}

/// An authenticated session. Dropping it drops the transport.
pub struct SshSession {
    handle: client::Handle<ControllerHandler>,
    timeout: Duration,
}

impl SshSession {
    async fn run(&mut self, command: &str) -> Result<CommandOutput, Error> {
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(&data[..]),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                    stderr.extend_from_slice(&data[..]);
                }
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        let output = CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_status,
        };
        trace!(?output, "command output");
        Ok(output)
    }
}

impl CommandSession for SshSession {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, Error> {
        debug!(command, "exec");
        let timeout_secs = self.timeout.as_secs();
        timeout(self.timeout, self.run(command))
            .await
            .map_err(|_| Error::Timeout { timeout_secs })?
    }

    async fn close(self) -> Result<(), Error> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await?;
        Ok(())
    }
}
