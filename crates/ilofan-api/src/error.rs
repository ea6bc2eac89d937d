use thiserror::Error;

/// Top-level error type for the `ilofan-api` crate.
///
/// Covers both controller surfaces: the Redfish HTTPS API and the SSH
/// command channel. `ilofan-core` maps these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Redfish ─────────────────────────────────────────────────────
    /// The controller answered with a non-success HTTP status.
    #[error("Redfish request failed with HTTP {status}")]
    Http { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request or command round trip timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── SSH ─────────────────────────────────────────────────────────
    /// TCP connect or SSH handshake failed.
    #[error("SSH connection to {host} failed: {reason}")]
    Connect { host: String, reason: String },

    /// The controller rejected the configured username/password.
    #[error("SSH authentication rejected for user '{username}'")]
    Authentication { username: String },

    /// Protocol error on an established session.
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),
}

impl Error {
    /// Returns `true` if this is a timeout from either surface.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}
