// ── Core error types ──
//
// User-facing errors from ilofan-core. Callers see which operation failed
// and how far it got, never raw reqwest/russh errors. The
// `From<ilofan_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

use crate::speed::Violation;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    /// One or more required settings are absent or empty.
    #[error("Missing required configuration: {}", .names.join(", "))]
    MissingConfig { names: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    /// Network, TLS, or SSH handshake failure.
    #[error("Cannot connect to management controller: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller did not respond within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Remote errors ────────────────────────────────────────────────
    /// Telemetry request answered with a non-success HTTP status.
    #[error("Controller returned HTTP {status} for thermal telemetry")]
    Remote { status: u16 },

    /// A fan command ran but the controller reported failure.
    ///
    /// `index` is the fan position being written; `None` for global
    /// commands. For per-fan writes, fans before `index` were already
    /// changed.
    #[error("{}", describe_command_failure(*.index, *.exit_status, .output))]
    RemoteCommand {
        index: Option<usize>,
        exit_status: Option<u32>,
        output: String,
    },

    #[error("Unexpected response from controller: {message}")]
    InvalidResponse { message: String },

    // ── Input errors ─────────────────────────────────────────────────
    /// Caller input out of contract. Lists every violation.
    #[error("Invalid fan speed request: {}", join_violations(.violations))]
    Validation { violations: Vec<Violation> },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_command_failure(
    index: Option<usize>,
    exit_status: Option<u32>,
    output: &str,
) -> String {
    let target = index.map_or_else(|| "global fan command".to_owned(), |i| format!("fan {i}"));
    let status = exit_status.map_or_else(
        || "no exit status".to_owned(),
        |s| format!("exit status {s}"),
    );
    if output.is_empty() {
        format!("Controller rejected {target} ({status})")
    } else {
        format!("Controller rejected {target} ({status}): {output}")
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ilofan_api::Error> for CoreError {
    fn from(err: ilofan_api::Error) -> Self {
        match err {
            ilofan_api::Error::Http { status } => CoreError::Remote { status },
            ilofan_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                }
            }
            ilofan_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid controller URL: {e}"),
            },
            ilofan_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ilofan_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            ilofan_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            ilofan_api::Error::Connect { host, reason } => CoreError::ConnectionFailed {
                reason: format!("{host}: {reason}"),
            },
            ilofan_api::Error::Authentication { username } => CoreError::AuthenticationFailed {
                message: format!("controller rejected credentials for '{username}'"),
            },
            ilofan_api::Error::Ssh(e) => CoreError::ConnectionFailed {
                reason: format!("SSH error: {e}"),
            },
        }
    }
}
