//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ilofan_config::ConfigError;
use ilofan_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REMOTE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Missing required configuration: {names}")]
    #[diagnostic(
        code(ilofan::missing_config),
        help(
            "Export the variables listed above, or run: ilofan config init\n\
             Empty values count as missing."
        )
    )]
    MissingConfig { names: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(ilofan::config),
        help("Check the file reported by: ilofan config path")
    )]
    Config { message: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(ilofan::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to management controller: {reason}")]
    #[diagnostic(
        code(ilofan::connection_failed),
        help(
            "Check that ILO_HOST is reachable on HTTPS and SSH.\n\
             If the SSH handshake fails on newer firmware, try --kex curve25519-sha256."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ilofan::auth_failed),
        help("Verify ILO_USERNAME and ILO_PASSWORD.")
    )]
    AuthFailed { message: String },

    #[error("Controller did not respond within {seconds}s")]
    #[diagnostic(
        code(ilofan::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Remote ───────────────────────────────────────────────────────

    #[error("Controller returned HTTP {status} for thermal telemetry")]
    #[diagnostic(code(ilofan::remote_status))]
    RemoteStatus {
        status: u16,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(ilofan::command_rejected))]
    CommandRejected {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unexpected response from controller: {message}")]
    #[diagnostic(code(ilofan::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(ilofan::validation),
        help("Speeds are whole percentages from 10 to 100, one per fan.")
    )]
    Validation { message: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ilofan::json), help("Expected an object like {{\"fans\": [40, 40]}}."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingConfig { .. } | Self::Config { .. } | Self::ConfigExists { .. } => {
                exit_code::CONFIG
            }
            Self::ConnectionFailed { .. } | Self::AuthFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::RemoteStatus { .. }
            | Self::CommandRejected { .. }
            | Self::InvalidResponse { .. } => exit_code::REMOTE,
            Self::Validation { .. } | Self::Json(_) => exit_code::USAGE,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingConfig { names } => CliError::MissingConfig {
                names: names.join(", "),
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Remote { status } => CliError::RemoteStatus {
                status,
                help: matches!(status, 401 | 403)
                    .then(|| "Verify ILO_USERNAME and ILO_PASSWORD.".to_owned()),
            },

            CoreError::RemoteCommand { index, .. } => CliError::CommandRejected {
                message: err.to_string(),
                help: Some(command_rejected_help(index)),
            },

            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },

            err @ CoreError::Validation { .. } => CliError::Validation {
                message: err.to_string(),
            },
        }
    }
}

fn command_rejected_help(index: Option<usize>) -> String {
    match index {
        None => "Fan control was not handed back to the controller. Retry: ilofan fans unlock"
            .to_owned(),
        Some(0) => "No fan speed was changed. Check current speeds with: ilofan fans list"
            .to_owned(),
        Some(i) => format!(
            "Fans before fan {i} already run at their new speed. Check with: ilofan fans list"
        ),
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config {
            message: err.to_string(),
        }
    }
}
