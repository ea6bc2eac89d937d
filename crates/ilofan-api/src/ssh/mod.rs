// SSH command channel
//
// One authenticated session per logical operation. `with_session` owns the
// session for the duration of the caller's closure and closes it on every
// exit path before returning.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::error::Error;

mod client;
mod options;

pub use client::{SshConnector, SshSession};
pub use options::{KexAlgorithm, SessionOptions};

/// Result of one command round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the controller closed the channel without reporting one.
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    /// A missing exit status counts as success: iLO's CLI often omits it.
    pub fn is_success(&self) -> bool {
        matches!(self.exit_status, None | Some(0))
    }

    /// Combined output for error reporting, trimmed.
    pub fn text(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_owned(),
            (true, false) => stderr.to_owned(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// A live, exclusively owned command session.
pub trait CommandSession: Send {
    /// Run one command line and wait for its output and exit status.
    ///
    /// A non-zero exit status is returned as data, not as an error.
    fn exec(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<CommandOutput, Error>> + Send;

    /// Tear the session down.
    fn close(self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Opens command sessions against a controller.
pub trait SessionConnector: Send + Sync {
    type Session: CommandSession;

    fn connect(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Session, Error>> + Send;
}

/// Open one session, run `op` with it, and close it on every exit path.
///
/// - connect failure: returned as-is, `op` never runs
/// - `op` error: session closed, then the error is returned
/// - `op` panic: session closed, then the panic resumes
///
/// A close failure after `op` succeeded is logged, not returned: the
/// commands have already been applied.
pub async fn with_session<C, F, T, E>(
    connector: &C,
    credentials: &Credentials,
    op: F,
) -> Result<T, E>
where
    C: SessionConnector,
    F: AsyncFnOnce(&mut C::Session) -> Result<T, E>,
    E: From<Error>,
{
    let mut session = connector.connect(credentials).await?;
    debug!(host = credentials.hostname(), "command session open");

    let outcome = AssertUnwindSafe(op(&mut session)).catch_unwind().await;

    let closed = session.close().await;
    debug!(host = credentials.hostname(), "command session closed");

    match (outcome, closed) {
        (Err(panic), _) => std::panic::resume_unwind(panic),
        (Ok(result), Ok(())) => result,
        (Ok(result), Err(close_err)) => {
            warn!(error = %close_err, "failed to close command session cleanly");
            result
        }
    }
}
