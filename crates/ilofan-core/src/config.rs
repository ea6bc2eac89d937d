// ── Controller configuration ──
//
// Connection policy the facade is built with. Credentials are deliberately
// not part of it: they are pulled through a `CredentialResolver` at the
// start of every operation, so a rotated password takes effect on the
// next call without rebuilding the controller.

use ilofan_api::{Credentials, SessionOptions, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Transport and session settings shared by every operation.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// TLS policy and request timeout for Redfish.
    pub transport: TransportConfig,
    /// Port, key exchange and timeout for the command session.
    pub session: SessionOptions,
    /// Override the Redfish base URL. `None` means `https://{host}/`.
    pub redfish_url: Option<Url>,
}

impl ControllerConfig {
    /// Apply one timeout to both channels.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.transport.timeout = timeout;
        self.session.timeout = timeout;
        self
    }
}

/// Supplies controller credentials on demand.
///
/// Implementations must report every missing setting in one
/// [`CoreError::MissingConfig`], not just the first.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self) -> Result<Credentials, CoreError>;
}

impl<F> CredentialResolver for F
where
    F: Fn() -> Result<Credentials, CoreError> + Send + Sync,
{
    fn resolve(&self) -> Result<Credentials, CoreError> {
        self()
    }
}
