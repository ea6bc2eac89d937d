// ilofan-api: Async Rust client for iLO management controllers (Redfish + SSH)

pub mod auth;
pub mod error;
pub mod redfish;
pub mod ssh;
pub mod transport;

pub use auth::Credentials;
pub use error::Error;
pub use redfish::RedfishClient;
pub use ssh::{
    CommandOutput, CommandSession, KexAlgorithm, SessionConnector, SessionOptions, SshConnector,
    SshSession, with_session,
};
pub use transport::{TlsMode, TransportConfig};
