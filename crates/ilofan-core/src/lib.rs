//! Fan-control domain layer between `ilofan-api` and its callers.
//!
//! - **[`FanController`]**: facade exposing
//!   [`fetch_fans`](FanController::fetch_fans),
//!   [`unlock_fans`](FanController::unlock_fans),
//!   [`set_fan_speeds`](FanController::set_fan_speeds) and
//!   [`fetch_temperatures`](FanController::fetch_temperatures). Every call
//!   resolves credentials afresh and owns its own HTTP client or SSH session.
//!
//! - **[`speed`]**: percentage to native duty-cycle translation and request
//!   validation. No I/O.
//!
//! - **Domain model** ([`model`]): [`FanReading`] and
//!   [`TemperatureReading`] snapshots normalized from Redfish.
//!
//! - **[`CredentialResolver`]**: how the caller supplies credentials;
//!   `ilofan-config` provides the environment-backed one.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod speed;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::FanCommand;
pub use config::{ControllerConfig, CredentialResolver};
pub use controller::{FanController, WriteStage};
pub use error::CoreError;
pub use model::{FanReading, FanState, Health, TemperatureReading};
pub use speed::{SpeedRequest, Violation, to_native_speed};

pub use ilofan_api::{Credentials, KexAlgorithm, SessionOptions, TlsMode, TransportConfig};
