// ── Domain model ──
//
// Value snapshots built from one telemetry fetch. Never mutated; callers
// discard them once consumed.

pub mod fan;
pub mod temperature;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use fan::{FanReading, FanState};
pub use temperature::TemperatureReading;

/// Redfish `Status.Health`, normalized.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Health {
    #[strum(serialize = "OK")]
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Critical,
    #[default]
    Unknown,
}

impl Health {
    /// Parse a raw Redfish value; anything unrecognized is `Unknown`.
    pub fn from_redfish(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}
