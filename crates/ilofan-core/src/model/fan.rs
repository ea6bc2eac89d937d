// ── Fan domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Health;

/// Redfish `Status.State` for a fan.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum FanState {
    Enabled,
    Disabled,
    Absent,
    /// Any other Redfish state (`StandbyOffline`, `InTest`, ...) or none.
    #[default]
    Unknown,
}

impl FanState {
    pub fn from_redfish(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}

/// One fan as reported by the most recent telemetry fetch.
///
/// Its position in the returned list is its fan index for speed commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanReading {
    pub name: String,
    /// Percent of full speed; 0 when the controller reports none.
    pub current_value: u32,
    pub health: Health,
    pub state: FanState,
    pub location: String,
}
