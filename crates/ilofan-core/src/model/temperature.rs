// ── Temperature domain types ──

use serde::{Deserialize, Serialize};

use super::Health;
use super::fan::FanState;

/// One temperature sensor from the same Thermal resource as the fans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub name: String,
    pub reading_celsius: Option<i64>,
    pub upper_critical_celsius: Option<i64>,
    pub health: Health,
    /// Sensors share the Redfish `Status.State` vocabulary with fans.
    pub state: FanState,
    /// Physical context (`Intake`, `CPU`, `SystemBoard`, ...).
    pub context: String,
}
