// ── API-to-domain type conversions ──
//
// Bridges raw `ilofan_api::redfish` wire types into `ilofan_core::model`
// values, filling defaults for fields older firmware leaves out.

use ilofan_api::redfish::{RedfishFan, RedfishStatus, RedfishTemperature};

use crate::model::{FanReading, FanState, Health, TemperatureReading};

fn status_parts(status: Option<&RedfishStatus>) -> (Health, FanState) {
    let health = Health::from_redfish(status.and_then(|s| s.health.as_deref()));
    let state = FanState::from_redfish(status.and_then(|s| s.state.as_deref()));
    (health, state)
}

impl From<&RedfishFan> for FanReading {
    fn from(fan: &RedfishFan) -> Self {
        let (health, state) = status_parts(fan.status.as_ref());
        Self {
            name: fan.name.clone().unwrap_or_default(),
            current_value: fan.current_reading.unwrap_or(0),
            health,
            state,
            location: fan.location().unwrap_or_default().to_owned(),
        }
    }
}

impl From<&RedfishTemperature> for TemperatureReading {
    fn from(sensor: &RedfishTemperature) -> Self {
        let (health, state) = status_parts(sensor.status.as_ref());
        Self {
            name: sensor.name.clone().unwrap_or_default(),
            reading_celsius: sensor.reading_celsius,
            upper_critical_celsius: sensor.upper_threshold_critical,
            health,
            state,
            context: sensor.physical_context.clone().unwrap_or_default(),
        }
    }
}
