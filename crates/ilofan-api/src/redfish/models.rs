// Redfish Thermal resource wire types.
//
// Loosely typed on purpose: iLO firmware generations disagree on which
// fields are present, so everything except the collection order is
// optional and unknown fields are ignored.

use serde::Deserialize;

/// `GET /redfish/v1/chassis/1/Thermal`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thermal {
    /// Fans in controller order. Absent field means zero fans.
    #[serde(rename = "Fans", default)]
    pub fans: Vec<RedfishFan>,

    #[serde(rename = "Temperatures", default)]
    pub temperatures: Vec<RedfishTemperature>,
}

/// One entry of the `Fans` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedfishFan {
    /// iLO 4 uses `FanName`, the DMTF schema uses `Name`.
    #[serde(rename = "FanName", alias = "Name", default)]
    pub name: Option<String>,

    /// Percent of maximum duty cycle on iLO; `null` for absent fans.
    #[serde(rename = "CurrentReading", alias = "Reading", default)]
    pub current_reading: Option<u32>,

    #[serde(rename = "Units", alias = "ReadingUnits", default)]
    pub units: Option<String>,

    #[serde(rename = "Status", default)]
    pub status: Option<RedfishStatus>,

    #[serde(rename = "Oem", default)]
    pub oem: Option<RedfishOem>,
}

/// One entry of the `Temperatures` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedfishTemperature {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "ReadingCelsius", alias = "CurrentReading", default)]
    pub reading_celsius: Option<i64>,

    #[serde(rename = "UpperThresholdCritical", default)]
    pub upper_threshold_critical: Option<i64>,

    #[serde(rename = "PhysicalContext", default)]
    pub physical_context: Option<String>,

    #[serde(rename = "Status", default)]
    pub status: Option<RedfishStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedfishStatus {
    #[serde(rename = "Health", default)]
    pub health: Option<String>,

    #[serde(rename = "State", default)]
    pub state: Option<String>,
}

/// Vendor extension block. iLO 4 reports `Hp`, iLO 5+ reports `Hpe`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedfishOem {
    #[serde(rename = "Hp", default)]
    pub hp: Option<HpOem>,

    #[serde(rename = "Hpe", default)]
    pub hpe: Option<HpOem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HpOem {
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
}

impl RedfishFan {
    /// Physical location string from whichever OEM block is present.
    pub fn location(&self) -> Option<&str> {
        let oem = self.oem.as_ref()?;
        oem.hp
            .as_ref()
            .or(oem.hpe.as_ref())
            .and_then(|hp| hp.location.as_deref())
    }
}
