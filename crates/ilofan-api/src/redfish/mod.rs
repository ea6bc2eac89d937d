// Redfish telemetry surface.

pub mod client;
pub mod models;

pub use client::RedfishClient;
pub use models::{RedfishFan, RedfishStatus, RedfishTemperature, Thermal};
