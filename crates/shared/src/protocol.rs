use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{GateStatusLabel, PlateStatusCategory},
    error::WireError,
};

pub const DATA_PATH: &str = "data";
pub const TOGGLE_DETECTION_PATH: &str = "toggle-detection";

/// Body of `GET /data`. Each poll replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    pub image: String,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub plate_known: bool,
    #[serde(default, deserialize_with = "null_as_unrecognized_gate")]
    pub gate_status: GateStatusLabel,
    #[serde(
        default,
        deserialize_with = "bool_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_running: Option<bool>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unrecognized_gate<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<GateStatusLabel, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(GateStatusLabel::from_wire)
        .unwrap_or_default())
}

/// `is_running` is informational; a value of the wrong type is dropped
/// rather than failing the whole snapshot.
fn bool_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(serde_json::Value::deserialize(deserializer)?.as_bool())
}

impl StatusSnapshot {
    pub fn from_json_slice(body: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(body).map_err(WireError::Decode)
    }

    pub fn license_plate(&self) -> &str {
        self.license_plate.as_deref().unwrap_or_default()
    }

    pub fn plate_category(&self) -> PlateStatusCategory {
        PlateStatusCategory::classify(self.plate_known, self.license_plate.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleDetectionRequest {
    #[serde(rename = "isDetectionRunning")]
    pub is_detection_running: bool,
}

impl ToggleDetectionRequest {
    pub fn new(is_detection_running: bool) -> Self {
        Self {
            is_detection_running,
        }
    }
}

/// Reply to `POST /toggle-detection`. Only ever logged by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleDetectionResponse {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
