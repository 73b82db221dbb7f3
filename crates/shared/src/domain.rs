use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayColor {
    Green,
    Red,
    Yellow,
    Orange,
}

impl DisplayColor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
        }
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Gate state as reported by the server. Anything outside the five known
/// labels is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GateStatusLabel {
    Opening,
    Closing,
    Opened,
    Closed,
    ClosedUnknownPlate,
    Other(String),
}

impl GateStatusLabel {
    pub const OPENING: &'static str = "Gate Opening";
    pub const CLOSING: &'static str = "Gate Closing";
    pub const OPENED: &'static str = "Gate Opened";
    pub const CLOSED: &'static str = "Gate Closed";
    pub const CLOSED_UNKNOWN_PLATE: &'static str = "Gate Closed - Unknown Plate";

    pub fn from_wire(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.as_str() {
            Self::OPENING => Self::Opening,
            Self::CLOSING => Self::Closing,
            Self::OPENED => Self::Opened,
            Self::CLOSED => Self::Closed,
            Self::CLOSED_UNKNOWN_PLATE => Self::ClosedUnknownPlate,
            _ => Self::Other(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Opening => Self::OPENING,
            Self::Closing => Self::CLOSING,
            Self::Opened => Self::OPENED,
            Self::Closed => Self::CLOSED,
            Self::ClosedUnknownPlate => Self::CLOSED_UNKNOWN_PLATE,
            Self::Other(raw) => raw,
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            Self::Opening | Self::Closing => DisplayColor::Orange,
            Self::Opened | Self::Closed => DisplayColor::Green,
            Self::ClosedUnknownPlate => DisplayColor::Red,
            Self::Other(_) => DisplayColor::Yellow,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for GateStatusLabel {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for GateStatusLabel {
    fn from(value: String) -> Self {
        Self::from_wire(value)
    }
}

impl From<&str> for GateStatusLabel {
    fn from(value: &str) -> Self {
        Self::from_wire(value)
    }
}

impl From<GateStatusLabel> for String {
    fn from(value: GateStatusLabel) -> Self {
        match value {
            GateStatusLabel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for GateStatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateStatusCategory {
    Known,
    Unknown,
    NotApplicable,
}

impl PlateStatusCategory {
    /// `plate_known` wins over everything; otherwise a plate can only be
    /// judged unknown when some text was actually detected.
    pub fn classify(plate_known: bool, license_plate: Option<&str>) -> Self {
        if plate_known {
            Self::Known
        } else if license_plate.is_some_and(|plate| !plate.is_empty()) {
            Self::Unknown
        } else {
            Self::NotApplicable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Known => "Known",
            Self::Unknown => "Unknown",
            Self::NotApplicable => "N/A",
        }
    }

    pub fn color(self) -> DisplayColor {
        match self {
            Self::Known => DisplayColor::Green,
            Self::Unknown => DisplayColor::Red,
            Self::NotApplicable => DisplayColor::Yellow,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
