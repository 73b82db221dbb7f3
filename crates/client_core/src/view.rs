//! Rendering surface for the dashboard. Element ids mirror the page markup
//! the status server ships, so any front end can bind the same contract.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Mutex, PoisonError},
};

use shared::domain::DisplayColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    ToggleDetection,
    Status,
    CapturedImage,
    LicensePlate,
    PlateStatus,
    GateStatus,
}

impl ElementId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToggleDetection => "toggle-detection",
            Self::Status => "status",
            Self::CapturedImage => "captured-image",
            Self::LicensePlate => "license-plate",
            Self::PlateStatus => "plate-status",
            Self::GateStatus => "gate-status",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    pub text: Option<String>,
    pub color: Option<DisplayColor>,
    pub source: Option<String>,
}

/// Must be cheap and non-blocking: it is called from the click path and
/// from every tick.
pub trait DashboardView: Send + Sync {
    fn set_text(&self, element: ElementId, text: &str);
    fn set_color(&self, element: ElementId, color: DisplayColor);
    fn set_image_source(&self, element: ElementId, source: &str);
}

/// Element table kept in memory.
#[derive(Debug, Default)]
pub struct MemoryView {
    elements: Mutex<BTreeMap<ElementId, ElementState>>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, element: ElementId) -> ElementState {
        self.lock().get(&element).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<ElementId, ElementState> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ElementId, ElementState>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DashboardView for MemoryView {
    fn set_text(&self, element: ElementId, text: &str) {
        self.lock().entry(element).or_default().text = Some(text.to_string());
    }

    fn set_color(&self, element: ElementId, color: DisplayColor) {
        self.lock().entry(element).or_default().color = Some(color);
    }

    fn set_image_source(&self, element: ElementId, source: &str) {
        self.lock().entry(element).or_default().source = Some(source.to_string());
    }
}
