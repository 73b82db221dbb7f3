//! Terminal rendering of the dashboard: every element change becomes a log line.

use client_core::{DashboardView, ElementId, ElementState, MemoryView};
use shared::domain::DisplayColor;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ConsoleView {
    elements: MemoryView,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn element(&self, element: ElementId) -> ElementState {
        self.elements.element(element)
    }
}

impl DashboardView for ConsoleView {
    fn set_text(&self, element: ElementId, text: &str) {
        if self.elements.element(element).text.as_deref() == Some(text) {
            return;
        }
        self.elements.set_text(element, text);
        info!(element = %element, text, "dashboard: updated");
    }

    fn set_color(&self, element: ElementId, color: DisplayColor) {
        if self.elements.element(element).color == Some(color) {
            return;
        }
        self.elements.set_color(element, color);
        info!(element = %element, color = %color, "dashboard: updated");
    }

    fn set_image_source(&self, element: ElementId, source: &str) {
        self.elements.set_image_source(element, source);
        // Source changes on every render because of the cache-busting pair.
        debug!(element = %element, source, "dashboard: image refreshed");
    }
}
