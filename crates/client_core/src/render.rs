use shared::{
    domain::{DisplayColor, PlateStatusCategory},
    protocol::StatusSnapshot,
};
use url::Url;

use crate::view::{DashboardView, ElementId};

pub const CACHE_BUST_PARAM: &str = "t";

/// Everything one snapshot puts on screen. Computed from the snapshot alone;
/// nothing carries over from earlier ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRender {
    pub status_text: String,
    pub image_source: String,
    pub license_plate: String,
    pub plate_category: PlateStatusCategory,
    pub gate_text: String,
    pub gate_color: DisplayColor,
}

impl DashboardRender {
    pub fn from_snapshot(snapshot: &StatusSnapshot, base_url: &Url, now_millis: i64) -> Self {
        Self {
            status_text: snapshot.status.clone(),
            image_source: cache_busted_image_source(base_url, &snapshot.image, now_millis),
            license_plate: snapshot.license_plate().to_string(),
            plate_category: snapshot.plate_category(),
            gate_text: snapshot.gate_status.as_str().to_string(),
            gate_color: snapshot.gate_status.color(),
        }
    }

    pub fn plate_label(&self) -> &'static str {
        self.plate_category.label()
    }

    pub fn plate_color(&self) -> DisplayColor {
        self.plate_category.color()
    }

    pub fn apply(&self, view: &dyn DashboardView) {
        view.set_text(ElementId::Status, &self.status_text);
        view.set_image_source(ElementId::CapturedImage, &self.image_source);
        view.set_text(ElementId::LicensePlate, &self.license_plate);
        view.set_text(ElementId::PlateStatus, self.plate_label());
        view.set_color(ElementId::PlateStatus, self.plate_color());
        view.set_text(ElementId::GateStatus, &self.gate_text);
        view.set_color(ElementId::GateStatus, self.gate_color);
    }
}

/// Frames are frequently rewritten under the same path, so every render
/// gets a fresh `t=<millis>` query pair.
pub fn cache_busted_image_source(base_url: &Url, image: &str, now_millis: i64) -> String {
    match base_url.join(image) {
        Ok(mut resolved) => {
            resolved
                .query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &now_millis.to_string());
            resolved.to_string()
        }
        Err(_) => {
            let separator = if image.contains('?') { '&' } else { '?' };
            format!("{image}{separator}{CACHE_BUST_PARAM}={now_millis}")
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
