use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::GateStatusLabel,
    protocol::{StatusSnapshot, ToggleDetectionRequest, ToggleDetectionResponse},
};
use tokio::sync::Mutex;

use crate::{error::DashboardError, transport::GateControlPlane};

pub(crate) fn snapshot(
    status: &str,
    image: &str,
    license_plate: &str,
    plate_known: bool,
    gate_status: &str,
) -> StatusSnapshot {
    StatusSnapshot {
        status: status.to_string(),
        image: image.to_string(),
        license_plate: Some(license_plate.to_string()),
        plate_known,
        gate_status: GateStatusLabel::from_wire(gate_status),
        is_running: None,
    }
}

pub(crate) fn scenario_a() -> StatusSnapshot {
    snapshot("Running", "/cap/1.jpg", "ABC123", true, "Gate Opened")
}

pub(crate) fn scenario_b() -> StatusSnapshot {
    snapshot(
        "Idle",
        "/cap/2.jpg",
        "XYZ999",
        false,
        "Gate Closed - Unknown Plate",
    )
}

pub(crate) fn scenario_c() -> StatusSnapshot {
    snapshot("Idle", "/cap/3.jpg", "", false, "Gate Closing")
}

pub(crate) fn server_error() -> DashboardError {
    DashboardError::Status {
        endpoint: "http://gate.test/data".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Replays queued results in order. An empty status queue behaves like an
/// unreachable server; an empty toggle queue acknowledges.
#[derive(Default)]
pub(crate) struct ScriptedControlPlane {
    statuses: Mutex<VecDeque<Result<StatusSnapshot, DashboardError>>>,
    toggles: Mutex<VecDeque<Result<ToggleDetectionResponse, DashboardError>>>,
    fetch_delay: Option<Duration>,
    pub(crate) fetch_calls: Arc<AtomicUsize>,
    pub(crate) toggle_requests: Arc<Mutex<Vec<ToggleDetectionRequest>>>,
}

impl ScriptedControlPlane {
    pub(crate) fn with_statuses(
        statuses: impl IntoIterator<Item = Result<StatusSnapshot, DashboardError>>,
    ) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn with_toggles(
        toggles: impl IntoIterator<Item = Result<ToggleDetectionResponse, DashboardError>>,
    ) -> Self {
        Self {
            toggles: Mutex::new(toggles.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }
}

#[async_trait]
impl GateControlPlane for ScriptedControlPlane {
    async fn fetch_status(&self) -> Result<StatusSnapshot, DashboardError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.statuses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(DashboardError::Unavailable))
    }

    async fn send_toggle(
        &self,
        request: ToggleDetectionRequest,
    ) -> Result<ToggleDetectionResponse, DashboardError> {
        self.toggle_requests.lock().await.push(request);
        self.toggles
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ToggleDetectionResponse::default()))
    }
}
