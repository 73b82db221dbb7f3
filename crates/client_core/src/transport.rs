use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{
    StatusSnapshot, ToggleDetectionRequest, ToggleDetectionResponse, DATA_PATH,
    TOGGLE_DETECTION_PATH,
};
use url::Url;

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    data: Url,
    toggle_detection: Url,
}

impl Endpoints {
    pub fn new(server_url: &str) -> Result<Self, DashboardError> {
        let invalid = |source| DashboardError::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        };
        let mut base = Url::parse(server_url.trim()).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let data = base.join(DATA_PATH).map_err(invalid)?;
        let toggle_detection = base.join(TOGGLE_DETECTION_PATH).map_err(invalid)?;
        Ok(Self {
            base,
            data,
            toggle_detection,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn data(&self) -> &Url {
        &self.data
    }

    pub fn toggle_detection(&self) -> &Url {
        &self.toggle_detection
    }
}

/// The two server calls the dashboard makes.
#[async_trait]
pub trait GateControlPlane: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, DashboardError>;
    async fn send_toggle(
        &self,
        request: ToggleDetectionRequest,
    ) -> Result<ToggleDetectionResponse, DashboardError>;
}

pub struct HttpControlPlane {
    http: Client,
    endpoints: Endpoints,
}

impl HttpControlPlane {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }
}

fn transport_error(endpoint: &Url) -> impl FnOnce(reqwest::Error) -> DashboardError + '_ {
    move |source| DashboardError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

#[async_trait]
impl GateControlPlane for HttpControlPlane {
    async fn fetch_status(&self) -> Result<StatusSnapshot, DashboardError> {
        let endpoint = self.endpoints.data();
        let response = self
            .http
            .get(endpoint.clone())
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        if !response.status().is_success() {
            return Err(DashboardError::Status {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }
        let body = response.bytes().await.map_err(transport_error(endpoint))?;
        StatusSnapshot::from_json_slice(&body).map_err(|source| DashboardError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn send_toggle(
        &self,
        request: ToggleDetectionRequest,
    ) -> Result<ToggleDetectionResponse, DashboardError> {
        let endpoint = self.endpoints.toggle_detection();
        let response = self
            .http
            .post(endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        if !response.status().is_success() {
            return Err(DashboardError::Status {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }
        let body = response.bytes().await.map_err(transport_error(endpoint))?;
        // Body is informational only.
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }
}
