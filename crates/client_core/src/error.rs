use reqwest::StatusCode;
use shared::error::WireError;
use thiserror::Error;

/// Coarse failure taxonomy. Both kinds are handled the same way: logged,
/// never surfaced to the operator, and never fatal to polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Protocol,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with non-success status {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("{endpoint} returned an undecodable body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: WireError,
    },
    #[error("control plane is unavailable")]
    Unavailable,
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Unavailable => ErrorKind::Transport,
            Self::Status { .. } | Self::Decode { .. } | Self::InvalidServerUrl { .. } => {
                ErrorKind::Protocol
            }
        }
    }
}
