use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed payload: {0}")]
    Decode(#[source] serde_json::Error),
}
