use thiserror::Error;

/// Failure of a posts fetch, passed through from the layer that produced it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
