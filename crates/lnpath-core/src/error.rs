/// Core data-model errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid metric: {0:?} (expected fee, hop or timelock)")]
    InvalidMetric(String),

    #[error("channel map decoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
