use formpilot_core_types::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FillError {
    #[error("fill cancelled")]
    Cancelled,
    #[error("page unavailable: {0}")]
    PageUnavailable(String),
}

impl From<FillError> for EngineError {
    fn from(err: FillError) -> Self {
        EngineError::new(err.to_string())
    }
}
