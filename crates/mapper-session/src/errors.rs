use formpilot_core_types::EngineError;
use page_port::DomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl From<MapperError> for EngineError {
    fn from(err: MapperError) -> Self {
        EngineError::new(err.to_string())
    }
}
