use formpilot_core_types::EngineError;
use thiserror::Error;

use crate::model::NodeId;

#[derive(Debug, Error, Clone)]
pub enum DomError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("node {0} no longer exists")]
    NodeGone(NodeId),
}

impl From<DomError> for EngineError {
    fn from(err: DomError) -> Self {
        EngineError::new(err.to_string())
    }
}
