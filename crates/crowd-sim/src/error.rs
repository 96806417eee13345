use crowd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no default agent parameters installed; call set_agent_defaults first")]
    NoAgentDefaults,

    #[error("obstacle error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
