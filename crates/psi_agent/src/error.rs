use psi_core::ValidationError;
use psi_world::GridPos;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid agent configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("cannot place agent at {0}: out of bounds, impassable or occupied")]
    Occupied(GridPos),

    #[error("no free passable tile to start on")]
    NoStartPosition,
}
