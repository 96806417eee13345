use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("obstacle polygon needs at least 2 vertices, got {0}")]
    DegeneratePolygon(usize),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
