use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("unknown match strategy: {0} (expected `greedy` or `optimal`)")]
    UnknownStrategy(String),
    #[error("acceptance threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, MapError>;
