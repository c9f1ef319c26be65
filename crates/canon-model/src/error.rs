use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
    #[error("unknown schema category: {0}")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
