use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopogenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Size error: population of {actual} is smaller than the selection pool of {required}")]
    Size { required: usize, actual: usize },

    #[error("Input error: {0}")]
    Input(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TopogenError>;
