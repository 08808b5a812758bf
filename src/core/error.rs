use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskmateError {
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskmateError>;
