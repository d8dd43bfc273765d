use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Items list cannot be empty")]
    EmptyItemList,

    #[error("Budget must be positive, got {0}")]
    InvalidBudget(f64),

    #[error("Sku not found: {0}")]
    SkuNotFound(String),

    #[error("Index not initialized. Call build() or load() first")]
    IndexNotReady,

    #[error("Feature schema mismatch: artifact was trained with a different feature contract ({actual:?}, expected {expected:?})")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
