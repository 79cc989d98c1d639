use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("product not found: {0}")]
    ProductNotFound(u64),
    #[error("transaction not found: {0}")]
    NotFound(u64),
    #[error("invalid transaction status: {0}")]
    InvalidStatus(String),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for OrderError {
    fn from(e: rocksdb::Error) -> Self {
        OrderError::Storage(Box::new(e))
    }
}
