#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read stored value: {0}")]
    Read(std::io::Error),
    #[error("failed to write stored value: {0}")]
    Write(std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Decode(serde_json::Error),
    #[error("failed to encode value as JSON: {0}")]
    Encode(serde_json::Error),
}

pub type BlobStoreResult<T> = std::result::Result<T, BlobStoreError>;
