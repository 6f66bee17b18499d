#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis response format not recognised: {0}")]
    Format(String),
    #[error("invalid date format: {0}")]
    Validation(String),
    #[error("history storage failure: {0}")]
    Persistence(#[from] gutlog_blobstore::BlobStoreError),
    #[error("failed to serialize history: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize history: {0}")]
    Deserialization(serde_json::Error),
    #[error("image payload is not valid base64: {0}")]
    ImageDecode(base64::DecodeError),
    #[error("analysis model failure: {0}")]
    Collaborator(String),
}

impl From<gutlog_ai::AiError> for AnalysisError {
    fn from(e: gutlog_ai::AiError) -> Self {
        AnalysisError::Collaborator(e.to_string())
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
