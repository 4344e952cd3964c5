use thiserror::Error;

#[derive(Debug, Error)]
pub enum BreakevenError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BreakevenError {
    fn from(e: serde_json::Error) -> Self {
        BreakevenError::SerializationError(e.to_string())
    }
}
