#[derive(Debug, thiserror::Error)]
pub enum MapSnapError {
    #[error("Invalid snapshot configuration: {0}")]
    Configuration(String),
    #[error("Failed to load signing key: {0}")]
    KeyLoad(String),
    #[error("Failed to serialize snapshot parameters: {0}")]
    Serialization(String),
    #[error("Failed to sign snapshot request: {0}")]
    Signing(String),
}

impl From<serde_json::Error> for MapSnapError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MapSnapError>;
