//! Error handling for the relevance engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelevanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Ranking error: {0}")]
    Ranking(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, RelevanceError>;

/// Model2Vec reports its failures through anyhow
impl From<anyhow::Error> for RelevanceError {
    fn from(err: anyhow::Error) -> Self {
        RelevanceError::ModelLoading(format!("{:#}", err))
    }
}

impl From<toml::de::Error> for RelevanceError {
    fn from(err: toml::de::Error) -> Self {
        RelevanceError::Configuration(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for RelevanceError {
    fn from(err: toml::ser::Error) -> Self {
        RelevanceError::Configuration(format!("Failed to serialize config: {}", err))
    }
}
