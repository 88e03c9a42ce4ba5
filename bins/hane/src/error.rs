use hane_api::ConvertError;
use hane_engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Invalid(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        CliError::Engine(EngineError::Convert(e))
    }
}
