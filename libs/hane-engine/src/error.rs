use hane_api::ConvertError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("converter not found: {0}")]
    ConverterNotFound(String),

    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Add context to the error.
    ///
    /// Message-carrying variants get the context prepended; wrapped errors
    /// are returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            EngineError::ConverterNotFound(msg) => {
                EngineError::ConverterNotFound(format!("{ctx}: {msg}"))
            }
            other => other,
        }
    }
}
