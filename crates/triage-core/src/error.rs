//! Error types for comment triage

/// Result type alias using the triage Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for comment triage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Blank or unparseable comment input.
    ///
    /// Classifiers answer such comments with a default verdict (not spam,
    /// neutral) instead of returning this variant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No embedding vocabulary could be loaded or trained
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// Vector arithmetic errors (dimension mismatch and similar)
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A classification unit exceeded its deadline
    #[error("operation timed out")]
    Timeout,

    /// A classification unit panicked or could not be scheduled
    #[error("unit failure: {0}")]
    UnitFailure(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new model unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a new embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new unit failure error
    pub fn unit_failure(msg: impl Into<String>) -> Self {
        Self::UnitFailure(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from a unit that missed its deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
