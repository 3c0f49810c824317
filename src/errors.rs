use thiserror::Error;

/// Raised while turning a request into instruction text. Never reaches the
/// generation client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
    #[error("unknown option dimension: {0}")]
    UnknownDimension(String),
    #[error("unknown value {value:?} for dimension {dimension}")]
    UnknownValue { dimension: String, value: String },
}

/// Raised when an option table fails load-time validation.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate dimension: {0}")]
    DuplicateDimension(String),
    #[error("dimension {0} has no values")]
    EmptyDimension(String),
    #[error("dimension {dimension} has an empty value id")]
    EmptyValueId { dimension: String },
    #[error("duplicate value {value:?} in dimension {dimension}")]
    DuplicateValue { dimension: String, value: String },
    #[error("{dimension}/{value}: missing metadata key {key}")]
    MissingKey { dimension: String, value: String, key: String },
    #[error("{dimension}/{value}: metadata key {key} should be {expected}")]
    WrongType { dimension: String, value: String, key: String, expected: &'static str },
    #[error("required dimension not registered: {0}")]
    MissingDimension(String),
}

/// Raw failure reported by a provider transport, before it is folded into a
/// generation result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Other(e.to_string())
    }
}
