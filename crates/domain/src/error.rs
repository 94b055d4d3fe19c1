/// Shared error type used across all NeuroBOT crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification callers branch on when deciding how to report
/// a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    AuthError,
    TransportError,
    ProviderError,
    Timeout,
}

/// Provider message returned when the selected key (or the entity it
/// refers to) is unknown to the service.
pub const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::Config(_) => ErrorKind::InvalidInput,
            Error::Auth(_) => ErrorKind::AuthError,
            Error::Http(_) | Error::Io(_) => ErrorKind::TransportError,
            Error::Provider { .. } | Error::Json(_) => ErrorKind::ProviderError,
            Error::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Whether the failure means the active credential was missing,
    /// rejected, or pointed at an entity the provider does not know.
    pub fn is_credential_rejection(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Provider { message, .. } => message.contains(ENTITY_NOT_FOUND),
            _ => false,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
