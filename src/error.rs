//! Error handling module for the registry-auth pusher

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PusherError {
    /// Listing registries or credentials from the catalog failed
    #[error("Catalog error: {0}")]
    Catalog(String),
    /// The engine endpoint could not be reached or configured
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Version negotiation error: {0}")]
    VersionNegotiation(String),
    /// The engine refused to start the push
    #[error("Push initiation error: {0}")]
    PushInitiation(String),
    /// Malformed or truncated status stream
    #[error("Status stream decode error: {0}")]
    Decode(String),
    /// The engine reported an error record while pushing
    #[error("Push image '{image}' FAIL")]
    PushFailed { image: String },
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<url::ParseError> for PusherError {
    fn from(err: url::ParseError) -> Self {
        PusherError::Configuration(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PusherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_failed_message_names_image() {
        let err = PusherError::PushFailed {
            image: "registry.example.com/app:1.0".to_string(),
        };
        assert_eq!(err.to_string(), "Push image 'registry.example.com/app:1.0' FAIL");
    }

    #[test]
    fn test_url_error_is_configuration() {
        let err: PusherError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, PusherError::Configuration(_)));
    }
}
