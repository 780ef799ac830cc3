use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// Missing credentials, invalid prompt shape, unreadable config
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Connection-level failures before a status was received
    #[error("Network error: {0}")]
    Network(reqwest::Error),
    /// Response body could not be parsed
    #[error("Failed to parse response: {0}")]
    ResponseFormat(String),
    /// 401 / 403
    #[error("Authentication error ({status}): {body}")]
    Authentication { status: u16, body: String },
    /// 404
    #[error("Not found ({status}): {body}")]
    NotFound { status: u16, body: String },
    /// 429
    #[error("Rate limit exceeded ({status}): {body}")]
    RateLimited { status: u16, body: String },
    /// 5xx
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },
    /// Any other non-success status
    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },
    /// The byte stream ended abnormally after it was opened
    #[error("Stream error: {0}")]
    StreamError(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IOError(String),
}

impl LLMError {
    /// Maps a non-success HTTP status and its raw body onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let status = status.as_u16();
        match status {
            401 | 403 => Self::Authentication { status, body },
            404 => Self::NotFound { status, body },
            429 => Self::RateLimited { status, body },
            500..=599 => Self::ServerError { status, body },
            _ => Self::ApiError { status, body },
        }
    }

    /// Raw error body returned by the service, if this error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::NotFound { body, .. }
            | Self::RateLimited { body, .. }
            | Self::ServerError { body, .. }
            | Self::ApiError { body, .. } => Some(body),
            _ => None,
        }
    }

    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}

impl From<std::io::Error> for LLMError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body = || "{\"error\":{}}".to_string();
        assert!(matches!(
            LLMError::from_status(StatusCode::UNAUTHORIZED, body()),
            LLMError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::FORBIDDEN, body()),
            LLMError::Authentication { status: 403, .. }
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::NOT_FOUND, body()),
            LLMError::NotFound { .. }
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::TOO_MANY_REQUESTS, body()),
            LLMError::RateLimited { .. }
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::from_u16(529).unwrap(), body()),
            LLMError::ServerError { status: 529, .. }
        ));
        assert!(matches!(
            LLMError::from_status(StatusCode::BAD_REQUEST, body()),
            LLMError::ApiError { status: 400, .. }
        ));
    }

    #[test]
    fn test_body_is_kept_verbatim() {
        let err = LLMError::from_status(StatusCode::BAD_REQUEST, "raw body".to_string());
        assert_eq!(err.body(), Some("raw body"));
        assert!(err.to_string().contains("raw body"));
        assert_eq!(LLMError::ConfigError("x".into()).body(), None);
    }
}
