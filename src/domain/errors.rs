use thiserror::Error;

/// Message shown when the service gives no reason of its own.
pub const GENERIC_SERVICE_ERROR: &str = "Server error";

/// Failure of a calculation call.
///
/// The variants exist for logging; the user only ever sees
/// [`ServiceError::user_message`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("loan service unreachable: {0}")]
    Transport(String),
    #[error("loan service rejected the request with status {status}: {}", .message.as_deref().unwrap_or("<no reason>"))]
    Rejected { status: u16, message: Option<String> },
    #[error("loan service returned an unreadable response: {0}")]
    Malformed(String),
    #[error("calculation worker stopped before reporting a result")]
    WorkerLost,
}

impl ServiceError {
    /// The single string displayed in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Rejected { message: Some(message), .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_SERVICE_ERROR.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_reason() {
        let error = ServiceError::Rejected { status: 422, message: Some("Term too long".to_string()) };
        assert_eq!(error.user_message(), "Term too long");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let cases = [
            ServiceError::Rejected { status: 500, message: None },
            ServiceError::Rejected { status: 500, message: Some(String::new()) },
            ServiceError::Transport("connection refused".to_string()),
            ServiceError::Malformed("expected value".to_string()),
            ServiceError::WorkerLost,
        ];
        for error in cases {
            assert_eq!(error.user_message(), GENERIC_SERVICE_ERROR, "{error}");
        }
    }
}
