use axum::http::StatusCode;
use thiserror::Error;

/// Shown whenever the backend cannot be reached or answers with something
/// that is not JSON.
pub const NETWORK_ERROR: &str = "Network error. Please ensure the backend server is running.";

/// Failure of the HTTP adapter itself, rendered as a plain status page.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Form problems caught before anything is sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Invalid vehicle type")]
    InvalidVehicleType,
    #[error("Please choose a recycling plant from the list")]
    UnknownPlant,
    #[error("You must agree to the Terms of Service and Privacy Policy")]
    TermsNotAccepted,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never produced a usable JSON answer.
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },
}

impl RequestError {
    /// The text a page shows for this failure: the server's own message when
    /// it sent one, the page's fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Transport(_) => NETWORK_ERROR.to_string(),
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_server_message() {
        let err = RequestError::Rejected {
            status: 400,
            message: Some("Invalid vehicle type".into()),
        };
        assert_eq!(err.user_message("Failed to book appointment"), "Invalid vehicle type");
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = RequestError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to book appointment"), "Failed to book appointment");

        let blank = RequestError::Rejected {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(blank.user_message("fallback"), "fallback");
    }

    #[test]
    fn transport_failure_uses_network_message() {
        let err = RequestError::Transport("connection refused".into());
        assert_eq!(err.user_message("ignored"), NETWORK_ERROR);
    }
}
