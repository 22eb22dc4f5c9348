use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Request rejected: {0}")]
    Rejected(FieldErrors),
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::NotFound(_) => "This note no longer exists.".to_string(),
            ApiError::Rejected(_) => "Please fix the highlighted fields.".to_string(),
            ApiError::Network(_) => {
                "Unable to connect to server. Please check your connection or try again later."
                    .to_string()
            }
            ApiError::Status { .. } | ApiError::Decode(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// True when the server could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
