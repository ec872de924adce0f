use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Non-2xx or `success: false` response. Displays the server message verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Transport failure. The detail is kept for logs, the display stays generic.
    #[error("Network error")]
    NetworkError(String),

    #[error("Invalid API response: {0}")]
    ParseError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationRequired => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::AuthenticationRequired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::ParseError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::InvalidInput(format!("Invalid CSV: {}", err))
    }
}

impl From<keyring::Error> for ApiError {
    fn from(err: keyring::Error) -> Self {
        ApiError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_message_verbatim() {
        let err = ApiError::Server {
            status: 422,
            message: "Quantity must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "Quantity must be positive");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_network_error_is_generic() {
        let err = ApiError::NetworkError("connection refused (os error 111)".to_string());
        assert_eq!(err.to_string(), "Network error");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_auth_error_message() {
        let err = ApiError::AuthenticationRequired;
        assert_eq!(err.to_string(), "Authentication required");
        assert!(err.is_auth_error());
    }
}
