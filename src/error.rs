use std::fmt;

/// Error type for session and context operations
#[derive(Debug)]
pub enum SbError {
    /// Config file exists but could not be read
    ConfigRead(String),
    /// Config file could not be written
    ConfigWrite(String),
    /// Config file is not valid JSON or has an unrecognized shape
    ConfigParse(String),
    /// Server rejected the credentials or returned a non-success status
    Auth { status: u16, message: String },
    /// Control plane could not be reached
    Network(reqwest::Error),
    /// No usable context; an interactive login is needed
    LoginRequired(String),
    /// Named context does not exist
    NotFound(String),
    /// User-supplied value is malformed
    InvalidInput(String),
    /// Interactive prompt failed or was aborted
    Prompt(String),
    /// JSON (de)serialization error
    Json(String),
}

impl fmt::Display for SbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SbError::ConfigRead(msg) => write!(f, "Failed to read config: {}", msg),
            SbError::ConfigWrite(msg) => write!(f, "Failed to write config: {}", msg),
            SbError::ConfigParse(msg) => write!(f, "Failed to parse config: {}", msg),
            SbError::Auth { status, message } => {
                write!(f, "Authentication failed (status {}): {}", status, message)
            }
            SbError::Network(e) => write!(f, "Could not reach server: {}", e),
            SbError::LoginRequired(msg) => write!(f, "Login required: {}", msg),
            SbError::NotFound(msg) => write!(f, "{}", msg),
            SbError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SbError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
            SbError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for SbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SbError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SbError {
    fn from(err: reqwest::Error) -> Self {
        SbError::Network(err)
    }
}

impl From<serde_json::Error> for SbError {
    fn from(err: serde_json::Error) -> Self {
        SbError::Json(err.to_string())
    }
}

impl From<dialoguer::Error> for SbError {
    fn from(err: dialoguer::Error) -> Self {
        SbError::Prompt(err.to_string())
    }
}

/// Result type alias for session and context operations
pub type Result<T> = std::result::Result<T, SbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = SbError::Auth {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SbError>();
    }

    #[test]
    fn test_config_errors_display() {
        let err = SbError::ConfigParse("expected value at line 1".to_string());
        assert!(err.to_string().contains("Failed to parse config"));

        let err = SbError::ConfigWrite("permission denied".to_string());
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_login_required_display() {
        let err = SbError::LoginRequired("refresh token expired".to_string());
        assert!(err.to_string().starts_with("Login required"));
    }

    #[test]
    fn test_not_found_display_is_verbatim() {
        let err = SbError::NotFound("Context 'x' not found".to_string());
        assert_eq!(err.to_string(), "Context 'x' not found");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SbError = json_err.into();
        match err {
            SbError::Json(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected SbError::Json"),
        }
    }

    #[test]
    fn test_error_source_none_for_non_network() {
        use std::error::Error;
        let err = SbError::LoginRequired("x".to_string());
        assert!(err.source().is_none());
    }
}
