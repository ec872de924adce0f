use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// Response wrapper every backend endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Turn a raw HTTP status and body into the envelope's `data`, or an error.
///
/// 401 maps to `AuthenticationRequired` regardless of body. Other non-2xx
/// statuses surface the body's `message` (or `error`) field verbatim.
pub fn unwrap_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if status == 401 {
        return Err(ApiError::AuthenticationRequired);
    }

    if !(200..300).contains(&status) {
        return Err(ApiError::Server {
            status,
            message: error_message(body)
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
        });
    }

    let envelope: ApiEnvelope<Value> = serde_json::from_str(body).map_err(|e| {
        ApiError::ParseError(format!("Failed to parse response: {} - Body: {}", e, body))
    })?;

    if !envelope.success {
        return Err(ApiError::Server {
            status,
            message: envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string()),
        });
    }

    let data = envelope.data.unwrap_or(Value::Null);
    let was_null = data.is_null();
    serde_json::from_value(data).map_err(|e| {
        if was_null {
            ApiError::ParseError("Response data is empty".to_string())
        } else {
            ApiError::ParseError(format!("Unexpected response data: {}", e))
        }
    })
}

/// Best available message from an error body, if it is JSON at all.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        count: u32,
    }

    #[test]
    fn test_success_returns_data() {
        let body = r#"{"success": true, "data": {"id": "t-1", "count": 3}}"#;
        let sample: Sample = unwrap_envelope(200, body).unwrap();
        assert_eq!(
            sample,
            Sample {
                id: "t-1".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_non_2xx_uses_server_message() {
        let body = r#"{"success": false, "message": "X"}"#;
        let err = unwrap_envelope::<Sample>(400, body).unwrap_err();
        assert_eq!(err.to_string(), "X");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_non_2xx_falls_back_to_error_field() {
        let body = r#"{"error": "Rule not found"}"#;
        let err = unwrap_envelope::<Sample>(404, body).unwrap_err();
        assert_eq!(err.to_string(), "Rule not found");
    }

    #[test]
    fn test_non_2xx_without_json_body() {
        let err = unwrap_envelope::<Sample>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_401_is_authentication_required() {
        let body = r#"{"success": false, "message": "jwt expired"}"#;
        let err = unwrap_envelope::<Sample>(401, body).unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "Authentication required");
    }

    #[test]
    fn test_envelope_failure_on_2xx() {
        let body = r#"{"success": false, "message": "Daily limit reached"}"#;
        let err = unwrap_envelope::<Sample>(200, body).unwrap_err();
        assert_eq!(err.to_string(), "Daily limit reached");

        let err = unwrap_envelope::<Sample>(200, r#"{"success": false}"#).unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn test_missing_data_accepted_for_unit() {
        let body = r#"{"success": true, "message": "Deleted"}"#;
        let result: Result<(), _> = unwrap_envelope(200, body);
        assert!(result.is_ok());

        let maybe: Option<Sample> = unwrap_envelope(200, body).unwrap();
        assert!(maybe.is_none());
    }

    #[test]
    fn test_missing_data_rejected_for_struct() {
        let err = unwrap_envelope::<Sample>(200, r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::ParseError(ref m) if m == "Response data is empty"));
    }

    #[test]
    fn test_non_json_success_body_is_parse_error() {
        let err = unwrap_envelope::<Sample>(200, "OK").unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)));
    }
}
