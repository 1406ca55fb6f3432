use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOGIN_FALLBACK: &str = "Invalid email or password";
const LOGIN_FAILED: &str = "Failed to login. Please try again.";

/// A single field that the backend rejected, with its messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// The structured body the backend sends along with a 4xx status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<ValidationDetail>,
}

/// Errors of a request against the six cities backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    /// 4xx answers may carry a structured validation body.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        body: Option<ValidationError>,
    },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Reading or writing persisted data failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// All validation messages, fields separated by `. `, messages of one
    /// field by `, `. `None` if the error carries no details.
    pub fn validation_messages(&self) -> Option<String> {
        let ApiError::Status { body: Some(body), .. } = self else {
            return None
        };
        if body.details.is_empty() {
            return None;
        }
        Some(
            body.details
                .iter()
                .map(|detail| detail.messages.join(", "))
                .collect::<Vec<_>>()
                .join(". "),
        )
    }

    /// The human readable message shown when a login attempt fails
    pub fn login_message(&self) -> String {
        match self {
            ApiError::Status { status: 400, body } => {
                if let Some(messages) = self.validation_messages() {
                    return messages;
                }
                body.as_ref()
                    .and_then(|b| b.message.clone())
                    .unwrap_or_else(|| LOGIN_FALLBACK.to_string())
            }
            _ => LOGIN_FAILED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_request(body: Option<ValidationError>) -> ApiError {
        ApiError::Status { status: 400, body }
    }

    #[test]
    fn login_message_joins_validation_details() {
        let error = bad_request(Some(ValidationError {
            error_type: Some("VALIDATION_ERROR".into()),
            message: Some("Validation error: '/six-cities/login'".into()),
            details: vec![
                ValidationDetail {
                    property: "email".into(),
                    messages: vec!["email must be an email".into()],
                },
                ValidationDetail {
                    property: "password".into(),
                    messages: vec!["too short".into(), "needs a digit".into()],
                },
            ],
        }));
        assert_eq!(
            error.login_message(),
            "email must be an email. too short, needs a digit"
        );
    }

    #[test]
    fn login_message_falls_back() {
        assert_eq!(bad_request(None).login_message(), LOGIN_FALLBACK);
        let with_message = bad_request(Some(ValidationError {
            message: Some("Wrong password".into()),
            ..Default::default()
        }));
        assert_eq!(with_message.login_message(), "Wrong password");
        assert_eq!(
            ApiError::Transport("timeout".into()).login_message(),
            LOGIN_FAILED
        );
        let server = ApiError::Status {
            status: 500,
            body: None,
        };
        assert_eq!(server.login_message(), LOGIN_FAILED);
    }

    #[test]
    fn validation_body_parses_from_backend_json() {
        let body: ValidationError = serde_json::from_str(
            r#"{"errorType":"VALIDATION_ERROR","message":"bad","details":[{"property":"rating","value":7,"messages":["max 5"]}]}"#,
        )
        .unwrap();
        assert_eq!(body.details[0].property, "rating");
        assert_eq!(body.details[0].messages, vec!["max 5".to_string()]);
    }
}
