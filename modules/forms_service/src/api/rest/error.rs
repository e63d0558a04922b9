//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::FormsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Forms error code (extension member)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: FormsError) -> Problem {
    let code = error.code();
    let detail = error.to_string();

    let problem = match &error {
        FormsError::FormNotFound { .. } => Problem::new(StatusCode::NOT_FOUND, "Form Not Found"),
        FormsError::EntryDoesNotExist { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Entry Not Found")
        }
        FormsError::DuplicateFieldKey { .. } => {
            Problem::new(StatusCode::CONFLICT, "Duplicate Field Key")
        }
        FormsError::SuccessEmailExists { .. } => {
            Problem::new(StatusCode::CONFLICT, "Success Email Exists")
        }
        FormsError::Validation { .. } => Problem::new(StatusCode::BAD_REQUEST, "Validation Error"),
        FormsError::PermissionDenied { .. } => {
            Problem::new(StatusCode::FORBIDDEN, "Permission Denied")
        }
        FormsError::Storage { .. } => {
            tracing::error!(error = %error, "storage failure");
            return Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
                .with_code(code);
        }
    };

    problem.with_detail(detail).with_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: FormsError| map_domain_error(e).status;

        assert_eq!(
            status(FormsError::FormNotFound {
                handle: "x".to_string()
            }),
            404
        );
        assert_eq!(
            status(FormsError::DuplicateFieldKey {
                key: "email".to_string()
            }),
            409
        );
        assert_eq!(
            status(FormsError::Validation {
                message: "bad".to_string()
            }),
            400
        );
        assert_eq!(
            status(FormsError::PermissionDenied {
                scope: "forms".to_string()
            }),
            403
        );
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let problem = map_domain_error(FormsError::Storage {
            message: "connection string with password".to_string(),
        });
        assert_eq!(problem.status, 500);
        assert_eq!(problem.code, Some(5007));
        assert_eq!(problem.detail.as_deref(), Some("An unexpected error occurred"));
    }

    #[test]
    fn test_detail_carries_coded_message() {
        let problem = map_domain_error(FormsError::FormNotFound {
            handle: "contact-us".to_string(),
        });
        assert_eq!(problem.code, Some(5001));
        assert_eq!(
            problem.detail.as_deref(),
            Some("5001: Form handle \"contact-us\" does not exist")
        );
    }
}
