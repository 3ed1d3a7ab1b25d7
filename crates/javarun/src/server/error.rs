use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::runner::{CompileError, ExecuteError, RunError};

/// Message for 500 responses that don't have a more specific one
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors surfaced by the run endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("invalid request: {0}")]
    InvalidCode(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    /// Generated source, for compile and artifact failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Underlying cause, for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            details: None,
        }
    }

    fn with_code(error: impl Into<String>, code: &str) -> Self {
        Self {
            code: Some(code.to_owned()),
            ..Self::message(error)
        }
    }

    fn internal(details: impl ToString) -> Self {
        Self {
            details: Some(details.to_string()),
            ..Self::message(INTERNAL_ERROR_MESSAGE)
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Run(RunError::MissingCode) => StatusCode::BAD_REQUEST,
            ApiError::Run(RunError::Compile {
                error: CompileError::Failed { .. } | CompileError::Timeout { .. },
                ..
            }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Run(RunError::MissingCode) => ErrorBody::message(RunError::MissingCode.to_string()),
            ApiError::Run(RunError::Compile { error, program }) => match error {
                CompileError::Failed { output, .. } => ErrorBody::with_code(output.as_str(), program),
                CompileError::Timeout { .. } => ErrorBody::with_code(error.to_string(), program),
                CompileError::Workspace(e) => ErrorBody::internal(e),
            },
            ApiError::Run(RunError::Execute { error, program }) => match error {
                ExecuteError::ClassNotFound(_) => ErrorBody::with_code(error.to_string(), program),
                ExecuteError::Workspace(e) => ErrorBody::internal(e),
            },
            ApiError::Run(RunError::Workspace(e)) => ErrorBody::internal(e),
            ApiError::InvalidCode(message) => ErrorBody::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            info!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
