// API error type and its JSON envelope
use crate::application::credential_store::StoreError;
use crate::application::display_runtime::DisplayStopped;
use crate::domain::proxy::ProxyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid proxy target: {0}")]
    InvalidTarget(String),

    #[error("Cannot reach dashboard: {0}")]
    Unreachable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Display runtime has stopped")]
    DisplayStopped,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidTarget(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::DisplayStopped => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidTarget(_) => "INVALID_TARGET",
            AppError::Unreachable(_) => "UPSTREAM_UNREACHABLE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::DisplayStopped => "DISPLAY_STOPPED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::InvalidTarget(reason) => AppError::InvalidTarget(reason),
            ProxyError::Unreachable(reason) => AppError::Unreachable(reason),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(reason) => AppError::Validation(reason),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<DisplayStopped> for AppError {
    fn from(_: DisplayStopped) -> Self {
        AppError::DisplayStopped
    }
}

pub type ApiResult<T> = Result<T, AppError>;
