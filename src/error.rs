use crate::model::leave_request::LeaveStatus;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures while resolving a bearer credential or signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    Missing,
    #[error("Invalid token")]
    Invalid,
    #[error("Token has expired")]
    Expired,
    #[error("Token has been revoked")]
    Revoked,
    #[error("Invalid email or password")]
    BadCredentials,
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            AuthError::Missing => "missing_token",
            AuthError::Invalid => "invalid_token",
            AuthError::Expired => "token_expired",
            AuthError::Revoked => "token_revoked",
            AuthError::BadCredentials => "invalid_credentials",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    AccessDenied,
    NotFound,
    Other,
}

/// A persistence failure, already classified for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Other, message)
    }

    /// Fallback classification from error text, used only when the driver
    /// gives nothing structured to go on.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        let kind = if lowered.contains("access denied") {
            StorageErrorKind::AccessDenied
        } else if lowered.contains("not found") || lowered.contains("doesn't exist") {
            StorageErrorKind::NotFound
        } else {
            StorageErrorKind::Other
        };
        Self::new(kind, message)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Email already in use")]
    EmailTaken,

    #[error("Leave request {0} not found")]
    NotFound(String),

    #[error(
        "Cannot {action} leave request. Current status is {current}. Only Pending requests can be {done}."
    )]
    InvalidTransition {
        action: &'static str,
        done: &'static str,
        current: LeaveStatus,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code carried in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(e) => e.code(),
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Validation { .. } => "validation_error",
            ApiError::EmailTaken => "email_taken",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidTransition { .. } => "invalid_transition",
            ApiError::Storage(e) => match e.kind {
                StorageErrorKind::AccessDenied => "storage_access_denied",
                StorageErrorKind::NotFound => "storage_not_found",
                StorageErrorKind::Other => "storage_error",
            },
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Storage(e) => match e.kind {
                StorageErrorKind::AccessDenied => {
                    "Database access denied. Please ensure the service account has the required permissions."
                        .to_string()
                }
                StorageErrorKind::NotFound => {
                    "Database or table not found. Please ensure the schema has been created."
                        .to_string()
                }
                StorageErrorKind::Other => format!("Database error: {}", e.message),
            },
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage(e) => match e.kind {
                StorageErrorKind::AccessDenied => StatusCode::FORBIDDEN,
                StorageErrorKind::NotFound => StatusCode::NOT_FOUND,
                StorageErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "code": self.code(),
            "detail": self.detail(),
        }))
    }
}
