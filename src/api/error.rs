use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;

/// Stable machine-readable error codes. Attached to error responses so the
/// message can be localised after the handler has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFields,
    Validation,
    EmailTaken,
    AdminExists,
    InvalidCredentials,
    NoToken,
    InvalidToken,
    Forbidden,
    NotFound,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::Validation => "validation_error",
            Self::EmailTaken => "email_taken",
            Self::AdminExists => "admin_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NoToken => "no_token",
            Self::InvalidToken => "invalid_token",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Internal => "internal_error",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::MissingFields | Self::Validation | Self::EmailTaken | Self::AdminExists => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::NoToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    MissingFields(String),

    ValidationError(String),

    EmailTaken,

    AdminExists,

    InvalidCredentials,

    NoToken,

    InvalidToken,

    Forbidden,

    NotFound(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingFields(msg) => write!(f, "Missing fields: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::EmailTaken => write!(f, "User already exists"),
            ApiError::AdminExists => write!(f, "Admin already exists"),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::NoToken => write!(f, "No token"),
            ApiError::InvalidToken => write!(f, "Invalid token"),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MissingFields(_) => ErrorKind::MissingFields,
            ApiError::ValidationError(_) => ErrorKind::Validation,
            ApiError::EmailTaken => ErrorKind::EmailTaken,
            ApiError::AdminExists => ErrorKind::AdminExists,
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::NoToken => ErrorKind::NoToken,
            ApiError::InvalidToken => ErrorKind::InvalidToken,
            ApiError::Forbidden => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::InternalError(_) => ErrorKind::Internal,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::MissingFields(fields.join(", "))
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let error_message = match &self {
            ApiError::MissingFields(fields) => format!("Missing fields: {}", fields),
            ApiError::ValidationError(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody::new(error_message, kind.code());
        let mut response = (kind.status(), Json(body)).into_response();
        response.extensions_mut().insert(kind);
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
