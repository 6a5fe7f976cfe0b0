//! Typed errors and HTTP mapping.

use crate::service::validation::{NAME_REQUIRED, NAME_TAKEN, NAME_TOO_LONG};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("unknown store backend '{0}' (expected 'postgres' or 'memory')")]
    UnknownBackend(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("product name is empty")]
    EmptyName,
    #[error("product name has {0} characters, at most 255 allowed")]
    NameTooLong(usize),
    #[error("product name already exists: {0}")]
    DuplicateName(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failing request fields mapped to their messages, ordered by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        f.write_str(&fields.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Store(StoreError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // A unique-constraint hit at commit time reads the same as the pre-check.
            StoreError::DuplicateName(_) => AppError::Validation(FieldErrors::single("name", NAME_TAKEN)),
            StoreError::EmptyName => AppError::Validation(FieldErrors::single("name", NAME_REQUIRED)),
            StoreError::NameTooLong(_) => AppError::Validation(FieldErrors::single("name", NAME_TOO_LONG)),
            other => AppError::Store(other),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let (message, errors) = match self {
            AppError::Validation(errors) => ("The given data was invalid.".to_string(), Some(errors)),
            AppError::Store(err) => {
                tracing::error!(error = %err, "storage failure");
                ("internal storage error".to_string(), None)
            }
            other => (other.to_string(), None),
        };
        let details = errors.as_ref().and_then(|e| serde_json::to_value(e).ok());
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_group_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("price", "The price field is required.");
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some(&["first".to_string(), "second".to_string()][..]));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "price"]);
        assert_eq!(errors.to_string(), "name, price");
    }

    #[test]
    fn duplicate_name_becomes_validation_error() {
        let err = AppError::from(StoreError::DuplicateName("Widget".into()));
        match err {
            AppError::Validation(errors) => assert_eq!(errors.get("name"), Some(&[NAME_TAKEN.to_string()][..])),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn store_name_rules_become_validation_errors() {
        for (err, message) in [(StoreError::EmptyName, NAME_REQUIRED), (StoreError::NameTooLong(300), NAME_TOO_LONG)] {
            match AppError::from(err) {
                AppError::Validation(errors) => assert_eq!(errors.get("name"), Some(&[message.to_string()][..])),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::NotFound("product 1".into()).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation(FieldErrors::single("name", "x")).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::BadRequest("bad json".into()).into_response().status(), StatusCode::BAD_REQUEST);
    }
}
