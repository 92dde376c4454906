use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::dashboard::{DashboardError, DashboardService};
use crate::history::RepositoryError;
use crate::numbers::NumberError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(dashboard: Arc<DashboardService>) -> Self {
        Self { dashboard }
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Unset means snapshots are kept in memory only
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("EGGDASH_BIND_ADDR")
                .ok()
                .filter(|addr| !addr.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Repository(RepositoryError::Database(msg)) => AppError::DatabaseError(msg),
            DashboardError::Repository(RepositoryError::Corrupt(msg)) => {
                AppError::DatabaseError(format!("unreadable snapshot: {}", msg))
            }
            DashboardError::Number(err) => AppError::from(err),
            DashboardError::PlayerNotFound(_) => AppError::NotFound(err.to_string()),
            DashboardError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<NumberError> for AppError {
    fn from(err: NumberError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Repository failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", msg),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_errors_map_to_status_codes() {
        let cases = [
            (
                DashboardError::Number(NumberError::Format("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::PlayerNotFound("ghost".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                DashboardError::Repository(RepositoryError::Database("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn config_defaults_bind_address() {
        let config = AppConfig::from_env();
        assert!(!config.bind_addr.is_empty());
    }
}
