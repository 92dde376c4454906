use thiserror::Error;

use crate::history::RepositoryError;
use crate::numbers::NumberError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Number(#[from] NumberError),

    #[error("No snapshots recorded for player {0}")]
    PlayerNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
