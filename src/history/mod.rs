pub mod models;
pub mod repository;

mod errors;

pub use errors::RepositoryError;
pub use models::{observation_window, window_since, Observation, PlayerSnapshot};
pub use repository::{InMemorySnapshotRepository, PostgresSnapshotRepository, SnapshotRepository};
