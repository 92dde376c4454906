// Library crate for the eggdash dashboard backend
// This file exposes the public API for integration tests

pub mod app;
pub mod dashboard;
pub mod history;
pub mod numbers;
pub mod projection;
pub mod ranking;
pub mod shared;
pub mod titles;

// Re-export commonly used types for easier access in tests
pub use dashboard::{DashboardError, DashboardService};
pub use history::{InMemorySnapshotRepository, Observation, PlayerSnapshot, SnapshotRepository};
pub use numbers::{decode, difference, encode, Magnitude, NumberError};
pub use projection::{ProjectedInstant, ProjectionConfig, TitleProjector, TrendProjector};
pub use ranking::{Metric, RankingInterpolator};
pub use shared::{AppConfig, AppError, AppState};
pub use titles::{TitleLadder, TitleProgress};
