mod average;
mod config;
mod models;
mod regression;
mod timeline;
mod title;
mod trend;

pub use average::{AverageRateProjector, GrowthSummary};
pub use config::{
    ProjectionConfig, DEFAULT_SAMPLE_DAYS, MAX_GROWTH_RATE, MIN_DATA_POINTS, MIN_GROWTH_RATE,
    MIN_R2_THRESHOLD, RECENT_WEIGHT,
};
pub use models::{IndeterminateReason, ModelFit, ModelKind, ProjectedInstant, ProjectionResult};
pub use title::{TitleProjection, TitleProjector};
pub use trend::TrendProjector;
