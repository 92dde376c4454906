pub mod clock;
pub mod handlers;
pub mod service;
pub mod types;

mod errors;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::DashboardError;
pub use service::{DashboardService, DashboardServiceBuilder};
pub use types::{GrowthReport, MetricNeighbors, SnapshotRequest, TitleReport};
