use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::numbers::Magnitude;
use crate::projection::GrowthSummary;
use crate::ranking::{Metric, MetricValue, Neighbors};
use crate::titles::TitleProgress;

/// Request payload for recording a snapshot. Magnitudes are suffixed or
/// plain decimal strings, or non-negative JSON integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRequest {
    /// Defaults to the server's current time
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
    pub soul_eggs: Magnitude,
    pub earnings_bonus: Magnitude,
    #[serde(default)]
    pub mystical_egg_ratio: f64,
    #[serde(default)]
    pub jeweled_egg_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleReport {
    pub player_key: String,
    pub earnings_bonus: Magnitude,
    #[serde(flatten)]
    pub progress: TitleProgress,
    /// Missing past the last title
    pub amount_needed: Option<Magnitude>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub player_key: String,
    pub metric: Metric,
    pub days: u32,
    /// Baseline before the window through the latest observation
    pub summary: GrowthSummary,
    pub daily_gain: Magnitude,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricNeighbors {
    pub metric: Metric,
    pub value: MetricValue,
    #[serde(flatten)]
    pub neighbors: Neighbors<MetricValue>,
}

#[derive(Debug, Deserialize)]
pub struct GrowthQuery {
    pub days: Option<u32>,
    pub metric: Option<Metric>,
}
