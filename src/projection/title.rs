use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AverageRateProjector, ProjectedInstant, ProjectionConfig, ProjectionResult, TrendProjector};
use crate::history::Observation;
use crate::numbers::Magnitude;
use crate::titles::TitleLadder;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleProjection {
    pub regression: ProjectionResult,
    pub average: ProjectedInstant,
    /// The sooner of `regression` and `average`
    pub earliest: ProjectedInstant,
}

/// Runs the regression and average-rate projections side by side.
#[derive(Debug, Clone, Default)]
pub struct TitleProjector {
    trend: TrendProjector,
    average: AverageRateProjector,
}

impl TitleProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            trend: TrendProjector::new(config.clone()),
            average: AverageRateProjector::new(config),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.trend.config()
    }

    pub fn project(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
    ) -> TitleProjection {
        self.project_at(observations, current, ladder, Utc::now())
    }

    pub fn project_at(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
        now: DateTime<Utc>,
    ) -> TitleProjection {
        let regression = self.trend.project_at(observations, current, ladder, now);
        let average = self.average.project_at(observations, current, ladder, now);

        TitleProjection {
            earliest: regression.projected.earliest(average),
            regression,
            average,
        }
    }
}
