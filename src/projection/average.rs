use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::Serialize;

use super::{
    timeline::{advance_by_hours, hours_between},
    IndeterminateReason, ProjectedInstant, ProjectionConfig,
};
use crate::history::{observation_window, Observation};
use crate::numbers::Magnitude;
use crate::titles::TitleLadder;

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Net growth between the first and last observation of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub start: Magnitude,
    pub end: Magnitude,
    /// `end − start`, zero when the value shrank
    pub gained: Magnitude,
    /// Gain per hour, zero when the window spans no time
    pub hourly_rate: f64,
}

impl GrowthSummary {
    /// `None` for an empty slice.
    pub fn from_observations(observations: &[Observation]) -> Option<Self> {
        let first = observations.first()?;
        let last = observations.last()?;

        let gained = last.magnitude.saturating_sub(&first.magnitude);
        let elapsed = hours_between(first.timestamp, last.timestamp);
        let hourly_rate = if elapsed > 0.0 {
            gained.to_f64() / elapsed
        } else {
            0.0
        };

        Some(Self {
            started_at: first.timestamp,
            ended_at: last.timestamp,
            start: first.magnitude.clone(),
            end: last.magnitude.clone(),
            gained,
            hourly_rate,
        })
    }

    pub fn daily_rate(&self) -> f64 {
        self.hourly_rate * 24.0
    }

    /// Exact gain per day, rounded half up to whole units. Zero when the
    /// window spans no time.
    pub fn daily_gain(&self) -> Magnitude {
        let elapsed = match u64::try_from((self.ended_at - self.started_at).num_milliseconds()) {
            Ok(millis) if millis > 0 => BigUint::from(millis),
            _ => return Magnitude::zero(),
        };
        let scaled = self.gained.as_biguint() * BigUint::from(MILLIS_PER_DAY) * 2u32 + &elapsed;
        Magnitude::new(scaled / (elapsed * 2u32))
    }
}

/// Straight-line projection from the average hourly gain over the sample
/// window.
#[derive(Debug, Clone, Default)]
pub struct AverageRateProjector {
    config: ProjectionConfig,
}

impl AverageRateProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn project(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
    ) -> ProjectedInstant {
        self.project_at(observations, current, ladder, Utc::now())
    }

    pub fn project_at(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
        now: DateTime<Utc>,
    ) -> ProjectedInstant {
        let Some(target) = ladder.next_threshold(current) else {
            return ProjectedInstant::Indeterminate(IndeterminateReason::BeyondLastTitle);
        };

        let window = observation_window(observations, now - self.config.sample_window());
        if window.len() < 2 {
            return ProjectedInstant::Indeterminate(IndeterminateReason::InsufficientData);
        }

        let Some(summary) = GrowthSummary::from_observations(window) else {
            return ProjectedInstant::Indeterminate(IndeterminateReason::InsufficientData);
        };
        if summary.hourly_rate <= 0.0 || !summary.hourly_rate.is_finite() {
            return ProjectedInstant::Indeterminate(IndeterminateReason::ArithmeticFailure);
        }

        let hours = target.threshold.saturating_sub(current).to_f64() / summary.hourly_rate;
        if !hours.is_finite() {
            return ProjectedInstant::Indeterminate(IndeterminateReason::ArithmeticFailure);
        }

        advance_by_hours(now, hours)
            .map(ProjectedInstant::At)
            .unwrap_or(ProjectedInstant::Indeterminate(
                IndeterminateReason::ArithmeticFailure,
            ))
    }
}
