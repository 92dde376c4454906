use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    regression::{recency_weights, weighted_least_squares},
    timeline::{advance_by_hours, hours_between},
    IndeterminateReason, ModelFit, ModelKind, ProjectedInstant, ProjectionConfig,
    ProjectionResult,
};
use crate::history::{observation_window, Observation};
use crate::numbers::{self, Magnitude};
use crate::titles::TitleLadder;

struct Estimate {
    fit: ModelFit,
    hours: f64,
}

/// Projects when a growing quantity crosses its next title threshold by
/// fitting recency-weighted exponential and linear models.
#[derive(Debug, Clone, Default)]
pub struct TrendProjector {
    config: ProjectionConfig,
}

impl TrendProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn project(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
    ) -> ProjectionResult {
        self.project_at(observations, current, ladder, Utc::now())
    }

    /// `observations` must be sorted ascending by timestamp. Never fails:
    /// anything that prevents a projection yields an indeterminate result.
    pub fn project_at(
        &self,
        observations: &[Observation],
        current: &Magnitude,
        ladder: &TitleLadder,
        now: DateTime<Utc>,
    ) -> ProjectionResult {
        let Some(target) = ladder.next_threshold(current).map(|tier| tier.threshold.clone()) else {
            return ProjectionResult::indeterminate(
                current.clone(),
                None,
                IndeterminateReason::BeyondLastTitle,
            );
        };

        let window = observation_window(observations, now - self.config.sample_window());
        if window.len() < self.config.min_data_points {
            debug!(
                points = window.len(),
                required = self.config.min_data_points,
                "Not enough observations to project"
            );
            return ProjectionResult::indeterminate(
                current.clone(),
                Some(target),
                IndeterminateReason::InsufficientData,
            );
        }

        let estimate = self
            .estimate(window, current, &target)
            .and_then(|estimate| {
                advance_by_hours(now, estimate.hours)
                    .map(|instant| (estimate.fit, instant))
                    .ok_or(IndeterminateReason::ArithmeticFailure)
            });

        match estimate {
            Ok((fit, instant)) => ProjectionResult {
                current_magnitude: current.clone(),
                target_magnitude: Some(target),
                fit: Some(fit),
                projected: ProjectedInstant::At(instant),
            },
            Err(reason) => {
                debug!(?reason, "Projection is indeterminate");
                ProjectionResult::indeterminate(current.clone(), Some(target), reason)
            }
        }
    }

    fn estimate(
        &self,
        window: &[Observation],
        current: &Magnitude,
        target: &Magnitude,
    ) -> Result<Estimate, IndeterminateReason> {
        let first = window
            .first()
            .map(|observation| observation.timestamp)
            .ok_or(IndeterminateReason::ArithmeticFailure)?;
        let hours: Vec<f64> = window
            .iter()
            .map(|observation| hours_between(first, observation.timestamp))
            .collect();
        let weights = recency_weights(&hours, self.config.recent_weight);
        let values: Vec<f64> = window
            .iter()
            .map(|observation| observation.magnitude.to_f64())
            .collect();

        // ln is undefined at zero, so a series touching zero only gets a line
        let exponential = if values.iter().all(|value| *value > 0.0) {
            let logs: Vec<f64> = values.iter().map(|value| value.ln()).collect();
            weighted_least_squares(&hours, &logs, &weights)
        } else {
            None
        };
        let linear = weighted_least_squares(&hours, &values, &weights);
        let linear_r2 = linear.map_or(0.0, |fit| fit.r_squared);
        let growth_needed = numbers::ratio(target, current);

        if let Some(fit) = exponential {
            let rate = fit.slope.exp();
            if fit.r_squared > linear_r2
                && fit.r_squared >= self.config.min_r2
                && rate <= self.config.max_growth_rate
            {
                debug!(rate, r_squared = fit.r_squared, "Using exponential growth model");
                let growth_needed = growth_needed.ok_or(IndeterminateReason::ArithmeticFailure)?;
                return with_safety_margin(
                    ModelFit {
                        kind: ModelKind::Exponential,
                        growth_rate: rate,
                        fit_quality: fit.r_squared,
                    },
                    growth_needed.ln() / rate.ln(),
                );
            }
        }

        let fit = linear.ok_or(IndeterminateReason::ArithmeticFailure)?;
        if fit.slope <= 0.0 {
            return Err(IndeterminateReason::ArithmeticFailure);
        }

        let rate = (1.0 + fit.slope / current.to_f64())
            .clamp(self.config.min_growth_rate, self.config.max_growth_rate);
        debug!(rate, r_squared = fit.r_squared, "Using linear growth model");

        let linear_hours = target.saturating_sub(current).to_f64() / fit.slope;
        let compounding_hours = growth_needed.map_or(f64::INFINITY, |ratio| ratio.ln() / rate.ln());

        with_safety_margin(
            ModelFit {
                kind: ModelKind::Linear,
                growth_rate: rate,
                fit_quality: fit.r_squared,
            },
            linear_hours.min(compounding_hours),
        )
    }
}

/// Inflates the estimate by up to 2x as the fit gets worse.
fn with_safety_margin(fit: ModelFit, hours: f64) -> Result<Estimate, IndeterminateReason> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(IndeterminateReason::ArithmeticFailure);
    }

    let quality = fit.fit_quality.clamp(0.0, 1.0);
    Ok(Estimate {
        fit,
        hours: hours * (1.0 + (1.0 - quality)),
    })
}
