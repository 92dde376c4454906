use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::numbers::Magnitude;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Exponential,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminateReason {
    /// Too few observations in the sample window
    InsufficientData,
    /// No title threshold above the current magnitude
    BeyondLastTitle,
    /// The data produced no usable growth estimate (flat or shrinking
    /// series, degenerate fit, overflow)
    ArithmeticFailure,
}

/// When a threshold is expected to be crossed, if that can be told at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedInstant {
    At(DateTime<Utc>),
    Indeterminate(IndeterminateReason),
}

impl ProjectedInstant {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ProjectedInstant::At(instant) => Some(*instant),
            ProjectedInstant::Indeterminate(_) => None,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, ProjectedInstant::Indeterminate(_))
    }

    /// The sooner of two projections. A determinate one wins over an
    /// indeterminate one; when both are indeterminate `self` is kept.
    pub fn earliest(self, other: ProjectedInstant) -> ProjectedInstant {
        match (self, other) {
            (ProjectedInstant::At(a), ProjectedInstant::At(b)) => ProjectedInstant::At(a.min(b)),
            (ProjectedInstant::At(_), ProjectedInstant::Indeterminate(_)) => self,
            (ProjectedInstant::Indeterminate(_), ProjectedInstant::At(_)) => other,
            (ProjectedInstant::Indeterminate(_), ProjectedInstant::Indeterminate(_)) => self,
        }
    }
}

/// The growth model a projection was based on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelFit {
    pub kind: ModelKind,
    /// Multiplicative growth per hour
    pub growth_rate: f64,
    /// R² of the chosen model, 0..=1
    pub fit_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub current_magnitude: Magnitude,
    pub target_magnitude: Option<Magnitude>,
    pub fit: Option<ModelFit>,
    pub projected: ProjectedInstant,
}

impl ProjectionResult {
    pub fn indeterminate(
        current_magnitude: Magnitude,
        target_magnitude: Option<Magnitude>,
        reason: IndeterminateReason,
    ) -> Self {
        Self {
            current_magnitude,
            target_magnitude,
            fit: None,
            projected: ProjectedInstant::Indeterminate(reason),
        }
    }
}
