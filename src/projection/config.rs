use chrono::Duration;
use std::str::FromStr;
use tracing::warn;

pub const MIN_DATA_POINTS: usize = 3;
/// A regression needs at least two distinct samples
pub const MIN_DATA_POINTS_FLOOR: usize = 2;
pub const DEFAULT_SAMPLE_DAYS: u32 = 30;
pub const RECENT_WEIGHT: f64 = 2.0;
pub const MIN_R2_THRESHOLD: f64 = 0.75;
pub const MIN_GROWTH_RATE: f64 = 1.0001;
/// At most 1% growth per hour
pub const MAX_GROWTH_RATE: f64 = 1.01;

/// Tuning for title projections.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub min_data_points: usize,
    pub sample_days: u32,
    pub recent_weight: f64,
    pub min_r2: f64,
    pub min_growth_rate: f64,
    pub max_growth_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            min_data_points: MIN_DATA_POINTS,
            sample_days: DEFAULT_SAMPLE_DAYS,
            recent_weight: RECENT_WEIGHT,
            min_r2: MIN_R2_THRESHOLD,
            min_growth_rate: MIN_GROWTH_RATE,
            max_growth_rate: MAX_GROWTH_RATE,
        }
    }
}

impl ProjectionConfig {
    /// Defaults overridden by `EGGDASH_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            min_data_points: at_least_floor(env_or(
                "EGGDASH_MIN_DATA_POINTS",
                defaults.min_data_points,
            )),
            sample_days: env_or("EGGDASH_SAMPLE_DAYS", defaults.sample_days),
            recent_weight: env_or("EGGDASH_RECENT_WEIGHT", defaults.recent_weight),
            min_r2: env_or("EGGDASH_MIN_R2", defaults.min_r2),
            min_growth_rate: env_or("EGGDASH_MIN_GROWTH_RATE", defaults.min_growth_rate),
            max_growth_rate: env_or("EGGDASH_MAX_GROWTH_RATE", defaults.max_growth_rate),
        };

        if config.min_growth_rate > config.max_growth_rate {
            warn!(
                min = config.min_growth_rate,
                max = config.max_growth_rate,
                "Growth rate bounds are inverted, using defaults"
            );
            return Self {
                min_growth_rate: defaults.min_growth_rate,
                max_growth_rate: defaults.max_growth_rate,
                ..config
            };
        }

        config
    }

    pub fn sample_window(&self) -> Duration {
        Duration::days(i64::from(self.sample_days))
    }
}

fn at_least_floor(min_data_points: usize) -> usize {
    if min_data_points < MIN_DATA_POINTS_FLOOR {
        warn!(
            requested = min_data_points,
            floor = MIN_DATA_POINTS_FLOOR,
            "Minimum data points raised to floor"
        );
        return MIN_DATA_POINTS_FLOOR;
    }
    min_data_points
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
