use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::numbers::Magnitude;
use crate::ranking::{Metric, MetricValue};

/// One historical value of a tracked quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub magnitude: Magnitude,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, magnitude: Magnitude) -> Self {
        Self {
            timestamp,
            magnitude,
        }
    }
}

/// One polled record of a player's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_key: String,
    pub recorded_at: DateTime<Utc>,
    pub soul_eggs: Magnitude,
    pub earnings_bonus: Magnitude,
    pub mystical_egg_ratio: f64,
    pub jeweled_egg_ratio: f64,
}

impl PlayerSnapshot {
    pub fn metric_value(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::SoulEggs => MetricValue::Magnitude(self.soul_eggs.clone()),
            Metric::EarningsBonus => MetricValue::Magnitude(self.earnings_bonus.clone()),
            Metric::MysticalEggRatio => MetricValue::Ratio(self.mystical_egg_ratio),
            Metric::JeweledEggRatio => MetricValue::Ratio(self.jeweled_egg_ratio),
        }
    }

    /// `None` for the ratio metrics, which are not tracked as time series.
    pub fn observation(&self, metric: Metric) -> Option<Observation> {
        match self.metric_value(metric) {
            MetricValue::Magnitude(magnitude) => Some(Observation::new(self.recorded_at, magnitude)),
            MetricValue::Ratio(_) => None,
        }
    }
}

/// Items at or after `cutoff`, plus the last one before it as a baseline.
///
/// `items` must be sorted ascending by `timestamp`.
pub fn window_since<T, F>(items: &[T], cutoff: DateTime<Utc>, timestamp: F) -> &[T]
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let start = items.partition_point(|item| timestamp(item) < cutoff);
    &items[start.saturating_sub(1)..]
}

pub fn observation_window(observations: &[Observation], cutoff: DateTime<Utc>) -> &[Observation] {
    window_since(observations, cutoff, |observation| observation.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn series(hours: &[i64]) -> Vec<Observation> {
        hours
            .iter()
            .map(|&h| Observation::new(at(h), Magnitude::from(h as u64)))
            .collect()
    }

    #[test]
    fn window_keeps_one_baseline_before_cutoff() {
        let observations = series(&[0, 10, 20, 30, 40]);
        let window = observation_window(&observations, at(25));
        let hours: Vec<_> = window.iter().map(|o| o.magnitude.to_string()).collect();
        assert_eq!(hours, vec!["20", "30", "40"]);
    }

    #[test]
    fn window_includes_everything_when_cutoff_precedes_data() {
        let observations = series(&[5, 6]);
        assert_eq!(observation_window(&observations, at(0)).len(), 2);
    }

    #[test]
    fn window_keeps_last_point_when_all_data_is_old() {
        let observations = series(&[1, 2, 3]);
        let window = observation_window(&observations, at(100));
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].timestamp, at(3));
    }

    #[test]
    fn ratio_metrics_have_no_observation() {
        let snapshot = PlayerSnapshot {
            player_key: "EI123".into(),
            recorded_at: at(0),
            soul_eggs: Magnitude::from(10u64),
            earnings_bonus: Magnitude::from(20u64),
            mystical_egg_ratio: 1.5,
            jeweled_egg_ratio: 2.5,
        };

        let observation = snapshot.observation(Metric::EarningsBonus).unwrap();
        assert_eq!(observation.magnitude, Magnitude::from(20u64));
        assert!(snapshot.observation(Metric::JeweledEggRatio).is_none());
        assert_eq!(
            snapshot.metric_value(Metric::MysticalEggRatio),
            MetricValue::Ratio(1.5)
        );
    }
}
