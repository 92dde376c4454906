use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use strum_macros::{Display, EnumIter, EnumString};

use crate::numbers::Magnitude;

/// Statistics players are ranked by. Each one is sorted independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    SoulEggs,
    EarningsBonus,
    MysticalEggRatio,
    JeweledEggRatio,
}

impl Metric {
    pub fn is_magnitude(&self) -> bool {
        matches!(self, Metric::SoulEggs | Metric::EarningsBonus)
    }
}

/// Ordering used when sorting a ranking.
pub trait RankValue: Clone {
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankValue for Magnitude {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl RankValue for f64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Value of a metric for one player.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Magnitude(Magnitude),
    Ratio(f64),
}

impl MetricValue {
    /// Suffixed text for magnitudes, three decimals for ratios.
    pub fn display(&self) -> String {
        match self {
            MetricValue::Magnitude(magnitude) => magnitude.to_suffixed(),
            MetricValue::Ratio(ratio) => format!("{:.3}", ratio),
        }
    }
}

impl RankValue for MetricValue {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MetricValue::Magnitude(a), MetricValue::Magnitude(b)) => a.cmp(b),
            (MetricValue::Ratio(a), MetricValue::Ratio(b)) => a.total_cmp(b),
            (MetricValue::Magnitude(a), MetricValue::Ratio(b)) => a.to_f64().total_cmp(b),
            (MetricValue::Ratio(a), MetricValue::Magnitude(b)) => a.total_cmp(&b.to_f64()),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}
