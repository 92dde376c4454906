pub use interpolator::{Neighbors, RankEntry, RankedEntry, RankingInterpolator};
pub use metric::{Metric, MetricValue, RankValue};

mod interpolator;
mod metric;
