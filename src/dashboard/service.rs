use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use super::{
    clock::{Clock, SystemClock},
    types::{GrowthReport, MetricNeighbors, SnapshotRequest, TitleReport},
    DashboardError,
};
use crate::history::{Observation, PlayerSnapshot, SnapshotRepository};
use crate::numbers::Magnitude;
use crate::projection::{GrowthSummary, ProjectionConfig, TitleProjection, TitleProjector};
use crate::ranking::{Metric, MetricValue, RankEntry, RankingInterpolator};
use crate::titles::TitleLadder;

pub const DEFAULT_GROWTH_DAYS: u32 = 7;
pub const MAX_GROWTH_DAYS: u32 = 3650;

/// Orchestrates the snapshot store and the pure dashboard computations.
pub struct DashboardService {
    repository: Arc<dyn SnapshotRepository>,
    ladder: TitleLadder,
    projector: TitleProjector,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn builder(repository: Arc<dyn SnapshotRepository>) -> DashboardServiceBuilder {
        DashboardServiceBuilder::new(repository)
    }

    pub fn ladder(&self) -> &TitleLadder {
        &self.ladder
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[instrument(skip(self, request))]
    pub async fn record_snapshot(
        &self,
        player_key: &str,
        request: SnapshotRequest,
    ) -> Result<PlayerSnapshot, DashboardError> {
        let player_key = validate_player_key(player_key)?;
        let snapshot = PlayerSnapshot {
            player_key,
            recorded_at: request.recorded_at.unwrap_or_else(|| self.clock.now()),
            soul_eggs: request.soul_eggs,
            earnings_bonus: request.earnings_bonus,
            mystical_egg_ratio: validate_ratio("mystical_egg_ratio", request.mystical_egg_ratio)?,
            jeweled_egg_ratio: validate_ratio("jeweled_egg_ratio", request.jeweled_egg_ratio)?,
        };

        self.repository.record_snapshot(snapshot.clone()).await?;
        info!(
            recorded_at = %snapshot.recorded_at,
            earnings_bonus = %snapshot.earnings_bonus.to_suffixed(),
            "Snapshot recorded"
        );
        Ok(snapshot)
    }

    pub async fn latest_snapshot(&self, player_key: &str) -> Result<PlayerSnapshot, DashboardError> {
        let player_key = validate_player_key(player_key)?;
        let latest = self.repository.latest_snapshot(&player_key).await?;
        latest.ok_or(DashboardError::PlayerNotFound(player_key))
    }

    /// Time series of a magnitude metric since `since`, with one baseline
    /// observation before it.
    pub async fn observations(
        &self,
        player_key: &str,
        metric: Metric,
        since: DateTime<Utc>,
    ) -> Result<Vec<Observation>, DashboardError> {
        if !metric.is_magnitude() {
            return Err(DashboardError::Validation(format!(
                "{} is not tracked over time",
                metric
            )));
        }

        let player_key = validate_player_key(player_key)?;
        let snapshots = self.repository.snapshots_since(&player_key, since).await?;
        Ok(snapshots
            .iter()
            .filter_map(|snapshot| snapshot.observation(metric))
            .collect())
    }

    /// Latest value of `metric` for every player.
    pub async fn rank_snapshot(
        &self,
        metric: Metric,
    ) -> Result<Vec<RankEntry<MetricValue>>, DashboardError> {
        let snapshots = self.repository.latest_per_player().await?;
        Ok(rank_entries(&snapshots, metric))
    }

    #[instrument(skip(self))]
    pub async fn title_progress(&self, player_key: &str) -> Result<TitleReport, DashboardError> {
        let snapshot = self.latest_snapshot(player_key).await?;
        let progress = self.ladder.progress(&snapshot.earnings_bonus);
        let amount_needed = self.ladder.amount_needed(&snapshot.earnings_bonus);

        Ok(TitleReport {
            player_key: snapshot.player_key,
            earnings_bonus: snapshot.earnings_bonus,
            progress,
            amount_needed,
        })
    }

    #[instrument(skip(self))]
    pub async fn projection(&self, player_key: &str) -> Result<TitleProjection, DashboardError> {
        let now = self.clock.now();
        let since = now - self.projector.config().sample_window();

        let (snapshot, observations) = futures::try_join!(
            self.latest_snapshot(player_key),
            self.observations(player_key, Metric::EarningsBonus, since),
        )?;

        let projection =
            self.projector
                .project_at(&observations, &snapshot.earnings_bonus, &self.ladder, now);
        debug!(
            observations = observations.len(),
            earliest = ?projection.earliest,
            "Projection computed"
        );
        Ok(projection)
    }

    #[instrument(skip(self))]
    pub async fn growth(
        &self,
        player_key: &str,
        metric: Metric,
        days: u32,
    ) -> Result<GrowthReport, DashboardError> {
        if days == 0 || days > MAX_GROWTH_DAYS {
            return Err(DashboardError::Validation(format!(
                "days must be between 1 and {}",
                MAX_GROWTH_DAYS
            )));
        }

        let since = self.clock.now() - Duration::days(i64::from(days));
        let player_key = validate_player_key(player_key)?;
        let observations = self.observations(&player_key, metric, since).await?;
        let Some(summary) = GrowthSummary::from_observations(&observations) else {
            return Err(DashboardError::PlayerNotFound(player_key));
        };
        let daily_gain = summary.daily_gain();

        Ok(GrowthReport {
            player_key,
            metric,
            days,
            summary,
            daily_gain,
        })
    }

    /// Neighbors of the player in every metric's ranking, all computed from
    /// one read of the latest snapshots.
    #[instrument(skip(self))]
    pub async fn neighbors(&self, player_key: &str) -> Result<Vec<MetricNeighbors>, DashboardError> {
        let player_key = validate_player_key(player_key)?;
        let (snapshot, everyone) = futures::try_join!(
            self.latest_snapshot(&player_key),
            async {
                self.repository
                    .latest_per_player()
                    .await
                    .map_err(DashboardError::from)
            },
        )?;

        let neighbors: Vec<MetricNeighbors> = Metric::iter()
            .map(|metric| {
                let value = snapshot.metric_value(metric);
                let entries = rank_entries(&everyone, metric);
                MetricNeighbors {
                    metric,
                    neighbors: RankingInterpolator::find_neighbors(&entries, &player_key, &value),
                    value,
                }
            })
            .collect();

        debug!(players = everyone.len(), "Neighbors computed");
        Ok(neighbors)
    }
}

fn rank_entries(snapshots: &[PlayerSnapshot], metric: Metric) -> Vec<RankEntry<MetricValue>> {
    snapshots
        .iter()
        .map(|snapshot| RankEntry::new(snapshot.player_key.clone(), snapshot.metric_value(metric)))
        .collect()
}

fn validate_player_key(player_key: &str) -> Result<String, DashboardError> {
    let trimmed = player_key.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::Validation(
            "player key must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_ratio(field: &str, value: f64) -> Result<f64, DashboardError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(value)
}

pub struct DashboardServiceBuilder {
    repository: Arc<dyn SnapshotRepository>,
    ladder: Option<TitleLadder>,
    config: ProjectionConfig,
    clock: Arc<dyn Clock>,
}

impl DashboardServiceBuilder {
    fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            repository,
            ladder: None,
            config: ProjectionConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ladder(mut self, ladder: TitleLadder) -> Self {
        self.ladder = Some(ladder);
        self
    }

    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> DashboardService {
        DashboardService {
            repository: self.repository,
            ladder: self
                .ladder
                .unwrap_or_else(|| TitleLadder::standard().clone()),
            projector: TitleProjector::new(self.config),
            clock: self.clock,
        }
    }
}
