use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{models::window_since, PlayerSnapshot, RepositoryError};
use crate::numbers;

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn record_snapshot(&self, snapshot: PlayerSnapshot) -> Result<(), RepositoryError>;

    async fn latest_snapshot(
        &self,
        player_key: &str,
    ) -> Result<Option<PlayerSnapshot>, RepositoryError>;

    /// Snapshots at or after `since`, ascending, plus the one immediately
    /// before `since` when there is one.
    async fn snapshots_since(
        &self,
        player_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayerSnapshot>, RepositoryError>;

    /// Most recent snapshot of every player.
    async fn latest_per_player(&self) -> Result<Vec<PlayerSnapshot>, RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
    // player_key -> snapshots sorted by recorded_at
    players: Arc<RwLock<HashMap<String, Vec<PlayerSnapshot>>>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn snapshot_count(&self) -> usize {
        self.players.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    #[instrument(skip(self, snapshot), fields(player_key = %snapshot.player_key))]
    async fn record_snapshot(&self, snapshot: PlayerSnapshot) -> Result<(), RepositoryError> {
        let mut players = self.players.write().await;
        let history = players.entry(snapshot.player_key.clone()).or_default();

        let position = history.partition_point(|existing| existing.recorded_at <= snapshot.recorded_at);
        history.insert(position, snapshot);

        debug!(snapshots = history.len(), "Snapshot recorded in memory");
        Ok(())
    }

    async fn latest_snapshot(
        &self,
        player_key: &str,
    ) -> Result<Option<PlayerSnapshot>, RepositoryError> {
        let players = self.players.read().await;
        Ok(players
            .get(player_key)
            .and_then(|history| history.last())
            .cloned())
    }

    async fn snapshots_since(
        &self,
        player_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        let players = self.players.read().await;
        Ok(players
            .get(player_key)
            .map(|history| window_since(history, since, |snapshot| snapshot.recorded_at).to_vec())
            .unwrap_or_default())
    }

    async fn latest_per_player(&self) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        let players = self.players.read().await;
        Ok(players
            .values()
            .filter_map(|history| history.last().cloned())
            .collect())
    }
}

/// Row of the `player_snapshots` table; magnitudes are stored as decimal text.
#[derive(Debug, FromRow)]
struct SnapshotRow {
    player_key: String,
    recorded_at: DateTime<Utc>,
    soul_eggs: String,
    earnings_bonus: String,
    mystical_egg_ratio: f64,
    jeweled_egg_ratio: f64,
}

impl TryFrom<SnapshotRow> for PlayerSnapshot {
    type Error = RepositoryError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let corrupt = |err: numbers::NumberError| {
            RepositoryError::Corrupt(format!("{} at {}: {}", row.player_key, row.recorded_at, err))
        };

        Ok(PlayerSnapshot {
            soul_eggs: numbers::decode(&row.soul_eggs).map_err(corrupt)?,
            earnings_bonus: numbers::decode(&row.earnings_bonus).map_err(corrupt)?,
            player_key: row.player_key,
            recorded_at: row.recorded_at,
            mystical_egg_ratio: row.mystical_egg_ratio,
            jeweled_egg_ratio: row.jeweled_egg_ratio,
        })
    }
}

fn into_snapshots(rows: Vec<SnapshotRow>) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
    rows.into_iter().map(PlayerSnapshot::try_from).collect()
}

/// PostgreSQL implementation of the snapshot store
pub struct PostgresSnapshotRepository {
    pool: PgPool,
}

impl PostgresSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotRepository for PostgresSnapshotRepository {
    #[instrument(skip(self, snapshot), fields(player_key = %snapshot.player_key))]
    async fn record_snapshot(&self, snapshot: PlayerSnapshot) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO player_snapshots (player_key, recorded_at, soul_eggs, earnings_bonus, mystical_egg_ratio, jeweled_egg_ratio) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(&snapshot.player_key)
        .bind(snapshot.recorded_at)
        .bind(snapshot.soul_eggs.to_string())
        .bind(snapshot.earnings_bonus.to_string())
        .bind(snapshot.mystical_egg_ratio)
        .bind(snapshot.jeweled_egg_ratio)
        .execute(&self.pool)
        .await?;

        debug!("Snapshot recorded in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn latest_snapshot(
        &self,
        player_key: &str,
    ) -> Result<Option<PlayerSnapshot>, RepositoryError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            "SELECT player_key, recorded_at, soul_eggs, earnings_bonus, mystical_egg_ratio, jeweled_egg_ratio FROM player_snapshots WHERE player_key = $1 ORDER BY recorded_at DESC LIMIT 1"
        )
        .bind(player_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlayerSnapshot::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn snapshots_since(
        &self,
        player_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            "(SELECT player_key, recorded_at, soul_eggs, earnings_bonus, mystical_egg_ratio, jeweled_egg_ratio FROM player_snapshots WHERE player_key = $1 AND recorded_at >= $2) \
             UNION ALL \
             (SELECT player_key, recorded_at, soul_eggs, earnings_bonus, mystical_egg_ratio, jeweled_egg_ratio FROM player_snapshots WHERE player_key = $1 AND recorded_at < $2 ORDER BY recorded_at DESC LIMIT 1) \
             ORDER BY recorded_at ASC"
        )
        .bind(player_key)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched snapshot window");
        into_snapshots(rows)
    }

    #[instrument(skip(self))]
    async fn latest_per_player(&self) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            "SELECT DISTINCT ON (player_key) player_key, recorded_at, soul_eggs, earnings_bonus, mystical_egg_ratio, jeweled_egg_ratio FROM player_snapshots ORDER BY player_key, recorded_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        into_snapshots(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbers::Magnitude;
    use chrono::{Duration, TimeZone};

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn snapshot(player_key: &str, hours: i64, earnings_bonus: u64) -> PlayerSnapshot {
        PlayerSnapshot {
            player_key: player_key.to_string(),
            recorded_at: at(hours),
            soul_eggs: Magnitude::from(earnings_bonus / 10),
            earnings_bonus: Magnitude::from(earnings_bonus),
            mystical_egg_ratio: 1.0,
            jeweled_egg_ratio: 2.0,
        }
    }

    #[tokio::test]
    async fn keeps_snapshots_sorted_regardless_of_insert_order() {
        let repo = InMemorySnapshotRepository::new();
        repo.record_snapshot(snapshot("p1", 5, 50)).await.unwrap();
        repo.record_snapshot(snapshot("p1", 1, 10)).await.unwrap();
        repo.record_snapshot(snapshot("p1", 3, 30)).await.unwrap();

        let latest = repo.latest_snapshot("p1").await.unwrap().unwrap();
        assert_eq!(latest.recorded_at, at(5));
        assert_eq!(repo.snapshot_count().await, 3);

        let all = repo.snapshots_since("p1", at(0)).await.unwrap();
        let times: Vec<_> = all.iter().map(|s| s.recorded_at).collect();
        assert_eq!(times, vec![at(1), at(3), at(5)]);
    }

    #[tokio::test]
    async fn window_includes_baseline_before_cutoff() {
        let repo = InMemorySnapshotRepository::new();
        for hours in [0, 10, 20, 30] {
            repo.record_snapshot(snapshot("p1", hours, hours as u64))
                .await
                .unwrap();
        }

        let window = repo.snapshots_since("p1", at(15)).await.unwrap();
        let times: Vec<_> = window.iter().map(|s| s.recorded_at).collect();
        assert_eq!(times, vec![at(10), at(20), at(30)]);
    }

    #[tokio::test]
    async fn unknown_player_has_no_history() {
        let repo = InMemorySnapshotRepository::new();
        assert!(repo.latest_snapshot("ghost").await.unwrap().is_none());
        assert!(repo.snapshots_since("ghost", at(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_per_player_returns_one_entry_each() {
        let repo = InMemorySnapshotRepository::new();
        repo.record_snapshot(snapshot("p1", 1, 10)).await.unwrap();
        repo.record_snapshot(snapshot("p1", 2, 20)).await.unwrap();
        repo.record_snapshot(snapshot("p2", 1, 99)).await.unwrap();

        let mut latest = repo.latest_per_player().await.unwrap();
        latest.sort_by(|a, b| a.player_key.cmp(&b.player_key));

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].earnings_bonus, Magnitude::from(20u64));
        assert_eq!(latest[1].earnings_bonus, Magnitude::from(99u64));
    }

    #[test]
    fn stored_rows_convert_back_to_snapshots() {
        let row = SnapshotRow {
            player_key: "p1".into(),
            recorded_at: at(0),
            soul_eggs: "86035000000000000000".into(),
            earnings_bonus: "1234".into(),
            mystical_egg_ratio: 0.5,
            jeweled_egg_ratio: 0.25,
        };
        let snapshot = PlayerSnapshot::try_from(row).unwrap();
        assert_eq!(snapshot.soul_eggs.to_suffixed(), "86.035Q");

        let broken = SnapshotRow {
            player_key: "p1".into(),
            recorded_at: at(0),
            soul_eggs: "not-a-number".into(),
            earnings_bonus: "1".into(),
            mystical_egg_ratio: 0.0,
            jeweled_egg_ratio: 0.0,
        };
        assert!(matches!(
            PlayerSnapshot::try_from(broken),
            Err(RepositoryError::Corrupt(_))
        ));
    }
}
