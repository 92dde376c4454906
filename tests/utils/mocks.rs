//! Repository doubles for exercising error paths
#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use eggdash::history::{PlayerSnapshot, RepositoryError, SnapshotRepository};

/// Store whose every call fails like an unreachable database.
pub struct FailingSnapshotRepository;

fn unavailable() -> RepositoryError {
    RepositoryError::Database("connection refused".to_string())
}

#[async_trait]
impl SnapshotRepository for FailingSnapshotRepository {
    async fn record_snapshot(&self, _snapshot: PlayerSnapshot) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn latest_snapshot(
        &self,
        _player_key: &str,
    ) -> Result<Option<PlayerSnapshot>, RepositoryError> {
        Err(unavailable())
    }

    async fn snapshots_since(
        &self,
        _player_key: &str,
        _since: DateTime<Utc>,
    ) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        Err(unavailable())
    }

    async fn latest_per_player(&self) -> Result<Vec<PlayerSnapshot>, RepositoryError> {
        Err(unavailable())
    }
}
