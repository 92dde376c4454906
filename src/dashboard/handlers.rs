use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    service::DEFAULT_GROWTH_DAYS,
    types::{GrowthQuery, GrowthReport, MetricNeighbors, SnapshotRequest, TitleReport},
};
use crate::history::PlayerSnapshot;
use crate::projection::TitleProjection;
use crate::ranking::{Metric, MetricValue, RankedEntry, RankingInterpolator};
use crate::shared::{AppError, AppState};

/// HTTP handler for recording a player snapshot
///
/// POST /players/:key/snapshots
#[instrument(name = "record_snapshot", skip(state, payload))]
pub async fn record_snapshot(
    State(state): State<AppState>,
    Path(player_key): Path<String>,
    payload: Result<Json<SnapshotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerSnapshot>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let snapshot = state.dashboard.record_snapshot(&player_key, request).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /players/:key/title
#[instrument(name = "title_progress", skip(state))]
pub async fn title_progress(
    State(state): State<AppState>,
    Path(player_key): Path<String>,
) -> Result<Json<TitleReport>, AppError> {
    let report = state.dashboard.title_progress(&player_key).await?;
    info!(tier = %report.progress.current_tier, "Title progress served");
    Ok(Json(report))
}

/// GET /players/:key/projection
#[instrument(name = "projection", skip(state))]
pub async fn projection(
    State(state): State<AppState>,
    Path(player_key): Path<String>,
) -> Result<Json<TitleProjection>, AppError> {
    Ok(Json(state.dashboard.projection(&player_key).await?))
}

/// GET /players/:key/growth?days=N&metric=soul_eggs
#[instrument(name = "growth", skip(state))]
pub async fn growth(
    State(state): State<AppState>,
    Path(player_key): Path<String>,
    Query(query): Query<GrowthQuery>,
) -> Result<Json<GrowthReport>, AppError> {
    let report = state
        .dashboard
        .growth(
            &player_key,
            query.metric.unwrap_or(Metric::SoulEggs),
            query.days.unwrap_or(DEFAULT_GROWTH_DAYS),
        )
        .await?;
    Ok(Json(report))
}

/// GET /players/:key/neighbors
#[instrument(name = "neighbors", skip(state))]
pub async fn neighbors(
    State(state): State<AppState>,
    Path(player_key): Path<String>,
) -> Result<Json<Vec<MetricNeighbors>>, AppError> {
    Ok(Json(state.dashboard.neighbors(&player_key).await?))
}

/// GET /rankings/:metric
#[instrument(name = "ranking", skip(state))]
pub async fn ranking(
    State(state): State<AppState>,
    Path(metric): Path<Metric>,
) -> Result<Json<Vec<RankedEntry<MetricValue>>>, AppError> {
    let entries = state.dashboard.rank_snapshot(metric).await?;
    Ok(Json(RankingInterpolator::rank(&entries)))
}
