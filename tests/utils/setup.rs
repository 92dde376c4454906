#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use eggdash::{
    app,
    dashboard::FixedClock,
    history::{InMemorySnapshotRepository, SnapshotRepository},
    AppState, DashboardService, ProjectionConfig,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub clock: Arc<FixedClock>,
    pub started_at: DateTime<Utc>,
}

pub struct TestSetupBuilder {
    repository: Option<Arc<dyn SnapshotRepository>>,
    config: ProjectionConfig,
    started_at: DateTime<Utc>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            config: ProjectionConfig::default(),
            started_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn with_repository(mut self, repository: Arc<dyn SnapshotRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemorySnapshotRepository::new()));
        let clock = Arc::new(FixedClock::new(self.started_at));
        let dashboard = DashboardService::builder(repository)
            .with_config(self.config)
            .with_clock(clock.clone())
            .build();

        TestSetup {
            router: app::router(AppState::new(Arc::new(dashboard))),
            clock,
            started_at: self.started_at,
        }
    }
}

impl TestSetup {
    /// Moves the clock to `days` after the start of the test.
    pub fn advance_to_day(&self, days: i64) {
        self.clock.set(self.started_at + Duration::days(days));
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Records a snapshot at the current clock time.
    pub async fn record(&self, player: &str, soul_eggs: &str, earnings_bonus: &str) -> Value {
        let (status, body) = self
            .post(
                &format!("/players/{}/snapshots", player),
                json!({
                    "soul_eggs": soul_eggs,
                    "earnings_bonus": earnings_bonus,
                    "mystical_egg_ratio": 0.5,
                    "jeweled_egg_ratio": 0.1,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected response {}", body);
        body
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}
