use eggdash::{
    app,
    history::{InMemorySnapshotRepository, PostgresSnapshotRepository, SnapshotRepository},
    AppConfig, AppState, DashboardService, ProjectionConfig,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eggdash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting eggdash server");

    let config = AppConfig::from_env();
    let projection = ProjectionConfig::from_env();
    info!(?projection, "Projection settings");

    let repository: Arc<dyn SnapshotRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Using PostgreSQL snapshot store");
            Arc::new(PostgresSnapshotRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, keeping snapshots in memory");
            Arc::new(InMemorySnapshotRepository::new())
        }
    };

    let dashboard = DashboardService::builder(repository)
        .with_config(projection)
        .build();
    let app = app::router(AppState::new(Arc::new(dashboard)));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}
