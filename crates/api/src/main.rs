use std::sync::Arc;

use portal_api::app::build_router;
use portal_api::auth::JwtService;
use portal_api::config::AppConfig;
use portal_api::gql::build_schema;
use portal_api::services::spawn_mirror_worker;
use portal_api::sheets::{GoogleSheets, SheetMirror};
use portal_api::state::AppState;
use portal_infra::db;
use portal_infra::store::PgStore;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = PgPool::connect(&config.database_url).await?;
    tracing::info!("Connected to Postgres");
    db::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let store = Arc::new(PgStore::new(pool));
    let mut state = AppState::new(store, JwtService::new(&config.jwt_secret))
        .with_max_coaches(config.max_coaches);

    if let Some(sheets_config) = &config.sheets {
        let client = GoogleSheets::new(sheets_config)?;
        let mirror = SheetMirror::new(Arc::new(client));
        let (handle, _worker) = spawn_mirror_worker(mirror.clone());
        state = state.with_mirror(handle).with_sheets(mirror);
        tracing::info!(spreadsheet_id = %sheets_config.spreadsheet_id, "Spreadsheet mirror enabled");
    }

    let schema = build_schema(state.clone());
    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
