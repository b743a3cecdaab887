use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod config;
mod error;
mod generator;
mod models;
mod store;

use config::Config;
use error::AppError;
use generator::CodeGenerator;
use models::*;
use store::CodeStore;

#[derive(Clone)]
pub struct AppState {
    store: CodeStore,
    generator: CodeGenerator,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let db = SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState {
        store: CodeStore::new(db),
        generator: CodeGenerator::new(config.alphabet.clone()),
    };

    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/generate", post(generate_codes))
        .route("/records/:username", get(get_record))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "codebatch".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Generates a batch of codes; when a username is supplied, the batch is
/// append-merged into that user's persistent record.
async fn generate_codes(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let length = payload.length.resolve("length")?;
    let count = payload.count.resolve("count")?;

    let codes = state.generator.generate_batch(length, count);

    let record = match payload.username.as_deref() {
        Some(username) if !username.is_empty() => Some(
            state
                .store
                .merge_and_persist(username, &codes, length as i64, count as i64)
                .await?,
        ),
        _ => None,
    };

    Ok(Json(GenerateResponse { codes, record }))
}

async fn get_record(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.fetch(&username).await? {
        Some(record) => Ok(Json(record)),
        None => Err(AppError::NotFound(format!("no record for {username}"))),
    }
}
