use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use sheet_yield::profile::ProfileCatalog;
use sheet_yield::request::{YieldRequest, YieldResponse, compute_for_request};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

struct Config {
    port: String,
    log_file: String,
    profiles_path: Option<String>,
    sentry_dsn: Option<String>,
}

impl Config {
    fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").unwrap_or_else(|_| "3001".to_string()),
            log_file: std::env::var("LOG_FILE").unwrap_or_else(|_| "development.log".to_string()),
            profiles_path: std::env::var("PRINTER_PROFILES").ok(),
            sentry_dsn: std::env::var("SENTRY_DSN").ok().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone)]
struct AppState {
    profiles: Arc<ProfileCatalog>,
}

async fn compute(
    State(state): State<AppState>,
    Json(req): Json<YieldRequest>,
) -> Result<Json<YieldResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /yield"
    );

    let response = compute_for_request(&req, &state.profiles).map_err(|e| {
        let status = e.status();
        tracing::info!(%status, error = %e, "rejected yield request");
        (status, e.to_string())
    })?;

    tracing::info!(
        quantity = response.quantity,
        orientation = %response.orientation,
        waste = response.waste_percentage,
        "computed yield"
    );
    Ok(Json(response))
}

async fn profiles(State(state): State<AppState>) -> Json<ProfileCatalog> {
    Json(state.profiles.as_ref().clone())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/profiles", get(profiles))
        .route("/yield", post(compute))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let catalog = match &config.profiles_path {
        Some(path) => ProfileCatalog::load(path)?,
        None => ProfileCatalog::default(),
    };
    tracing::info!(profiles = catalog.len(), "loaded printer profiles");

    let state = AppState {
        profiles: Arc::new(catalog),
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
