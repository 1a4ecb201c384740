//! # animalpics: a small picture service for cats, dogs and bears
//!
//! `animalpics` fetches animal pictures from public image APIs, stores them in SQLite, and serves
//! the most recent one back over a REST API. A tiny embedded web page drives both operations.
//!
//! ## Overview
//!
//! Each animal type has a *primary* upstream API that answers with JSON pointing at a picture,
//! and a *fallback* URL that serves a picture directly. The three primary APIs have nothing in
//! common, so each has its own response parser; whatever goes wrong with a primary, the service
//! quietly uses the fallback instead. Fallbacks are logged at `warn` and counted in
//! `animalpics_image_url_resolutions_total`, so a dead upstream shows up in metrics rather than
//! in user-facing errors.
//!
//! ### Request Flow
//!
//! `POST /api/animalpicture/{animalType}?count=N` validates the request, then hands over to
//! [`acquisition::save_batch`], which repeats *resolve URL, download image, store picture*
//! `N` times, one after another. Each picture is committed on its own. The batch has a
//! deliberately lopsided failure policy: if the very first picture cannot be fetched the request
//! fails, but once one picture is saved a later failure just ends the batch early and the last
//! saved picture is returned.
//!
//! `GET /api/animalpicture/{animalType}/latest` reads the newest stored picture for that type.
//!
//! ### Core Components
//!
//! - **[`acquisition`]**: upstream URL resolution with fallback, image downloads, and the batch
//!   orchestrator
//! - **[`db`]**: the append-only `animal_pictures` table and its repository
//! - **[`api`]**: axum handlers and response models
//! - **[`config`]**: YAML + environment configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use animalpics::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = animalpics::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     animalpics::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The SQLite file is created if missing and migrations run on startup:
//!
//! ```no_run
//! # use sqlx::SqlitePool;
//! # async fn example(pool: SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
//! animalpics::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
mod static_assets;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod test;

use acquisition::{HttpImageSource, ImageSource};
use axum::{
    Json, Router,
    http::HeaderValue,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use config::CorsOrigin;
pub use config::Config;
use openapi::ApiDoc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .image_source(Arc::new(HttpImageSource::new(&config)?))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Where batch saves get their pictures from
    pub image_source: Arc<dyn ImageSource>,
}

/// Get the animalpics database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Build the CORS layer. A `*` entry anywhere in the list allows every origin.
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        return Ok(cors.allow_origin(Any));
    }

    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        if let CorsOrigin::Url(url) = origin {
            // Browsers send the bare origin, without path or trailing slash
            origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
        }
    }

    Ok(cors.allow_origin(origins))
}

/// Build the application router.
///
/// - `/healthz`
/// - `/api/animalpicture/...` picture routes
/// - `/api-docs/openapi.json` and the Scalar UI at `/docs`
/// - `/internal/metrics` when metrics are enabled
/// - embedded UI for everything else
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/animalpicture/{animal_type}", post(api::handlers::animal_pictures::save_pictures))
        .route(
            "/animalpicture/{animal_type}/latest",
            get(api::handlers::animal_pictures::get_latest_picture),
        );

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(api::handlers::static_assets::serve_embedded_asset)
        .with_state(state.clone());

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service: pool, router and configuration.
///
/// 1. **Create**: [`Application::new`] opens the database, runs migrations and builds the router
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: once the shutdown future resolves, in-flight requests finish, then the pool
///    is closed and telemetry flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` if given instead of connecting to `database.url`
    pub async fn new_with_pool(config: Config, pool: Option<SqlitePool>) -> anyhow::Result<Self> {
        debug!("Starting animalpics with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => db::pools::connect(&config.database).await?,
        };
        migrator().run(&pool).await?;

        let image_source: Arc<dyn ImageSource> = Arc::new(HttpImageSource::new(&config)?);
        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .image_source(image_source)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "animalpics listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
