use axum::{http::StatusCode, response::IntoResponse, routing::get, routing::post, Json, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::feed::{HttpFeed, TleCache};
use crate::propagator::{PropagatorHandle, Sgp4Ephemeris};
use crate::render::{follow, SceneView};

use super::api::error::ErrorResponse;
use super::api::tle as tle_handlers;
use super::api::tracker as tracker_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let feed = HttpFeed::new(&config.feed.url_template, config.feed.timeout)
        .map_err(std::io::Error::other)?;
    let cache = TleCache::with_ttl(feed, config.feed.ttl);
    log::info!(
        "Serving element sets from {} (ttl {})",
        config.feed.url_template,
        humantime::format_duration(cache.ttl())
    );

    let propagator = PropagatorHandle::spawn(Sgp4Ephemeris, config.propagator.settings());
    let scene = Arc::new(Mutex::new(SceneView::new(propagator.subscribe())));
    tokio::spawn(follow(scene.clone(), propagator.subscribe()));

    let state = AppState {
        config: Arc::new(config),
        cache: Arc::new(cache),
        propagator: Arc::new(propagator),
        scene,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(liveness))
        // Feed proxy
        .route("/api/tle", get(tle_handlers::get_default_set))
        .route("/api/tle/{set}", get(tle_handlers::get_set))
        // Tracker API endpoints
        .route("/api/tracker/init", post(tracker_handlers::init))
        .route("/api/tracker/update", post(tracker_handlers::update))
        .route("/api/tracker/config", post(tracker_handlers::config))
        .route("/api/tracker/stop", post(tracker_handlers::stop))
        .route("/api/tracker/buffer", get(tracker_handlers::buffer))
        .route("/api/tracker/positions", get(tracker_handlers::positions))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

async fn liveness() -> &'static str {
    "Orbital element proxy is running"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not_found")))
}
