// src/api/mod.rs — HTTP surface for the browser front-ends

pub mod handlers;
pub mod types;

use axum::http::{header, HeaderMap, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::classifier::LatestFrame;
use crate::gesture::dispatcher::Dispatcher;
use crate::infra::config::ServerConfig;
use crate::session::ActiveSession;
use crate::snapshot::SnapshotHandle;
use crate::spotify::gateway::Gateway;

/// Name of the session cookie scoping every /api/spotify call.
pub const SID_COOKIE: &str = "wavectl_sid";

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<Gateway>,
    pub dispatcher: Arc<Dispatcher>,
    pub active: ActiveSession,
    pub frames: LatestFrame,
    pub snapshot: SnapshotHandle,
    pub frontend_origin: String,
    /// OAuth state parameter issued by the last /auth/login redirect.
    pub pending_state: Arc<RwLock<Option<String>>>,
}

/// Extract the session id from the request's cookies, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SID_COOKIE).then(|| value.to_string())
    })
}

pub fn session_cookie(sid: &str) -> String {
    format!("{SID_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SID_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Build the axum router with all routes.
pub fn build_router(state: ApiState, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    // Credentialed CORS: explicit origins, no wildcards, cookies allowed.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/auth/login", get(handlers::login))
        .route("/auth/callback", get(handlers::callback))
        .route("/auth/logout", post(handlers::logout))
        .route("/api/health", get(handlers::health))
        .route("/api/spotify/status", get(handlers::status))
        .route("/api/spotify/current", get(handlers::current))
        .route("/api/spotify/control", post(handlers::control))
        .route("/api/spotify/play", post(handlers::play))
        .route("/api/spotify/devices", get(handlers::devices))
        .route("/api/gesture/event", post(handlers::gesture_event))
        .route("/api/gesture/frame", post(handlers::gesture_frame))
        .layer(cors)
        .with_state(state)
}

/// Start the API server (blocking).
pub async fn start_server(
    state: ApiState,
    server: &ServerConfig,
) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", server.port);
    let router = build_router(state, server);

    tracing::info!("wavectl listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
