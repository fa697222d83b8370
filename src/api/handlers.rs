// src/api/handlers.rs

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::{session_cookie, session_id, types::*, ApiState, expired_session_cookie};
use crate::auth;
use crate::gesture::mapping::{Action, ActionKind};
use crate::infra::errors::WavectlError;
use crate::session::Session;

/// GET /auth/login — 302 to the provider's authorize page.
pub async fn login(State(state): State<ApiState>) -> Response {
    let oauth_state = auth::random_state();
    *state.pending_state.write().await = Some(oauth_state.clone());

    let url = auth::authorize_url(
        state.gateway.client().accounts_base(),
        state.gateway.client().config(),
        &oauth_state,
    );
    (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /auth/callback — code exchange, session creation, 302 back to the app.
pub async fn callback(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if query.error.is_some() || query.code.is_none() {
        return (StatusCode::BAD_REQUEST, "Spotify auth failed.").into_response();
    }

    // Reject a callback that doesn't match the state we issued.
    let expected = state.pending_state.write().await.take();
    if expected.is_some() && expected != query.state {
        return (StatusCode::BAD_REQUEST, "OAuth state mismatch.").into_response();
    }

    let grant = match state
        .gateway
        .client()
        .exchange_code(query.code.as_deref().unwrap_or_default())
        .await
    {
        Ok(grant) => grant,
        Err(e) => {
            tracing::error!("code exchange failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Token exchange failed.").into_response();
        }
    };

    let sid = session_id(&headers).unwrap_or_else(auth::mint_session_id);
    state
        .gateway
        .sessions()
        .set(
            &sid,
            Session {
                access_token: grant.access_token,
                refresh_token: grant.refresh_token.unwrap_or_default(),
            },
        )
        .await;
    state.active.set(&sid).await;
    tracing::info!("session authenticated");

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, state.frontend_origin.clone()),
            (header::SET_COOKIE, session_cookie(&sid)),
        ],
    )
        .into_response()
}

/// POST /auth/logout — destroy the session.
pub async fn logout(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    if let Some(sid) = session_id(&headers) {
        state.gateway.sessions().clear(&sid).await;
        state.active.clear_if(&sid).await;
        state.snapshot.replace(None).await;
    }
    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(OkResponse::ok()),
    )
        .into_response()
}

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/spotify/status — authenticated flag plus best-effort profile.
pub async fn status(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let sid = session_id(&headers);
    Json(state.gateway.status(sid.as_deref()).await).into_response()
}

/// GET /api/spotify/current — playback snapshot or `{playing: false}`.
pub async fn current(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let Some(sid) = authenticated_sid(&state, &headers).await else {
        return control_error(WavectlError::NotAuthenticated);
    };

    match state.gateway.current(&sid).await {
        Ok(snapshot) => Json(CurrentResponse {
            playing: snapshot.as_ref().is_some_and(|s| s.is_playing),
            snapshot,
        })
        .into_response(),
        Err(e) => control_error(e),
    }
}

/// POST /api/spotify/control — one playback command.
pub async fn control(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<ControlRequest>,
) -> Response {
    let Some(sid) = authenticated_sid(&state, &headers).await else {
        return control_error(WavectlError::NotAuthenticated);
    };

    let Ok(kind) = body.action.parse::<ActionKind>() else {
        return control_error(WavectlError::UnknownAction(body.action));
    };
    let action = Action {
        kind,
        delta: body.delta,
    };

    match state
        .gateway
        .control(&sid, &action, body.device_id.as_deref())
        .await
    {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(e) => {
            tracing::warn!(action = %action.kind, "control failed: {e}");
            control_error(e)
        }
    }
}

/// POST /api/spotify/play — search-and-play or play an explicit URI.
pub async fn play(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<PlayRequest>,
) -> Response {
    let Some(sid) = authenticated_sid(&state, &headers).await else {
        return play_error(WavectlError::NotAuthenticated);
    };

    match state
        .gateway
        .play_track(
            &sid,
            body.query.as_deref(),
            body.uri.as_deref(),
            body.device_id.as_deref(),
        )
        .await
    {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(e) => {
            tracing::warn!("play failed: {e}");
            play_error(e)
        }
    }
}

/// GET /api/spotify/devices
pub async fn devices(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    let Some(sid) = authenticated_sid(&state, &headers).await else {
        return control_error(WavectlError::NotAuthenticated);
    };

    match state.gateway.devices(&sid).await {
        Ok(devices) => Json(serde_json::json!({ "devices": devices })).into_response(),
        Err(e) => control_error(e),
    }
}

/// POST /api/gesture/event — feed one recognized gesture to the dispatcher.
/// The dispatcher applies its own gates; this always answers 200.
pub async fn gesture_event(
    State(state): State<ApiState>,
    Json(body): Json<GestureEventRequest>,
) -> Json<AcceptedResponse> {
    let accepted = state
        .dispatcher
        .handle(&body.label, body.confidence, body.source)
        .await;
    Json(AcceptedResponse { accepted })
}

/// POST /api/gesture/frame — stash the newest camera frame for the poll loop.
pub async fn gesture_frame(
    State(state): State<ApiState>,
    Json(body): Json<FrameRequest>,
) -> (StatusCode, Json<OkResponse>) {
    state.frames.put(body.image).await;
    (StatusCode::ACCEPTED, Json(OkResponse::ok()))
}

/// The session id from the cookie, but only when a live session backs it.
async fn authenticated_sid(state: &ApiState, headers: &HeaderMap) -> Option<String> {
    let sid = session_id(headers)?;
    state
        .gateway
        .is_authenticated(&sid)
        .await
        .then_some(sid)
}

fn control_error(e: WavectlError) -> Response {
    error_response(e, "CONTROL_FAILED")
}

fn play_error(e: WavectlError) -> Response {
    error_response(e, "PLAY_FAILED")
}

/// Map an error to its wire code and HTTP status. `fallback` replaces the
/// generic CONTROL_FAILED code so /play surfaces PLAY_FAILED instead.
fn error_response(e: WavectlError, fallback: &str) -> Response {
    let code = match e.code() {
        "CONTROL_FAILED" => fallback,
        code => code,
    };
    let status = match &e {
        _ if e.is_auth() => StatusCode::UNAUTHORIZED,
        WavectlError::UnknownAction(_) | WavectlError::MissingQueryOrUri => {
            StatusCode::BAD_REQUEST
        }
        WavectlError::NoMatch => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(code))).into_response()
}
