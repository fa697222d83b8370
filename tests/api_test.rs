// tests/api_test.rs — Router-level tests, one request per assertion via
// tower's oneshot. The upstream base points at a closed local port, so any
// request that escapes the auth gates fails fast with a connect error.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use wavectl::api::{build_router, ApiState};
use wavectl::classifier::LatestFrame;
use wavectl::gesture::dispatcher::{ControlGateway, Dispatcher};
use wavectl::gesture::feedback::{self, FeedbackReceiver};
use wavectl::infra::config::{GestureConfig, ServerConfig, SpotifyConfig};
use wavectl::session::{ActiveSession, MemorySessionStore, Session, SessionStore};
use wavectl::snapshot::SnapshotHandle;
use wavectl::spotify::{BoundGateway, Gateway, SpotifyClient};

struct Fixture {
    router: Router,
    sessions: Arc<dyn SessionStore>,
    active: ActiveSession,
    frames: LatestFrame,
    _feedback: FeedbackReceiver,
}

fn fixture() -> Fixture {
    let spotify = SpotifyConfig {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        redirect_uri: "http://localhost:3000/auth/callback".into(),
    };
    // Nothing listens on port 9; calls that reach upstream fail to connect.
    let client = SpotifyClient::with_base_urls(
        spotify,
        "http://127.0.0.1:9/v1".into(),
        "http://127.0.0.1:9".into(),
    );

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let gateway = Arc::new(Gateway::new(client, Arc::clone(&sessions)));
    let active = ActiveSession::new();
    let snapshot = SnapshotHandle::new();
    let bound: Arc<dyn ControlGateway> = Arc::new(BoundGateway::new(
        Arc::clone(&gateway),
        active.clone(),
        snapshot.clone(),
    ));

    let (tx, rx) = feedback::channel(Duration::from_millis(1_500));
    let dispatcher = Arc::new(Dispatcher::new(
        bound,
        tx,
        snapshot.clone(),
        &GestureConfig::default(),
    ));

    let frames = LatestFrame::new();
    let state = ApiState {
        gateway,
        dispatcher,
        active: active.clone(),
        frames: frames.clone(),
        snapshot,
        frontend_origin: "http://127.0.0.1:5500".into(),
        pending_state: Arc::new(tokio::sync::RwLock::new(None)),
    };

    Fixture {
        router: build_router(state, &ServerConfig::default()),
        sessions,
        active,
        frames,
        _feedback: rx,
    }
}

async fn login(fx: &Fixture, sid: &str) {
    fx.sessions
        .set(
            sid,
            Session {
                access_token: "tok".into(),
                refresh_token: "refresh".into(),
            },
        )
        .await;
    fx.active.set(sid).await;
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sid) = cookie {
        req = req.header(header::COOKIE, format!("wavectl_sid={sid}"));
    }
    req.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_answers_ok() {
    let fx = fixture();
    let res = fx.router.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_control_without_session_is_401() {
    let fx = fixture();
    let res = fx
        .router
        .oneshot(post_json("/api/spotify/control", None, json!({"action": "next"})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body["error"], "NOT_AUTHENTICATED");
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_control_with_stale_cookie_is_401() {
    let fx = fixture();
    // A cookie whose session was never created (or already destroyed)
    let res = fx
        .router
        .oneshot(post_json(
            "/api/spotify/control",
            Some("ghost"),
            json!({"action": "next"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_action_is_400_before_upstream() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .oneshot(post_json(
            "/api/spotify/control",
            Some("sid-1"),
            json!({"action": "teleport"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "UNKNOWN_ACTION");
}

#[tokio::test]
async fn test_raw_play_pause_action_is_rejected() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .oneshot(post_json(
            "/api/spotify/control",
            Some("sid-1"),
            json!({"action": "play_pause"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "UNKNOWN_ACTION");
}

#[tokio::test]
async fn test_unreachable_upstream_surfaces_control_failed() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .oneshot(post_json(
            "/api/spotify/control",
            Some("sid-1"),
            json!({"action": "next"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body["error"], "CONTROL_FAILED");
}

#[tokio::test]
async fn test_play_without_query_or_uri_is_400() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .oneshot(post_json("/api/spotify/play", Some("sid-1"), json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "MISSING_QUERY_OR_URI");
}

#[tokio::test]
async fn test_current_without_session_is_401() {
    let fx = fixture();
    let res = fx.router.oneshot(get("/api/spotify/current")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_without_session_reports_unauthenticated() {
    let fx = fixture();
    let res = fx.router.oneshot(get("/api/spotify/status")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn test_login_redirects_to_authorize_page() {
    let fx = fixture();
    let res = fx.router.oneshot(get("/auth/login")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);

    let location = res
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.contains("/authorize"));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_callback_with_provider_error_is_400() {
    let fx = fixture();
    let res = fx
        .router
        .oneshot(get("/auth/callback?error=access_denied"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_destroys_session_and_expires_cookie() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .clone()
        .oneshot(post_json("/auth/logout", Some("sid-1"), json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    assert!(fx.sessions.get("sid-1").await.is_none());
    assert!(fx.active.get().await.is_none());

    // A control call after logout is back to unauthenticated
    let res = fx
        .router
        .oneshot(post_json(
            "/api/spotify/control",
            Some("sid-1"),
            json!({"action": "next"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gesture_event_with_unknown_label_not_accepted() {
    let fx = fixture();
    login(&fx, "sid-1").await;

    let res = fx
        .router
        .oneshot(post_json(
            "/api/gesture/event",
            None,
            json!({"label": "moonwalk"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_gesture_event_without_active_session_not_accepted() {
    let fx = fixture();
    // Valid label, but nobody is logged in
    let res = fx
        .router
        .oneshot(post_json(
            "/api/gesture/event",
            None,
            json!({"label": "swipe_left", "confidence": 0.9, "source": "camera"}),
        ))
        .await
        .unwrap();
    let body = body_json(res).await;
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_gesture_frame_is_stashed_for_the_poll_loop() {
    let fx = fixture();
    let res = fx
        .router
        .oneshot(post_json(
            "/api/gesture/frame",
            None,
            json!({"image": "base64-frame-data"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(fx.frames.take().await.as_deref(), Some("base64-frame-data"));
}

#[tokio::test]
async fn test_newest_frame_replaces_older_one() {
    let fx = fixture();
    for image in ["frame-1", "frame-2"] {
        let res = fx
            .router
            .clone()
            .oneshot(post_json("/api/gesture/frame", None, json!({"image": image})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }
    assert_eq!(fx.frames.take().await.as_deref(), Some("frame-2"));
    assert!(fx.frames.take().await.is_none());
}
