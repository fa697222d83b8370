// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::gesture::vocab::GestureSource;
use crate::spotify::types::PlaybackSnapshot;

/// Body for POST /api/spotify/control.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlRequest {
    pub action: String,
    #[serde(default)]
    pub delta: Option<i64>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Body for POST /api/spotify/play.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Body for POST /api/gesture/event — the HTTP face of the dispatcher.
/// Touch triggers omit confidence; it only matters for camera events.
#[derive(Debug, Clone, Deserialize)]
pub struct GestureEventRequest {
    pub label: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default = "default_source")]
    pub source: GestureSource,
}

fn default_confidence() -> f32 {
    1.0
}

fn default_source() -> GestureSource {
    GestureSource::Touch
}

/// Body for POST /api/gesture/frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: code.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

/// GET /api/spotify/current: a full snapshot when something is playing,
/// `{"playing": false}` otherwise.
#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    pub playing: bool,
    #[serde(flatten)]
    pub snapshot: Option<PlaybackSnapshot>,
}
