// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub spotify: SpotifyConfig,

    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Origins allowed by the CORS layer.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Where /auth/callback redirects the browser after a successful login.
    pub frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_origins: default_cors_origins(),
            frontend_origin: "http://127.0.0.1:5500".into(),
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://127.0.0.1:5500".into(),
        "http://localhost:5500".into(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/auth/callback".into()
}

impl SpotifyConfig {
    /// Environment variables win over the config file so secrets can stay
    /// out of it entirely.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SPOTIFY_CLIENT_ID") {
            self.client_id = v;
        }
        if let Ok(v) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            self.client_secret = v;
        }
        if let Ok(v) = std::env::var("SPOTIFY_REDIRECT_URI") {
            self.redirect_uri = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Minimum time between two accepted gestures, in milliseconds.
    pub cooldown_ms: u64,
    /// Confidence floor for camera-sourced events (touch bypasses it).
    pub confidence_threshold: f32,
    /// Delay before the post-command snapshot refresh, letting upstream
    /// state settle.
    pub snapshot_settle_ms: u64,
    /// How long an acknowledgment stays live before auto-dismissing.
    pub ack_ttl_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1_000,
            confidence_threshold: 0.3,
            snapshot_settle_ms: 500,
            ack_ttl_ms: 1_500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub enabled: bool,
    /// Frame classification tick, in milliseconds. At most one request is in
    /// flight; ticks that land during an outstanding request are skipped.
    pub poll_interval_ms: u64,
    /// External gesture classifier endpoint.
    pub classifier_url: String,
    /// How often the now-playing snapshot is re-polled, in milliseconds.
    pub snapshot_poll_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 500,
            classifier_url: "http://127.0.0.1:5000/api/gesture/predict".into(),
            snapshot_poll_ms: 2_000,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.spotify.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Effective configuration with secrets blanked, for `wavectl config`.
    pub fn redacted(&self) -> Config {
        let mut c = self.clone();
        if !c.spotify.client_secret.is_empty() {
            c.spotify.client_secret = "<redacted>".into();
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.server.port, 3000);
        assert_eq!(c.gesture.cooldown_ms, 1_000);
        assert!((c.gesture.confidence_threshold - 0.3).abs() < 1e-6);
        assert_eq!(c.gesture.snapshot_settle_ms, 500);
        assert_eq!(c.gesture.ack_ttl_ms, 1_500);
        assert_eq!(c.camera.poll_interval_ms, 500);
        assert!(c.camera.enabled);
        assert_eq!(c.spotify.redirect_uri, default_redirect_uri());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let c: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            frontend_origin = "http://localhost:4000"

            [gesture]
            cooldown_ms = 250
            confidence_threshold = 0.6
            snapshot_settle_ms = 500
            ack_ttl_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(c.server.port, 8080);
        assert_eq!(c.gesture.cooldown_ms, 250);
        // Untouched sections fall back wholesale
        assert_eq!(c.camera.poll_interval_ms, 500);
        assert_eq!(c.spotify.redirect_uri, default_redirect_uri());
    }

    #[test]
    fn test_redacted_hides_secret() {
        let mut c = Config::default();
        c.spotify.client_secret = "hunter2".into();
        assert_eq!(c.redacted().spotify.client_secret, "<redacted>");
    }
}
