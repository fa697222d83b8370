// src/spotify/gateway.rs — Remote control gateway
//
// Stateless translator per call: each action kind becomes one upstream HTTP
// call (like is the documented exception — it reads the current track first).
// The only state it touches is the session token pair, via the store.

use async_trait::async_trait;
use reqwest::{Method, Response};
use std::sync::Arc;

use crate::gesture::dispatcher::ControlGateway;
use crate::gesture::mapping::{Action, ActionKind};
use crate::infra::errors::WavectlError;
use crate::session::{ActiveSession, SessionStore};
use crate::snapshot::SnapshotHandle;
use crate::spotify::client::SpotifyClient;
use crate::spotify::types::{
    AuthStatus, Device, PlaybackSnapshot, RawDeviceList, RawPlayerState, RawUser, UserProfile,
};

/// Seek positions are absolute milliseconds, never negative.
pub fn clamp_position(delta: i64) -> u64 {
    delta.max(0) as u64
}

/// Volume is an absolute percent in [0, 100].
pub fn clamp_volume(delta: i64) -> u8 {
    delta.clamp(0, 100) as u8
}

pub struct Gateway {
    client: SpotifyClient,
    sessions: Arc<dyn SessionStore>,
}

impl Gateway {
    pub fn new(client: SpotifyClient, sessions: Arc<dyn SessionStore>) -> Self {
        Self { client, sessions }
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub async fn is_authenticated(&self, sid: &str) -> bool {
        self.sessions.get(sid).await.is_some()
    }

    /// Translate one action into its upstream call. No session means no
    /// upstream call at all.
    pub async fn control(
        &self,
        sid: &str,
        action: &Action,
        device_id: Option<&str>,
    ) -> Result<(), WavectlError> {
        if !self.is_authenticated(sid).await {
            return Err(WavectlError::NotAuthenticated);
        }

        let (method, path) = match action.kind {
            ActionKind::Play => (Method::PUT, play_path(device_id)),
            ActionKind::Pause => (Method::PUT, "me/player/pause".to_string()),
            ActionKind::Next => (Method::POST, "me/player/next".to_string()),
            ActionKind::Previous => (Method::POST, "me/player/previous".to_string()),
            ActionKind::Seek => (
                Method::PUT,
                format!(
                    "me/player/seek?position_ms={}",
                    clamp_position(action.delta.unwrap_or(0))
                ),
            ),
            ActionKind::Volume => (
                Method::PUT,
                format!(
                    "me/player/volume?volume_percent={}",
                    clamp_volume(action.delta.unwrap_or(50))
                ),
            ),
            ActionKind::Like => return self.like_current(sid).await,
            // Toggle semantics are resolved by the dispatcher; a raw
            // play_pause reaching the gateway is a caller bug.
            ActionKind::PlayPause => {
                return Err(WavectlError::UnknownAction("play_pause".into()))
            }
        };

        let res = self
            .client
            .request(self.sessions.as_ref(), sid, method, &path, None)
            .await?;
        ensure_success(res).await
    }

    /// Save the currently playing track to the library. Two upstream calls:
    /// one read to learn the track id, one write.
    async fn like_current(&self, sid: &str) -> Result<(), WavectlError> {
        let snapshot = self.current(sid).await?;
        let track_id = snapshot
            .filter(|s| !s.track_id.is_empty())
            .map(|s| s.track_id)
            .ok_or_else(|| WavectlError::ControlFailed("nothing is playing".into()))?;

        let res = self
            .client
            .request(
                self.sessions.as_ref(),
                sid,
                Method::PUT,
                &format!("me/tracks?ids={track_id}"),
                None,
            )
            .await?;
        ensure_success(res).await
    }

    /// Current playback snapshot, or None when nothing is playing.
    pub async fn current(&self, sid: &str) -> Result<Option<PlaybackSnapshot>, WavectlError> {
        let res = self
            .client
            .request(self.sessions.as_ref(), sid, Method::GET, "me/player", None)
            .await?;

        // 204: no active device, nothing playing
        if res.status().as_u16() == 204 {
            return Ok(None);
        }
        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(WavectlError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        let raw: RawPlayerState = res.json().await?;
        Ok(PlaybackSnapshot::from_player_state(raw))
    }

    /// Authenticated flag plus a best-effort user profile. Profile failures
    /// never turn an authenticated session into an unauthenticated answer.
    pub async fn status(&self, sid: Option<&str>) -> AuthStatus {
        let authenticated = match sid {
            Some(sid) => self.is_authenticated(sid).await,
            None => false,
        };
        if !authenticated {
            return AuthStatus {
                authenticated: false,
                user: None,
            };
        }
        let sid = sid.unwrap();

        let user = match self
            .client
            .request(self.sessions.as_ref(), sid, Method::GET, "me", None)
            .await
        {
            Ok(res) if res.status().is_success() => {
                res.json::<RawUser>().await.ok().map(|u| UserProfile {
                    id: u.id,
                    name: u.display_name,
                })
            }
            _ => None,
        };

        AuthStatus {
            authenticated: true,
            user,
        }
    }

    pub async fn devices(&self, sid: &str) -> Result<Vec<Device>, WavectlError> {
        let res = self
            .client
            .request(
                self.sessions.as_ref(),
                sid,
                Method::GET,
                "me/player/devices",
                None,
            )
            .await?;
        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(WavectlError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        let list: RawDeviceList = res.json().await?;
        Ok(list.devices)
    }

    /// Start playback of a searched track or an explicit URI.
    pub async fn play_track(
        &self,
        sid: &str,
        query: Option<&str>,
        uri: Option<&str>,
        device_id: Option<&str>,
    ) -> Result<(), WavectlError> {
        if !self.is_authenticated(sid).await {
            return Err(WavectlError::NotAuthenticated);
        }

        if let Some(query) = query {
            let q: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("q", query)
                .append_pair("type", "track")
                .append_pair("limit", "1")
                .finish();
            let res = self
                .client
                .request(
                    self.sessions.as_ref(),
                    sid,
                    Method::GET,
                    &format!("search?{q}"),
                    None,
                )
                .await?;
            let data: serde_json::Value = res.json().await?;
            let uri = data["tracks"]["items"][0]["uri"]
                .as_str()
                .ok_or(WavectlError::NoMatch)?
                .to_string();
            return self.play_uri(sid, &uri, device_id).await;
        }

        if let Some(uri) = uri {
            return self.play_uri(sid, uri, device_id).await;
        }

        Err(WavectlError::MissingQueryOrUri)
    }

    async fn play_uri(
        &self,
        sid: &str,
        uri: &str,
        device_id: Option<&str>,
    ) -> Result<(), WavectlError> {
        let body = serde_json::json!({ "uris": [uri] });
        let res = self
            .client
            .request(
                self.sessions.as_ref(),
                sid,
                Method::PUT,
                &play_path(device_id),
                Some(&body),
            )
            .await?;
        ensure_success(res).await
    }
}

fn play_path(device_id: Option<&str>) -> String {
    match device_id {
        Some(id) => format!("me/player/play?device_id={id}"),
        None => "me/player/play".to_string(),
    }
}

async fn ensure_success(res: Response) -> Result<(), WavectlError> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    let message = res.text().await.unwrap_or_default();
    Err(WavectlError::Upstream {
        status: status.as_u16(),
        message,
    })
}

/// The gateway as seen by the gesture pipeline: bound to whichever session is
/// currently active, publishing snapshots into the shared slot.
pub struct BoundGateway {
    gateway: Arc<Gateway>,
    active: ActiveSession,
    snapshot: SnapshotHandle,
}

impl BoundGateway {
    pub fn new(gateway: Arc<Gateway>, active: ActiveSession, snapshot: SnapshotHandle) -> Self {
        Self {
            gateway,
            active,
            snapshot,
        }
    }
}

#[async_trait]
impl ControlGateway for BoundGateway {
    async fn is_authenticated(&self) -> bool {
        match self.active.get().await {
            Some(sid) => self.gateway.is_authenticated(&sid).await,
            None => false,
        }
    }

    async fn dispatch(&self, action: &Action) -> Result<(), WavectlError> {
        let sid = self
            .active
            .get()
            .await
            .ok_or(WavectlError::NotAuthenticated)?;
        self.gateway.control(&sid, action, None).await
    }

    async fn refresh_snapshot(&self) {
        let Some(sid) = self.active.get().await else {
            self.snapshot.replace(None).await;
            return;
        };
        match self.gateway.current(&sid).await {
            Ok(snapshot) => self.snapshot.replace(snapshot).await,
            Err(e) => {
                tracing::debug!("snapshot refresh failed: {e}");
                self.snapshot.replace(None).await;
            }
        }
    }
}
