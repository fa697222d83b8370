// src/spotify/types.rs — Wire payloads for the upstream Web API

use serde::{Deserialize, Serialize};

/// Read-only projection of what upstream reports is currently playing.
/// Either fully present (authenticated and something is playing) or absent —
/// no partial snapshots reach the UI. Each poll replaces the previous value
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub track_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album_art: Option<String>,
    pub duration_ms: u64,
    pub progress_ms: u64,
    pub is_playing: bool,
    pub volume_percent: Option<u8>,
}

/// Token endpoint response. `refresh_token` is only present when the
/// provider decides to rotate it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub volume_percent: Option<u8>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

// ─── Raw upstream shapes ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlayerState {
    #[serde(default)]
    pub device: Option<RawDevice>,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDevice {
    #[serde(default)]
    pub volume_percent: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<RawArtist>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAlbum {
    #[serde(default)]
    pub images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl PlaybackSnapshot {
    /// A snapshot exists only when upstream reports an actual track; a player
    /// state without an item (private session, podcast gap, idle device)
    /// yields none.
    pub(crate) fn from_player_state(raw: RawPlayerState) -> Option<Self> {
        let item = raw.item?;
        Some(Self {
            track_id: item.id.unwrap_or_default(),
            title: item.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
            album_art: item
                .album
                .and_then(|a| a.images.into_iter().next().map(|i| i.url)),
            duration_ms: item.duration_ms,
            progress_ms: raw.progress_ms.unwrap_or(0),
            is_playing: raw.is_playing,
            volume_percent: raw.device.and_then(|d| d.volume_percent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_full_player_state() {
        let raw: RawPlayerState = serde_json::from_value(serde_json::json!({
            "device": { "volume_percent": 62 },
            "progress_ms": 41_250,
            "is_playing": true,
            "item": {
                "id": "7ouMYWpwJ422jRcDASZB7P",
                "name": "Knights of Cydonia",
                "duration_ms": 366_213,
                "artists": [{ "name": "Muse" }],
                "album": { "images": [{ "url": "https://img.example/a.jpg" }] }
            }
        }))
        .unwrap();

        let snap = PlaybackSnapshot::from_player_state(raw).unwrap();
        assert_eq!(snap.track_id, "7ouMYWpwJ422jRcDASZB7P");
        assert_eq!(snap.artists, vec!["Muse".to_string()]);
        assert_eq!(snap.volume_percent, Some(62));
        assert!(snap.is_playing);
    }

    #[test]
    fn test_no_item_means_no_snapshot() {
        let raw: RawPlayerState = serde_json::from_value(serde_json::json!({
            "is_playing": false
        }))
        .unwrap();
        assert!(PlaybackSnapshot::from_player_state(raw).is_none());
    }
}
