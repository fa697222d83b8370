// src/gesture/mapping.rs — Label-to-action table and toggle resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::gesture::vocab::GestureLabel;
use crate::spotify::types::PlaybackSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Play,
    Pause,
    Next,
    Previous,
    Seek,
    Volume,
    Like,
    /// Toggle semantics: resolved to Play or Pause at dispatch time against
    /// the latest snapshot. Never sent upstream as-is.
    PlayPause,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Play => "play",
            ActionKind::Pause => "pause",
            ActionKind::Next => "next",
            ActionKind::Previous => "previous",
            ActionKind::Seek => "seek",
            ActionKind::Volume => "volume",
            ActionKind::Like => "like",
            ActionKind::PlayPause => "play_pause",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(ActionKind::Play),
            "pause" => Ok(ActionKind::Pause),
            "next" => Ok(ActionKind::Next),
            "previous" => Ok(ActionKind::Previous),
            "seek" => Ok(ActionKind::Seek),
            "volume" => Ok(ActionKind::Volume),
            "like" => Ok(ActionKind::Like),
            "play_pause" => Ok(ActionKind::PlayPause),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract playback command, independent of how it was triggered.
/// Immutable once constructed; handed to the gateway exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Seek position in ms or volume percent. Clamping happens at the
    /// gateway, right before the upstream call.
    pub delta: Option<i64>,
}

impl Action {
    pub fn of(kind: ActionKind) -> Self {
        Self { kind, delta: None }
    }

    pub fn with_delta(kind: ActionKind, delta: i64) -> Self {
        Self {
            kind,
            delta: Some(delta),
        }
    }
}

/// The static gesture-to-action table, expressed over the tagged enum so no
/// string literals leak into dispatch logic. Total over the vocabulary.
pub fn action_for(label: GestureLabel) -> Action {
    match label {
        GestureLabel::PlayRight => Action::of(ActionKind::Play),
        GestureLabel::PauseRight => Action::of(ActionKind::Pause),
        GestureLabel::NextRight | GestureLabel::SwipeRight | GestureLabel::DoubleTap => {
            Action::of(ActionKind::Next)
        }
        GestureLabel::PreviousRight | GestureLabel::SwipeLeft => Action::of(ActionKind::Previous),
        GestureLabel::VolumeUpLeft => Action::with_delta(ActionKind::Volume, 10),
        GestureLabel::VolumeDownLeft | GestureLabel::SwipeDown => {
            Action::with_delta(ActionKind::Volume, -10)
        }
        GestureLabel::LikeLeft => Action::of(ActionKind::Like),
        GestureLabel::Skip30Left => Action::with_delta(ActionKind::Seek, 30_000),
        GestureLabel::SwipeUp | GestureLabel::Tap => Action::of(ActionKind::PlayPause),
    }
}

/// Resolve toggle semantics against the last known snapshot: pause when
/// something is playing, play otherwise — including when no snapshot exists.
/// Non-toggle actions pass through untouched.
pub fn resolve_toggle(action: Action, snapshot: Option<&PlaybackSnapshot>) -> Action {
    if action.kind != ActionKind::PlayPause {
        return action;
    }
    if snapshot.is_some_and(|s| s.is_playing) {
        Action::of(ActionKind::Pause)
    } else {
        Action::of(ActionKind::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(is_playing: bool) -> PlaybackSnapshot {
        PlaybackSnapshot {
            track_id: "t1".into(),
            title: "Song".into(),
            artists: vec!["Artist".into()],
            album_art: None,
            duration_ms: 200_000,
            progress_ms: 10_000,
            is_playing,
            volume_percent: Some(50),
        }
    }

    #[test]
    fn test_swipe_left_maps_to_previous() {
        assert_eq!(
            action_for(GestureLabel::SwipeLeft),
            Action::of(ActionKind::Previous)
        );
    }

    #[test]
    fn test_camera_volume_and_seek_carry_deltas() {
        assert_eq!(
            action_for(GestureLabel::VolumeUpLeft).delta,
            Some(10),
        );
        assert_eq!(
            action_for(GestureLabel::Skip30Left),
            Action::with_delta(ActionKind::Seek, 30_000)
        );
    }

    #[test]
    fn test_toggle_pauses_when_playing() {
        let action = resolve_toggle(action_for(GestureLabel::Tap), Some(&snapshot(true)));
        assert_eq!(action.kind, ActionKind::Pause);
    }

    #[test]
    fn test_toggle_plays_when_paused() {
        let action = resolve_toggle(action_for(GestureLabel::SwipeUp), Some(&snapshot(false)));
        assert_eq!(action.kind, ActionKind::Play);
    }

    #[test]
    fn test_toggle_plays_with_no_snapshot() {
        let action = resolve_toggle(action_for(GestureLabel::Tap), None);
        assert_eq!(action.kind, ActionKind::Play);
    }

    #[test]
    fn test_non_toggle_untouched_by_resolution() {
        let seek = Action::with_delta(ActionKind::Seek, -500);
        assert_eq!(resolve_toggle(seek, Some(&snapshot(true))), seek);
    }

    #[test]
    fn test_action_kind_parse_rejects_garbage() {
        assert!("rewind".parse::<ActionKind>().is_err());
        assert_eq!("play_pause".parse::<ActionKind>(), Ok(ActionKind::PlayPause));
    }
}
