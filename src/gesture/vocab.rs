// src/gesture/vocab.rs — Fixed gesture vocabulary
//
// Labels arrive as strings from two recognizers: the touch layer (discrete UI
// triggers) and the camera-frame classifier. Anything outside this vocabulary
// is dropped at the dispatch boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    // Right-hand camera gestures
    PlayRight,
    PauseRight,
    NextRight,
    PreviousRight,
    // Left-hand camera gestures
    VolumeUpLeft,
    VolumeDownLeft,
    LikeLeft,
    Skip30Left,
    // Touch gestures
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Tap,
    DoubleTap,
}

impl GestureLabel {
    pub const ALL: &'static [GestureLabel] = &[
        GestureLabel::PlayRight,
        GestureLabel::PauseRight,
        GestureLabel::NextRight,
        GestureLabel::PreviousRight,
        GestureLabel::VolumeUpLeft,
        GestureLabel::VolumeDownLeft,
        GestureLabel::LikeLeft,
        GestureLabel::Skip30Left,
        GestureLabel::SwipeLeft,
        GestureLabel::SwipeRight,
        GestureLabel::SwipeUp,
        GestureLabel::SwipeDown,
        GestureLabel::Tap,
        GestureLabel::DoubleTap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::PlayRight => "play_right",
            GestureLabel::PauseRight => "pause_right",
            GestureLabel::NextRight => "next_right",
            GestureLabel::PreviousRight => "previous_right",
            GestureLabel::VolumeUpLeft => "volume_up_left",
            GestureLabel::VolumeDownLeft => "volume_down_left",
            GestureLabel::LikeLeft => "like_left",
            GestureLabel::Skip30Left => "skip30_left",
            GestureLabel::SwipeLeft => "swipe_left",
            GestureLabel::SwipeRight => "swipe_right",
            GestureLabel::SwipeUp => "swipe_up",
            GestureLabel::SwipeDown => "swipe_down",
            GestureLabel::Tap => "tap",
            GestureLabel::DoubleTap => "double_tap",
        }
    }
}

impl FromStr for GestureLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GestureLabel::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureSource {
    Touch,
    Camera,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_labels_roundtrip() {
        for label in GestureLabel::ALL {
            assert_eq!(label.as_str().parse::<GestureLabel>(), Ok(*label));
        }
    }

    #[test]
    fn test_unknown_labels_rejected() {
        assert!("moonwalk".parse::<GestureLabel>().is_err());
        assert!("".parse::<GestureLabel>().is_err());
        assert!("none".parse::<GestureLabel>().is_err());
        // Case matters: recognizers emit lowercase
        assert!("Tap".parse::<GestureLabel>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for label in GestureLabel::ALL {
            let json = serde_json::to_string(label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }
}
