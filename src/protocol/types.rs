//! Typed parameter and result objects used by the client helpers.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize, Serializer};

use crate::identifiers::{PlayerId, PlaylistId};

// ============================================================================
// ActivePlayer
// ============================================================================

/// Entry of the `Player.GetActivePlayers` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlayer {
    /// Player id used as command target.
    #[serde(rename = "playerid")]
    pub player_id: PlayerId,

    /// Media type: `audio`, `video` or `picture`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Player implementation: `internal`, `external` or `remote`.
    #[serde(rename = "playertype", default, skip_serializing_if = "Option::is_none")]
    pub player_type: Option<String>,
}

// ============================================================================
// SeekTime
// ============================================================================

/// Absolute position for `Player.Seek`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl SeekTime {
    /// Splits a position in (fractional) seconds into time components.
    ///
    /// Milliseconds are the truncated fractional part. Negative and non-finite
    /// positions are treated as zero.
    #[must_use]
    pub fn from_seconds(position: f64) -> Self {
        if !position.is_finite() || position <= 0.0 {
            return Self::default();
        }

        let milliseconds = (position.fract() * 1000.0) as u64;
        let whole = position.trunc() as u64;

        Self {
            hours: whole / 3600,
            minutes: (whole / 60) % 60,
            seconds: whole % 60,
            milliseconds,
        }
    }
}

// ============================================================================
// PlayState
// ============================================================================

/// Argument of `Player.PlayPause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Resume playback (`true`).
    Play,
    /// Pause playback (`false`).
    Pause,
    /// Flip the current state (`"toggle"`).
    Toggle,
}

impl Serialize for PlayState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Play => serializer.serialize_bool(true),
            Self::Pause => serializer.serialize_bool(false),
            Self::Toggle => serializer.serialize_str("toggle"),
        }
    }
}

// ============================================================================
// GoTo
// ============================================================================

/// Argument of `Player.GoTo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoTo {
    Next,
    Previous,
}

// ============================================================================
// PlayItem
// ============================================================================

/// Item opened by `Player.Open`, serialized as a single-key object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlayItem {
    /// PVR channel, `{"channelid": id}`.
    #[serde(rename = "channelid")]
    Channel(i64),
    /// Playlist, `{"playlistid": id}`.
    #[serde(rename = "playlistid")]
    Playlist(PlaylistId),
    /// Directory path, `{"directory": path}`.
    #[serde(rename = "directory")]
    Directory(String),
    /// File path or URL, `{"file": path}`.
    #[serde(rename = "file")]
    File(String),
}

// ============================================================================
// PlaylistItem
// ============================================================================

/// Item appended by `Playlist.Add`, serialized as a single-key object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaylistItem {
    /// Library song, `{"songid": id}`.
    #[serde(rename = "songid")]
    Song(i64),
    /// Library album, `{"albumid": id}`.
    #[serde(rename = "albumid")]
    Album(i64),
}

// ============================================================================
// Tests
// ============================================================================
