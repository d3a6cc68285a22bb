//! Remote method names organized by Kodi namespace.
//!
//! Methods follow `Namespace.Method` format.
//!
//! | Namespace | Used for |
//! |-----------|----------|
//! | `JSONRPC` | Liveness |
//! | `Application` | Properties, volume, mute |
//! | `Input` | Named actions |
//! | `Player` | Transport control, seeking, opening items |
//! | `Playlist` | Default playlist management |
//! | `AudioLibrary` | Artists, albums, songs |
//! | `GUI` | On-screen notifications |

/// `JSONRPC` namespace.
pub mod jsonrpc {
    /// Liveness check, answered with `"pong"`.
    pub const PING: &str = "JSONRPC.Ping";
}

/// `Application` namespace.
pub mod application {
    pub const GET_PROPERTIES: &str = "Application.GetProperties";
    pub const SET_VOLUME: &str = "Application.SetVolume";
    pub const SET_MUTE: &str = "Application.SetMute";
}

/// `Input` namespace.
pub mod input {
    pub const EXECUTE_ACTION: &str = "Input.ExecuteAction";
}

/// `Player` namespace.
pub mod player {
    pub const GET_ACTIVE_PLAYERS: &str = "Player.GetActivePlayers";
    pub const GET_PROPERTIES: &str = "Player.GetProperties";
    pub const GET_ITEM: &str = "Player.GetItem";
    pub const PLAY_PAUSE: &str = "Player.PlayPause";
    pub const STOP: &str = "Player.Stop";
    pub const GO_TO: &str = "Player.GoTo";
    pub const SEEK: &str = "Player.Seek";
    pub const OPEN: &str = "Player.Open";
    pub const SET_SHUFFLE: &str = "Player.SetShuffle";
}

/// `Playlist` namespace.
pub mod playlist {
    pub const ADD: &str = "Playlist.Add";
    pub const CLEAR: &str = "Playlist.Clear";
}

/// `AudioLibrary` namespace.
pub mod audio_library {
    pub const GET_ARTISTS: &str = "AudioLibrary.GetArtists";
    pub const GET_ALBUMS: &str = "AudioLibrary.GetAlbums";
    pub const GET_SONGS: &str = "AudioLibrary.GetSongs";
}

/// `GUI` namespace.
pub mod gui {
    pub const SHOW_NOTIFICATION: &str = "GUI.ShowNotification";
}

/// Acknowledgement literal returned by [`jsonrpc::PING`].
pub const PING_REPLY: &str = "pong";
