//! Player operations: transport control, seeking, opening items, shuffle.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::identifiers::{PlayerId, PlaylistId};
use crate::protocol::methods::player;
use crate::protocol::{GoTo, PlayItem, PlayState, SeekTime};

use super::Client;

// ============================================================================
// Queries
// ============================================================================

impl Client {
    /// Returns the requested properties of `player` (`time`, `speed`, ...).
    pub async fn get_player_properties(
        &self,
        player: PlayerId,
        properties: &[&str],
    ) -> Result<Value> {
        Ok(self
            .server()?
            .call_with(player::GET_PROPERTIES, [json!(player), json!(properties)])
            .await?)
    }

    /// Returns the item currently played by `player`.
    ///
    /// Yields [`Value::Null`] if the reply carries no `item` field.
    pub async fn get_playing_item_properties(
        &self,
        player: PlayerId,
        properties: &[&str],
    ) -> Result<Value> {
        let mut reply = self
            .server()?
            .call_with(player::GET_ITEM, [json!(player), json!(properties)])
            .await?;
        Ok(reply.get_mut("item").map(Value::take).unwrap_or(Value::Null))
    }
}

// ============================================================================
// Transport Control
// ============================================================================

impl Client {
    /// Toggles between playing and paused.
    pub async fn play_pause(&self) -> Result<()> {
        self.set_play_state(PlayState::Toggle).await
    }

    /// Resumes playback.
    pub async fn play(&self) -> Result<()> {
        self.set_play_state(PlayState::Play).await
    }

    /// Pauses playback.
    pub async fn pause(&self) -> Result<()> {
        self.set_play_state(PlayState::Pause).await
    }

    /// Stops playback.
    pub async fn stop(&self) -> Result<()> {
        let Some(active) = self.active_player("stop").await? else {
            return Ok(());
        };

        self.server()?
            .call_with(player::STOP, [json!(active.player_id)])
            .await?;
        Ok(())
    }

    /// Skips to the next item.
    pub async fn next_track(&self) -> Result<()> {
        let Some(active) = self.active_player("next_track").await? else {
            return Ok(());
        };

        self.go_to(active.player_id, GoTo::Next).await
    }

    /// Restarts the current item, then steps back to the previous one.
    pub async fn previous_track(&self) -> Result<()> {
        let Some(active) = self.active_player("previous_track").await? else {
            return Ok(());
        };

        self.server()?
            .call_with(player::SEEK, [json!(active.player_id), json!(0)])
            .await?;
        self.go_to(active.player_id, GoTo::Previous).await
    }

    /// Seeks to `position` seconds; negative positions seek to the start.
    pub async fn media_seek(&self, position: f64) -> Result<()> {
        let Some(active) = self.active_player("media_seek").await? else {
            return Ok(());
        };

        let time = SeekTime::from_seconds(position);
        debug!(player = %active.player_id, ?time, "Seeking");
        self.server()?
            .call_with(player::SEEK, [json!(active.player_id), json!(time)])
            .await?;
        Ok(())
    }

    /// Enables or disables shuffle on the active player.
    pub async fn set_shuffle(&self, shuffle: bool) -> Result<()> {
        let Some(active) = self.active_player("set_shuffle").await? else {
            return Ok(());
        };

        self.server()?
            .call_with(
                player::SET_SHUFFLE,
                [json!({"playerid": active.player_id, "shuffle": shuffle})],
            )
            .await?;
        Ok(())
    }

    async fn set_play_state(&self, state: PlayState) -> Result<()> {
        let Some(active) = self.active_player("play_pause").await? else {
            return Ok(());
        };

        self.server()?
            .call_with(player::PLAY_PAUSE, [json!(active.player_id), json!(state)])
            .await?;
        Ok(())
    }

    async fn go_to(&self, player_id: PlayerId, to: GoTo) -> Result<()> {
        self.server()?
            .call_with(player::GO_TO, [json!(player_id), json!(to)])
            .await?;
        Ok(())
    }
}

// ============================================================================
// Playback Sources
// ============================================================================

impl Client {
    /// Tunes to a PVR channel.
    pub async fn play_channel(&self, channel_id: i64) -> Result<()> {
        self.open(PlayItem::Channel(channel_id)).await
    }

    /// Starts a playlist.
    pub async fn play_playlist(&self, playlist_id: PlaylistId) -> Result<()> {
        self.open(PlayItem::Playlist(playlist_id)).await
    }

    /// Plays the contents of a directory.
    pub async fn play_directory(&self, path: impl Into<String>) -> Result<()> {
        self.open(PlayItem::Directory(path.into())).await
    }

    /// Plays a file path or URL.
    pub async fn play_file(&self, path: impl Into<String>) -> Result<()> {
        self.open(PlayItem::File(path.into())).await
    }

    async fn open(&self, item: PlayItem) -> Result<()> {
        debug!(?item, "Opening item");
        self.server()?
            .call_with(player::OPEN, [json!({"item": item})])
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::client_with;
    use crate::identifiers::{PlayerId, PlaylistId};
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_control_without_player_is_noop() {
        let transport = MockTransport::with_players(0);
        let client = client_with(transport.clone());

        client.play_pause().await.expect("play_pause");
        client.play().await.expect("play");
        client.pause().await.expect("pause");
        client.stop().await.expect("stop");
        client.next_track().await.expect("next");
        client.previous_track().await.expect("previous");
        client.media_seek(12.0).await.expect("seek");
        client.set_shuffle(true).await.expect("shuffle");

        let methods = transport.methods();
        assert_eq!(methods.len(), 8);
        assert!(methods.iter().all(|m| m == "Player.GetActivePlayers"));
    }

    #[tokio::test]
    async fn test_play_pause_states() {
        let transport = MockTransport::with_players(1);
        let client = client_with(transport.clone());

        client.play_pause().await.expect("toggle");
        client.play().await.expect("play");
        client.pause().await.expect("pause");

        let params: Vec<_> = transport
            .calls()
            .into_iter()
            .filter(|c| c.method == "Player.PlayPause")
            .map(|c| c.params)
            .collect();
        assert_eq!(params, vec![json!([0, "toggle"]), json!([0, true]), json!([0, false])]);
    }

    #[tokio::test]
    async fn test_commands_target_first_player() {
        let transport = MockTransport::new(|method| {
            if method == "Player.GetActivePlayers" {
                Ok(json!([{"playerid": 7, "type": "video"}, {"playerid": 1, "type": "audio"}]))
            } else {
                Ok(json!("OK"))
            }
        });
        let client = client_with(transport.clone());

        client.stop().await.expect("stop");

        let calls = transport.calls();
        assert_eq!(calls[1].method, "Player.Stop");
        assert_eq!(calls[1].params, json!([7]));
    }

    #[tokio::test]
    async fn test_previous_track_seeks_to_start_first() {
        let transport = MockTransport::with_players(1);
        let client = client_with(transport.clone());

        client.previous_track().await.expect("previous");

        let calls = transport.calls();
        assert_eq!(
            transport.methods(),
            vec!["Player.GetActivePlayers", "Player.Seek", "Player.GoTo"]
        );
        assert_eq!(calls[1].params, json!([0, 0]));
        assert_eq!(calls[2].params, json!([0, "previous"]));
    }

    #[tokio::test]
    async fn test_next_track() {
        let transport = MockTransport::with_players(1);
        let client = client_with(transport.clone());

        client.next_track().await.expect("next");

        let calls = transport.calls();
        assert_eq!(calls[1].method, "Player.GoTo");
        assert_eq!(calls[1].params, json!([0, "next"]));
    }

    #[tokio::test]
    async fn test_media_seek_params() {
        let transport = MockTransport::with_players(1);
        let client = client_with(transport.clone());

        client.media_seek(3725.25).await.expect("seek");
        client.media_seek(-4.0).await.expect("seek");

        let calls = transport.calls();
        assert_eq!(
            calls[1].params,
            json!([0, {"hours": 1, "minutes": 2, "seconds": 5, "milliseconds": 250}])
        );
        assert_eq!(
            calls[3].params,
            json!([0, {"hours": 0, "minutes": 0, "seconds": 0, "milliseconds": 0}])
        );
    }

    #[tokio::test]
    async fn test_set_shuffle_named_params() {
        let transport = MockTransport::with_players(1);
        let client = client_with(transport.clone());

        client.set_shuffle(true).await.expect("shuffle");

        let calls = transport.calls();
        assert_eq!(calls[1].method, "Player.SetShuffle");
        assert_eq!(calls[1].params, json!({"playerid": 0, "shuffle": true}));
    }

    #[tokio::test]
    async fn test_play_sources() {
        let transport = MockTransport::with_players(0);
        let client = client_with(transport.clone());

        client.play_channel(5).await.expect("channel");
        client.play_playlist(PlaylistId::DEFAULT).await.expect("playlist");
        client.play_directory("/music/").await.expect("directory");
        client.play_file("/music/a.flac").await.expect("file");

        let calls = transport.calls();
        assert!(calls.iter().all(|c| c.method == "Player.Open"));
        assert_eq!(calls[0].params, json!({"item": {"channelid": 5}}));
        assert_eq!(calls[1].params, json!({"item": {"playlistid": 0}}));
        assert_eq!(calls[2].params, json!({"item": {"directory": "/music/"}}));
        assert_eq!(calls[3].params, json!({"item": {"file": "/music/a.flac"}}));
    }

    #[tokio::test]
    async fn test_get_playing_item_properties_extracts_item() {
        let transport =
            MockTransport::new(|_| Ok(json!({"item": {"label": "Song", "type": "song"}})));
        let client = client_with(transport.clone());

        let item = client
            .get_playing_item_properties(PlayerId::new(0), &["title"])
            .await
            .expect("item");

        assert_eq!(item["label"], "Song");
        assert_eq!(transport.calls()[0].params, json!([0, ["title"]]));
    }

    #[tokio::test]
    async fn test_get_playing_item_without_item_is_null() {
        let client = client_with(MockTransport::new(|_| Ok(json!({}))));

        let item = client
            .get_playing_item_properties(PlayerId::new(0), &[])
            .await
            .expect("item");

        assert!(item.is_null());
    }

    #[tokio::test]
    async fn test_get_player_properties() {
        let transport = MockTransport::new(|_| Ok(json!({"speed": 1})));
        let client = client_with(transport.clone());

        let props = client
            .get_player_properties(PlayerId::new(1), &["speed"])
            .await
            .expect("props");

        assert_eq!(props["speed"], 1);
        assert_eq!(transport.calls()[0].method, "Player.GetProperties");
        assert_eq!(transport.calls()[0].params, json!([1, ["speed"]]));
    }
}
