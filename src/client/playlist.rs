//! Default playlist management.

use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::PlaylistId;
use crate::protocol::PlaylistItem;
use crate::protocol::methods::playlist;

use super::Client;

impl Client {
    /// Appends a library song to the default playlist.
    pub async fn add_song_to_playlist(&self, song_id: i64) -> Result<()> {
        self.add_to_playlist(PlaylistItem::Song(song_id)).await
    }

    /// Appends a library album to the default playlist.
    pub async fn add_album_to_playlist(&self, album_id: i64) -> Result<()> {
        self.add_to_playlist(PlaylistItem::Album(album_id)).await
    }

    /// Empties the default playlist.
    pub async fn clear_playlist(&self) -> Result<()> {
        self.server()?
            .call_with(playlist::CLEAR, [json!({"playlistid": PlaylistId::DEFAULT})])
            .await?;
        Ok(())
    }

    async fn add_to_playlist(&self, item: PlaylistItem) -> Result<()> {
        debug!(?item, "Adding to playlist");
        self.server()?
            .call_with(
                playlist::ADD,
                [json!({"playlistid": PlaylistId::DEFAULT, "item": item})],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::client_with;
    use crate::error::{Error, TransportError};
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_add_to_playlist() {
        let transport = MockTransport::with_players(0);
        let client = client_with(transport.clone());

        client.add_song_to_playlist(11).await.expect("song");
        client.add_album_to_playlist(4).await.expect("album");

        let calls = transport.calls();
        assert_eq!(calls[0].method, "Playlist.Add");
        assert_eq!(calls[0].params, json!({"playlistid": 0, "item": {"songid": 11}}));
        assert_eq!(calls[1].params, json!({"playlistid": 0, "item": {"albumid": 4}}));
    }

    #[tokio::test]
    async fn test_clear_playlist() {
        let transport = MockTransport::with_players(0);
        let client = client_with(transport.clone());

        client.clear_playlist().await.expect("clear");

        let calls = transport.calls();
        assert_eq!(calls[0].method, "Playlist.Clear");
        assert_eq!(calls[0].params, json!({"playlistid": 0}));
    }

    #[tokio::test]
    async fn test_rpc_error_propagates() {
        let client = client_with(MockTransport::new(|_| {
            Err(TransportError::rpc(-32602, "Invalid params"))
        }));

        let err = client.add_song_to_playlist(1).await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Rpc { code: -32602, .. })));
    }
}
