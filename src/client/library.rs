//! Audio library queries.

use serde_json::{Value, json};

use crate::error::Result;
use crate::protocol::methods::audio_library;

use super::Client;

impl Client {
    /// Lists all artists.
    pub async fn get_artists(&self) -> Result<Value> {
        Ok(self.server()?.call(audio_library::GET_ARTISTS).await?)
    }

    /// Lists albums, optionally restricted to one artist.
    pub async fn get_albums(&self, artist_id: Option<i64>) -> Result<Value> {
        self.library_query(audio_library::GET_ALBUMS, artist_id).await
    }

    /// Lists songs, optionally restricted to one artist.
    pub async fn get_songs(&self, artist_id: Option<i64>) -> Result<Value> {
        self.library_query(audio_library::GET_SONGS, artist_id).await
    }

    async fn library_query(&self, method: &str, artist_id: Option<i64>) -> Result<Value> {
        let server = self.server()?;
        let reply = match artist_id {
            Some(id) => {
                server
                    .call_with(method, [json!({"filter": {"artistid": id}})])
                    .await?
            }
            None => server.call(method).await?,
        };
        Ok(reply)
    }
}
