//! Application-level operations: properties, volume, mute, notifications.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::protocol::methods::{application, gui, input};

use super::Client;

/// Default icon of on-screen notifications.
pub const DEFAULT_NOTIFICATION_ICON: &str = "info";

/// Default display time of on-screen notifications, in milliseconds.
pub const DEFAULT_NOTIFICATION_DISPLAY_TIME: u64 = 10_000;

impl Client {
    /// Returns the requested `Application` properties (`volume`, `muted`, ...).
    pub async fn get_application_properties(&self, properties: &[&str]) -> Result<Value> {
        Ok(self
            .server()?
            .call_with(application::GET_PROPERTIES, [json!(properties)])
            .await?)
    }

    /// Raises the volume one step.
    pub async fn volume_up(&self) -> Result<()> {
        self.execute_action("volume_up", "volumeup").await
    }

    /// Lowers the volume one step.
    pub async fn volume_down(&self) -> Result<()> {
        self.execute_action("volume_down", "volumedown").await
    }

    /// Sets the volume; values above 100 are clamped.
    pub async fn set_volume_level(&self, volume: u8) -> Result<()> {
        if self.active_player("set_volume_level").await?.is_none() {
            return Ok(());
        }

        let volume = volume.min(100);
        debug!(volume, "Setting volume");
        self.server()?
            .call_with(application::SET_VOLUME, [json!(volume)])
            .await?;
        Ok(())
    }

    /// Mutes (`true`) or unmutes (`false`).
    pub async fn mute(&self, mute: bool) -> Result<()> {
        if self.active_player("mute").await?.is_none() {
            return Ok(());
        }

        self.server()?
            .call_with(application::SET_MUTE, [json!(mute)])
            .await?;
        Ok(())
    }

    /// Shows an on-screen notification.
    pub async fn send_notification(
        &self,
        title: &str,
        message: &str,
        icon: &str,
        display_time_ms: u64,
    ) -> Result<()> {
        self.server()?
            .call_with(
                gui::SHOW_NOTIFICATION,
                [json!(title), json!(message), json!(icon), json!(display_time_ms)],
            )
            .await?;
        Ok(())
    }

    /// Shows an on-screen notification with the default icon and duration.
    pub async fn send_notification_default(&self, title: &str, message: &str) -> Result<()> {
        self.send_notification(
            title,
            message,
            DEFAULT_NOTIFICATION_ICON,
            DEFAULT_NOTIFICATION_DISPLAY_TIME,
        )
        .await
    }

    async fn execute_action(&self, operation: &'static str, action: &str) -> Result<()> {
        if self.active_player(operation).await?.is_none() {
            return Ok(());
        }

        self.server()?
            .call_with(input::EXECUTE_ACTION, [json!(action)])
            .await?;
        Ok(())
    }
}
