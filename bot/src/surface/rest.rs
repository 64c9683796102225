use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{DisplaySurface, SurfaceError};
use crate::engine::panel::PanelContent;
use crate::ids::{ChannelId, MessageId};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Embed accent color (blurple).
const PANEL_COLOR: u32 = 0x5865F2;

/// Display surface backed by a Discord-compatible message REST API:
/// `POST /channels/{id}/messages` plus `GET`/`PATCH` on
/// `/channels/{id}/messages/{message_id}`, authenticated with a bot token.
pub struct RestSurface {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct MessagePayload {
    embeds: [EmbedPayload; 1],
}

#[derive(Serialize)]
struct EmbedPayload {
    title: String,
    description: String,
    color: u32,
    footer: FooterPayload,
    timestamp: String,
}

#[derive(Serialize)]
struct FooterPayload {
    text: String,
}

#[derive(Deserialize)]
struct MessageCreated {
    id: String,
}

/// Build the embed payload for a panel.
fn embed_payload(content: &PanelContent) -> MessagePayload {
    MessagePayload {
        embeds: [EmbedPayload {
            title: content.title.clone(),
            description: content.body(),
            color: PANEL_COLOR,
            footer: FooterPayload {
                text: content.footer.clone(),
            },
            timestamp: content.generated_at.to_rfc3339(),
        }],
    }
}

/// Map a non-success response status onto the surface error split.
fn status_error(status: StatusCode) -> SurfaceError {
    if status == StatusCode::NOT_FOUND {
        SurfaceError::NotFound
    } else {
        SurfaceError::Transient(format!("unexpected status {status}"))
    }
}

/// Parse the platform's string snowflake into our numeric message ID.
fn parse_message_id(raw: &str) -> Result<MessageId, SurfaceError> {
    raw.parse()
        .map_err(|_| SurfaceError::Transient(format!("unparseable message id `{raw}`")))
}

impl RestSurface {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    fn messages_url(&self, channel_id: ChannelId) -> String {
        format!("{}/channels/{}/messages", self.base_url, channel_id)
    }

    fn message_url(&self, channel_id: ChannelId, message_id: MessageId) -> String {
        format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        )
    }
}

#[async_trait]
impl DisplaySurface for RestSurface {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: &PanelContent,
    ) -> Result<MessageId, SurfaceError> {
        let resp = self
            .http
            .post(self.messages_url(channel_id))
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .json(&embed_payload(content))
            .send()
            .await
            .map_err(|e| SurfaceError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let created: MessageCreated = resp
            .json()
            .await
            .map_err(|e| SurfaceError::Transient(e.to_string()))?;
        parse_message_id(&created.id)
    }

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), SurfaceError> {
        let resp = self
            .http
            .get(self.message_url(channel_id, message_id))
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SurfaceError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(())
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &PanelContent,
    ) -> Result<(), SurfaceError> {
        let resp = self
            .http
            .patch(self.message_url(channel_id, message_id))
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .json(&embed_payload(content))
            .send()
            .await
            .map_err(|e| SurfaceError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(())
    }
}
