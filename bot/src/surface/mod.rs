use async_trait::async_trait;
use thiserror::Error;

use crate::engine::panel::PanelContent;
use crate::ids::{ChannelId, MessageId};

pub mod rest;

/// How a display surface call failed. Call sites pattern-match on this:
/// `NotFound` says the panel message is gone and may be recreated, while
/// `Transient` says the message may well still exist, so nothing should be
/// recreated.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("message or channel not found")]
    NotFound,
    #[error("display surface request failed: {0}")]
    Transient(String),
}

/// Where panels live: a service that can post, probe and edit messages in
/// channels. Backed by the platform's REST API in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait DisplaySurface: Send + Sync {
    /// Post a new panel message, returning its ID.
    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: &PanelContent,
    ) -> Result<MessageId, SurfaceError>;

    /// Check that a message still exists.
    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), SurfaceError>;

    /// Replace a message's content in place.
    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &PanelContent,
    ) -> Result<(), SurfaceError>;
}
