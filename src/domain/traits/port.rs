use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::BotError;
use crate::domain::entities::ChatPost;

/// Delivery seam between the dispatch pipeline and a chat frontend
///
/// The console adapter prints; a socket server would broadcast.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Deliver a finished chat post to everyone in the channel
    async fn deliver(&self, channel: &str, post: &ChatPost) -> Result<(), BotError>;

    /// Ask the sender's client to open a modal dialog
    async fn show_modal(&self, channel: &str, payload: &Value) -> Result<(), BotError>;
}
