//! Console adapter for development/testing

use async_trait::async_trait;
use serde_json::Value;

use crate::application::errors::BotError;
use crate::domain::entities::ChatPost;
use crate::domain::traits::ChatPort;

/// Prints channel traffic to stdout
pub struct ConsoleAdapter;

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatPort for ConsoleAdapter {
    async fn deliver(&self, channel: &str, post: &ChatPost) -> Result<(), BotError> {
        if post.is_media {
            let url = post.image_url.as_deref().unwrap_or(&post.body);
            println!("[{}] {}: (media) {}", channel, post.sender, url);
        } else {
            println!("[{}] {}: {}", channel, post.sender, post.body);
        }
        Ok(())
    }

    async fn show_modal(&self, channel: &str, payload: &Value) -> Result<(), BotError> {
        println!("[{}] --- form ---", channel);
        println!(
            "{}",
            serde_json::to_string_pretty(payload).unwrap_or_default()
        );
        println!("Reply with a JSON object to submit, or {{\"cancel\": true}} to dismiss.");
        Ok(())
    }
}
