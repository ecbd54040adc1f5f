//! Chat service - drives lines through dispatch, persistence and delivery

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::application::dispatch::CommandDispatcher;
use crate::application::errors::{BotError, StorageError};
use crate::domain::entities::{ChatMessage, ChatPost, FormData, Outcome};
use crate::domain::traits::ChatPort;
use crate::infrastructure::database::MessageStore;

/// Host-side pipeline for one chat frontend
///
/// Tracks one pending form per channel so a modal outcome can be answered
/// with a JSON line and replayed as structured arguments against the
/// command that opened it.
pub struct ChatService {
    dispatcher: Arc<CommandDispatcher>,
    store: Arc<Mutex<MessageStore>>,
    port: Arc<dyn ChatPort>,
    pending: Mutex<HashMap<String, String>>,
}

impl ChatService {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        store: Arc<Mutex<MessageStore>>,
        port: Arc<dyn ChatPort>,
    ) -> Self {
        Self {
            dispatcher,
            store,
            port,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one line typed by `sender` in `channel`
    ///
    /// While a form is pending for the channel, a line holding a JSON
    /// object is taken as the submission and replayed against the command
    /// that opened the form. Any other line drops the pending form.
    pub async fn handle_line(
        &self,
        channel: &str,
        sender: &str,
        line: &str,
    ) -> Result<(), BotError> {
        let pending = self.take_pending(channel);

        let message = match (pending, parse_form_line(line)) {
            (Some(command_text), Some(form)) => {
                debug!("Replaying '{}' with submitted form", command_text);
                ChatMessage::new(channel, sender, command_text).with_form(form)
            }
            _ => ChatMessage::new(channel, sender, line),
        };

        self.handle_message(message).await
    }

    /// Dispatch a message and carry out its outcome
    pub async fn handle_message(&self, message: ChatMessage) -> Result<(), BotError> {
        // A cancelled form never reaches a handler.
        if message
            .form
            .as_ref()
            .map(FormData::cancelled)
            .unwrap_or(false)
        {
            debug!("Form cancelled, dropping '{}'", message.text);
            return Ok(());
        }

        // Handlers are synchronous and may block on HTTP or hardware.
        let dispatcher = self.dispatcher.clone();
        let to_dispatch = message.clone();
        let outcome = tokio::task::spawn_blocking(move || dispatcher.dispatch(&to_dispatch))
            .await
            .map_err(|e| BotError::Internal(e.to_string()))?;

        match outcome {
            Outcome::ShowModal { payload } => {
                self.set_pending(&message.channel, &message.text);
                self.port.show_modal(&message.channel, &payload).await
            }
            Outcome::Silent => {
                // Ordinary chat: the raw line itself is the post.
                let post = ChatPost::text(&message.sender, &message.text);
                self.persist_and_deliver(&message.channel, post).await
            }
            other => match other.into_post() {
                Some(post) => self.persist_and_deliver(&message.channel, post).await,
                None => Ok(()),
            },
        }
    }

    async fn persist_and_deliver(&self, channel: &str, post: ChatPost) -> Result<(), BotError> {
        {
            let store = match self.store.lock() {
                Ok(store) => store,
                Err(poisoned) => poisoned.into_inner(),
            };
            let stored = store.save(channel, &post).map_err(StorageError::Sqlite)?;
            debug!("Persisted message {} in {}", stored.id, channel);
        }

        self.port.deliver(channel, &post).await
    }

    fn set_pending(&self, channel: &str, command_text: &str) {
        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.insert(channel.to_string(), command_text.to_string());
    }

    fn take_pending(&self, channel: &str) -> Option<String> {
        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.remove(channel)
    }
}

/// A form submission is a single JSON object on its own line
fn parse_form_line(line: &str) -> Option<FormData> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let value = serde_json::from_str(trimmed).ok()?;
    FormData::from_value(value)
}
