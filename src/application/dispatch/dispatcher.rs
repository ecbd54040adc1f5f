//! Command dispatcher - routes chat lines to handlers

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::{Args, ChatMessage, CommandRegistry, Outcome};
use crate::domain::traits::Uploader;

use super::normalizer::ResponseNormalizer;
use super::parser::CommandParser;

/// Routes command lines to registered handlers and normalizes what comes back
///
/// Ordinary chat comes back [`Outcome::Silent`] untouched. A matched handler
/// runs synchronously on the caller's thread; whatever it does, including
/// panicking, ends in a canonical outcome rather than escaping to the host.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    parser: CommandParser,
    normalizer: ResponseNormalizer,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            registry,
            parser: CommandParser::default(),
            normalizer: ResponseNormalizer::new(uploader),
        }
    }

    /// Change the command sigil (default `!`)
    pub fn with_sigil(mut self, sigil: char) -> Self {
        self.parser = CommandParser::new(sigil);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn dispatch(&self, message: &ChatMessage) -> Outcome {
        let Some(line) = self.parser.parse(&message.text) else {
            return Outcome::Silent;
        };

        let Some(command) = self.registry.lookup(&line.name) else {
            debug!("Unknown command: {}", line.name);
            return Outcome::Silent;
        };

        // A non-empty form wins over the trailing text.
        let args = match message.effective_form() {
            Some(form) => Args::Form(form.clone()),
            None => Args::Text(line.arg_text.to_string()),
        };

        debug!("Dispatching command: {} from {}", line.name, message.sender);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            command.invoke(args, &message.sender, &message.channel)
        }));

        match result {
            Ok(Ok(reply)) => self.normalizer.normalize(reply),
            Ok(Err(e)) => {
                warn!("Command {} failed: {}", line.name, e);
                Outcome::Error {
                    reason: e.to_string(),
                }
            }
            Err(payload) => {
                let reason = panic_reason(payload);
                error!("Command {} panicked: {}", line.name, reason);
                Outcome::Error { reason }
            }
        }
    }
}

pub(crate) fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
