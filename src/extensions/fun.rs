//! Fun commands: `!fitb`, `!poof` and `!roll`

use rand::thread_rng;

use crate::application::errors::ExtensionError;
use crate::domain::entities::{CommandRegistry, Reply};

use super::dice;
use super::ChatExtension;

/// Lighthearted chat commands
pub struct FunCommands;

impl FunCommands {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FunCommands {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatExtension for FunCommands {
    fn name(&self) -> &str {
        "fun"
    }

    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
        registry.register("fitb", |_args, _sender, _channel| {
            Ok(Reply::text("Fire in the Bowl!! 🔥"))
        });

        registry.register("poof", |_args, sender, _channel| {
            Ok(Reply::text(format!(
                "Poof! {}'s message history has been cleared (just kidding, not implemented yet)! 💨",
                sender
            )))
        });

        registry.register("roll", |args, sender, _channel| {
            Ok(Reply::text(dice::roll_command(
                args.text_or_empty(),
                sender,
                &mut thread_rng(),
            )))
        });

        Ok(())
    }
}
