use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Args, Reply};

/// Command handler function type: `(args, sender, channel)`
pub type CommandHandler =
    Arc<dyn Fn(Args, &str, &str) -> Result<Reply, CommandError> + Send + Sync>;

/// A chat command: a case-insensitive name bound to a handler
#[derive(Clone)]
pub struct Command {
    name: String,
    handler: CommandHandler,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Args, &str, &str) -> Result<Reply, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into().to_lowercase(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, args: Args, sender: &str, channel: &str) -> Result<Reply, CommandError> {
        (self.handler)(args, sender, channel)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

/// Command registry mapping folded names to handlers
///
/// Names are lowercased both when stored and when looked up, so `!Roll` and
/// `!roll` hit the same entry. Registering a name that already exists
/// replaces the previous handler.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Args, &str, &str) -> Result<Reply, CommandError> + Send + Sync + 'static,
    {
        self.insert(Command::new(name, handler));
    }

    pub fn insert(&mut self, command: Command) {
        let name = command.name().to_string();
        if self.commands.insert(name.clone(), command).is_some() {
            tracing::warn!("Replaced command: {}", name);
        } else {
            tracing::info!("Registered command: {}", name);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted for stable listings
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
