//! Compiled-in chat extensions
//!
//! Each extension bundles related commands and registers them during
//! startup. The set is fixed at compile time; config decides which of
//! them actually load.

pub mod chicken;
pub mod dice;
pub mod fun;
pub mod image_gen;
pub mod loader;

pub use loader::{load_extensions, FailedExtension, LoadReport};

use crate::application::errors::ExtensionError;
use crate::domain::entities::CommandRegistry;
use crate::infrastructure::config::Config;

/// A bundle of commands registered as one unit
///
/// Setup is fallible and may touch config or hardware; the loader keeps
/// one bad extension from taking the rest down.
pub trait ChatExtension: Send + Sync {
    /// Short name used in logs and load reports
    fn name(&self) -> &str;

    /// Register this extension's commands
    ///
    /// Commands registered before an error stay registered.
    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError>;
}

/// The built-in extension set, filtered by config toggles
pub fn builtin(config: &Config) -> Vec<Box<dyn ChatExtension>> {
    let mut extensions: Vec<Box<dyn ChatExtension>> = Vec::new();

    if config.extensions.fun {
        extensions.push(Box::new(fun::FunCommands::new()));
    }
    if config.extensions.image {
        extensions.push(Box::new(image_gen::ImageCommands::new(config.image.clone())));
    }
    if config.extensions.chicken {
        extensions.push(Box::new(chicken::ChickenCam::new()));
    }

    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_follows_config_toggles() {
        let mut config = Config::default();
        config.extensions.chicken = false;

        let names: Vec<String> = builtin(&config)
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["fun", "image"]);
    }

    #[test]
    fn builtin_set_can_be_empty() {
        let mut config = Config::default();
        config.extensions.fun = false;
        config.extensions.image = false;
        config.extensions.chicken = false;

        assert!(builtin(&config).is_empty());
    }
}
