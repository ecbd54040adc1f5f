//! Extension loading with per-extension fault containment

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{error, info, warn};

use crate::application::dispatch::dispatcher::panic_reason;
use crate::domain::entities::CommandRegistry;

use super::ChatExtension;

/// An extension that did not finish setup, and why
#[derive(Debug, Clone)]
pub struct FailedExtension {
    pub name: String,
    pub reason: String,
}

/// What happened during one [`load_extensions`] pass
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<FailedExtension>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run setup for every extension, collecting commands into `registry`
///
/// A failing or panicking extension is recorded and skipped; the ones
/// after it still load. Commands it registered before failing stay in
/// the registry.
pub fn load_extensions(
    extensions: &[Box<dyn ChatExtension>],
    registry: &mut CommandRegistry,
) -> LoadReport {
    let mut report = LoadReport::default();

    for extension in extensions {
        let name = extension.name().to_string();
        let outcome = catch_unwind(AssertUnwindSafe(|| extension.register_commands(registry)));

        match outcome {
            Ok(Ok(())) => {
                info!("Loaded extension: {}", name);
                report.loaded.push(name);
            }
            Ok(Err(e)) => {
                warn!("Extension {} failed to load: {}", name, e);
                report.failed.push(FailedExtension {
                    name,
                    reason: e.to_string(),
                });
            }
            Err(payload) => {
                let reason = panic_reason(payload);
                error!("Extension {} panicked during setup: {}", name, reason);
                report.failed.push(FailedExtension { name, reason });
            }
        }
    }

    info!(
        "Extensions ready: {} loaded, {} failed, {} commands",
        report.loaded.len(),
        report.failed.len(),
        registry.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ExtensionError;
    use crate::domain::entities::Reply;

    struct Good;

    impl ChatExtension for Good {
        fn name(&self) -> &str {
            "good"
        }

        fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
            registry.register("ping", |_args, _sender, _channel| Ok(Reply::text("pong")));
            Ok(())
        }
    }

    struct FailsAfterOne;

    impl ChatExtension for FailsAfterOne {
        fn name(&self) -> &str {
            "half-done"
        }

        fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
            registry.register("early", |_args, _sender, _channel| Ok(Reply::text("early")));
            Err(ExtensionError::Setup("config file missing".to_string()))
        }
    }

    struct Panics;

    impl ChatExtension for Panics {
        fn name(&self) -> &str {
            "explosive"
        }

        fn register_commands(&self, _registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
            panic!("setup exploded");
        }
    }

    #[test]
    fn loads_everything_when_nothing_fails() {
        let extensions: Vec<Box<dyn ChatExtension>> = vec![Box::new(Good)];
        let mut registry = CommandRegistry::new();

        let report = load_extensions(&extensions, &mut registry);

        assert!(report.is_clean());
        assert_eq!(report.loaded, vec!["good"]);
        assert!(registry.contains("ping"));
    }

    #[test]
    fn failure_is_reported_and_later_extensions_still_load() {
        let extensions: Vec<Box<dyn ChatExtension>> =
            vec![Box::new(FailsAfterOne), Box::new(Good)];
        let mut registry = CommandRegistry::new();

        let report = load_extensions(&extensions, &mut registry);

        assert_eq!(report.loaded, vec!["good"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "half-done");
        assert_eq!(report.failed[0].reason, "Setup failed: config file missing");
        assert!(registry.contains("ping"));
    }

    #[test]
    fn commands_registered_before_a_failure_survive() {
        let extensions: Vec<Box<dyn ChatExtension>> = vec![Box::new(FailsAfterOne)];
        let mut registry = CommandRegistry::new();

        load_extensions(&extensions, &mut registry);

        assert!(registry.contains("early"));
    }

    #[test]
    fn panicking_setup_does_not_stop_the_load() {
        let extensions: Vec<Box<dyn ChatExtension>> = vec![Box::new(Panics), Box::new(Good)];
        let mut registry = CommandRegistry::new();

        let report = load_extensions(&extensions, &mut registry);

        assert_eq!(report.loaded, vec!["good"]);
        assert_eq!(report.failed[0].name, "explosive");
        assert_eq!(report.failed[0].reason, "setup exploded");
        assert!(registry.contains("ping"));
    }
}
