//! Image generation: `!image` opens a parameter form, the submission
//! drives a pluggable backend

use std::sync::Arc;

use serde_json::json;

use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{Args, CommandRegistry, ImageReply, MessageReply, Reply};
use crate::infrastructure::config::ImageConfig;

use super::ChatExtension;

/// Backend that turns a prompt into encoded image bytes
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<Vec<u8>, CommandError>;
}

/// Parameters for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub batch_size: u32,
}

/// The `!image` command
///
/// Bare invocations answer with a form prefilled from config defaults,
/// with any trailing text as the starting prompt. The submitted form
/// comes back as structured args and runs the backend. Without a backend
/// the command still loads and reports the failure in chat.
pub struct ImageCommands {
    defaults: ImageConfig,
    generator: Option<Arc<dyn ImageGenerator>>,
}

impl ImageCommands {
    pub fn new(defaults: ImageConfig) -> Self {
        Self {
            defaults,
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn ImageGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

impl ChatExtension for ImageCommands {
    fn name(&self) -> &str {
        "image"
    }

    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
        let defaults = self.defaults.clone();
        let generator = self.generator.clone();

        registry.register("image", move |args, sender, channel| {
            tracing::debug!("Processing image command from {} in {}", sender, channel);

            let form = match args {
                Args::Text(text) => {
                    return Ok(Reply::Modal(json!({
                        "open_modal": true,
                        "prompt": text.trim(),
                        "width": defaults.width,
                        "height": defaults.height,
                        "steps": defaults.steps,
                        "cfg_scale": defaults.cfg_scale,
                        "negative_prompt": defaults.negative_prompt.clone(),
                        "batch_size": defaults.batch_size,
                    })));
                }
                Args::Form(form) => form,
            };

            if form.cancelled() {
                tracing::debug!("Image generation cancelled by {}", sender);
                return Ok(Reply::Cancel);
            }

            let prompt = form.str_of("prompt").unwrap_or("").trim().to_string();
            if prompt.is_empty() {
                return Ok(Reply::Message(MessageReply::new(
                    "Reeeee, prompt is empty! Please provide a description.",
                )));
            }

            let number = |key: &str, default: u32| {
                form.u64_of(key)
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(default)
            };
            let request = GenerateRequest {
                prompt,
                negative_prompt: form
                    .str_of("negative_prompt")
                    .unwrap_or(defaults.negative_prompt.as_str())
                    .to_string(),
                width: number("width", defaults.width),
                height: number("height", defaults.height),
                steps: number("steps", defaults.steps),
                cfg_scale: form.f64_of("cfg_scale").unwrap_or(defaults.cfg_scale),
                batch_size: number("batch_size", defaults.batch_size).clamp(1, 4),
            };

            let Some(generator) = &generator else {
                return Ok(Reply::text(
                    "Reeeee, image generation failed: no backend configured",
                ));
            };

            match generator.generate(&request) {
                Ok(data) if data.is_empty() => {
                    Ok(Reply::text("Reeeee, no image data returned from API!"))
                }
                Ok(data) => Ok(Reply::Image(ImageReply::jpeg(data))),
                Err(e) => Ok(Reply::text(format!(
                    "Reeeee, image generation failed: {}",
                    e
                ))),
            }
        });

        Ok(())
    }
}
