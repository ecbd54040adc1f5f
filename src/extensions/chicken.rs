//! Chicken cam: `!chicken` posts a snapshot from the coop camera

use std::sync::Arc;

use crate::application::errors::{CommandError, ExtensionError};
use crate::domain::entities::{CommandRegistry, ImageReply, MessageReply, Reply};

use super::ChatExtension;

const NO_FRAME: &str =
    "Reeeee, failed to capture chicken image. Stream may be unreachable or unresponsive.";

/// Source of single camera frames, already JPEG-encoded
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> Result<Vec<u8>, CommandError>;
}

/// The `!chicken` command
///
/// Loads even without a camera wired up so the command answers in chat
/// instead of vanishing.
pub struct ChickenCam {
    source: Option<Arc<dyn FrameSource>>,
}

impl ChickenCam {
    pub fn new() -> Self {
        Self { source: None }
    }

    pub fn with_source(mut self, source: Arc<dyn FrameSource>) -> Self {
        self.source = Some(source);
        self
    }
}

impl Default for ChickenCam {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatExtension for ChickenCam {
    fn name(&self) -> &str {
        "chicken"
    }

    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), ExtensionError> {
        let source = self.source.clone();

        registry.register("chicken", move |_args, sender, _channel| {
            tracing::debug!("Chicken snapshot requested by {}", sender);

            let Some(source) = &source else {
                return Ok(Reply::Message(MessageReply::new(NO_FRAME)));
            };

            match source.capture() {
                Ok(frame) if frame.is_empty() => Ok(Reply::Message(MessageReply::new(NO_FRAME))),
                Ok(frame) => Ok(Reply::Image(ImageReply::jpeg(frame))),
                Err(e) => Ok(Reply::Message(MessageReply::new(format!(
                    "Reeeee, error capturing chicken: {}",
                    e
                )))),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Args;

    struct FixedFrame(Vec<u8>);

    impl FrameSource for FixedFrame {
        fn capture(&self) -> Result<Vec<u8>, CommandError> {
            Ok(self.0.clone())
        }
    }

    struct DeadCamera;

    impl FrameSource for DeadCamera {
        fn capture(&self) -> Result<Vec<u8>, CommandError> {
            Err(CommandError::ExecutionFailed("rtsp timeout".to_string()))
        }
    }

    fn invoke(extension: ChickenCam) -> Reply {
        let mut registry = CommandRegistry::new();
        extension.register_commands(&mut registry).unwrap();
        registry
            .lookup("chicken")
            .unwrap()
            .invoke(Args::from(""), "alice", "general")
            .unwrap()
    }

    #[test]
    fn missing_camera_reports_in_chat() {
        let reply = invoke(ChickenCam::new());
        assert_eq!(reply, Reply::Message(MessageReply::new(NO_FRAME)));
    }

    #[test]
    fn captured_frame_becomes_an_image_reply() {
        let reply = invoke(ChickenCam::new().with_source(Arc::new(FixedFrame(vec![1, 2, 3]))));
        match reply {
            Reply::Image(image) => {
                assert_eq!(image.data, vec![1, 2, 3]);
                assert_eq!(image.content_type, "image/jpeg");
            }
            other => panic!("expected image reply, got {:?}", other),
        }
    }

    #[test]
    fn empty_frame_counts_as_a_miss() {
        let reply = invoke(ChickenCam::new().with_source(Arc::new(FixedFrame(Vec::new()))));
        assert_eq!(reply, Reply::Message(MessageReply::new(NO_FRAME)));
    }

    #[test]
    fn capture_errors_are_named_in_chat() {
        let reply = invoke(ChickenCam::new().with_source(Arc::new(DeadCamera)));
        assert_eq!(
            reply,
            Reply::Message(MessageReply::new(
                "Reeeee, error capturing chicken: Execution failed: rtsp timeout"
            ))
        );
    }
}
