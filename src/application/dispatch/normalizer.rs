//! Response normalizer - folds handler replies into canonical outcomes

use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::{ImageReply, MessageReply, Outcome, Reply, BOT_SENDER};
use crate::domain::traits::Uploader;

/// Folds every [`Reply`] a handler can produce into a canonical [`Outcome`]
///
/// Dynamic JSON replies resolve in precedence order: modal flag, cancel
/// flag, message object, stringified fallback. Raw image bytes go through
/// the uploader first; an upload failure degrades to a visible text post.
pub struct ResponseNormalizer {
    uploader: Arc<dyn Uploader>,
}

impl ResponseNormalizer {
    pub fn new(uploader: Arc<dyn Uploader>) -> Self {
        Self { uploader }
    }

    pub fn normalize(&self, reply: Reply) -> Outcome {
        match reply {
            Reply::Empty | Reply::Cancel => Outcome::Silent,
            Reply::Modal(payload) => Outcome::ShowModal { payload },
            Reply::Image(image) => self.upload_image(image),
            Reply::Message(message) => message_outcome(message),
            Reply::Text(body) => Outcome::bot_text(body),
            Reply::Json(value) => self.normalize_json(value),
        }
    }

    fn upload_image(&self, image: ImageReply) -> Outcome {
        let filename = image.upload_filename();
        match self
            .uploader
            .upload(image.data, &filename, &image.content_type)
        {
            Ok(stored) => Outcome::Media {
                sender: BOT_SENDER.to_string(),
                body: stored.url.clone(),
                image_url: Some(stored.url),
                thumbnail_url: None,
            },
            Err(e) => {
                tracing::warn!("Image upload failed: {}", e);
                Outcome::bot_text(format!("Failed to upload image: {}", e))
            }
        }
    }

    fn normalize_json(&self, value: Value) -> Outcome {
        let map = match value {
            Value::Null => return Outcome::Silent,
            Value::String(body) => return Outcome::bot_text(body),
            Value::Object(map) => map,
            other => return Outcome::bot_text(other.to_string()),
        };

        // Key presence is the modal signal; the payload travels whole.
        if map.contains_key("open_modal") {
            return Outcome::ShowModal {
                payload: Value::Object(map),
            };
        }

        if map.get("cancel").and_then(Value::as_bool).unwrap_or(false) {
            return Outcome::Silent;
        }

        if let Some(text) = map.get("message") {
            let body = match text {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return message_outcome(MessageReply {
                text: body,
                sender: map.get("sender").and_then(Value::as_str).map(str::to_string),
                is_media: map.get("is_media").and_then(Value::as_bool).unwrap_or(false),
                image_url: map
                    .get("image_url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                thumbnail_url: map
                    .get("thumbnail_url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }

        Outcome::bot_text(Value::Object(map).to_string())
    }
}

fn message_outcome(message: MessageReply) -> Outcome {
    let sender = message.sender.unwrap_or_else(|| BOT_SENDER.to_string());
    // An image URL makes the post media even if the flag was left unset.
    if message.is_media || message.image_url.is_some() {
        Outcome::Media {
            sender,
            body: message.text,
            image_url: message.image_url,
            thumbnail_url: message.thumbnail_url,
        }
    } else {
        Outcome::Text {
            sender,
            body: message.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::UploadError;
    use crate::domain::traits::UploadedFile;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedUploader {
        url: String,
        seen_filename: Mutex<Option<String>>,
    }

    impl FixedUploader {
        fn new(url: &str) -> Self {
            Self {
                url: url.to_string(),
                seen_filename: Mutex::new(None),
            }
        }
    }

    impl Uploader for FixedUploader {
        fn upload(
            &self,
            _data: Vec<u8>,
            filename: &str,
            _content_type: &str,
        ) -> Result<UploadedFile, UploadError> {
            *self.seen_filename.lock().unwrap() = Some(filename.to_string());
            Ok(UploadedFile {
                url: self.url.clone(),
            })
        }
    }

    struct FailingUploader;

    impl Uploader for FailingUploader {
        fn upload(
            &self,
            _data: Vec<u8>,
            _filename: &str,
            _content_type: &str,
        ) -> Result<UploadedFile, UploadError> {
            Err(UploadError::BadResponse("service offline".to_string()))
        }
    }

    fn normalizer(uploader: Arc<dyn Uploader>) -> ResponseNormalizer {
        ResponseNormalizer::new(uploader)
    }

    #[test]
    fn empty_and_cancel_are_silent() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(n.normalize(Reply::Empty), Outcome::Silent);
        assert_eq!(n.normalize(Reply::Cancel), Outcome::Silent);
    }

    #[test]
    fn plain_text_posts_under_bot() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(
            n.normalize(Reply::text("Fire in the Bowl!! 🔥")),
            Outcome::bot_text("Fire in the Bowl!! 🔥")
        );
    }

    #[test]
    fn modal_payload_passes_verbatim() {
        let n = normalizer(Arc::new(FailingUploader));
        let payload = json!({"open_modal": true, "prompt": "a cat", "steps": 35});
        assert_eq!(
            n.normalize(Reply::Modal(payload.clone())),
            Outcome::ShowModal { payload }
        );
    }

    #[test]
    fn image_bytes_are_uploaded_and_posted_as_media() {
        let uploader = Arc::new(FixedUploader::new("http://lan/uploads/abc.jpg"));
        let n = normalizer(uploader.clone());

        let outcome = n.normalize(Reply::Image(ImageReply::jpeg(vec![0xff, 0xd8, 0xff])));
        assert_eq!(
            outcome,
            Outcome::Media {
                sender: BOT_SENDER.to_string(),
                body: "http://lan/uploads/abc.jpg".to_string(),
                image_url: Some("http://lan/uploads/abc.jpg".to_string()),
                thumbnail_url: None,
            }
        );

        let filename = uploader.seen_filename.lock().unwrap().clone().unwrap();
        assert!(filename.starts_with("generated_image_"));
        assert!(filename.ends_with(".jpg"));
    }

    #[test]
    fn upload_failure_degrades_to_visible_text() {
        let n = normalizer(Arc::new(FailingUploader));
        let outcome = n.normalize(Reply::Image(ImageReply::jpeg(vec![1, 2, 3])));
        match outcome {
            Outcome::Text { sender, body } => {
                assert_eq!(sender, BOT_SENDER);
                assert!(
                    body.starts_with("Failed to upload image:"),
                    "body was {:?}",
                    body
                );
                assert!(body.contains("service offline"));
            }
            other => panic!("expected text outcome, got {:?}", other),
        }
    }

    #[test]
    fn message_reply_defaults_to_bot_sender() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(
            n.normalize(Reply::Message(MessageReply::new("hi"))),
            Outcome::bot_text("hi")
        );
    }

    #[test]
    fn message_reply_with_media_fields() {
        let n = normalizer(Arc::new(FailingUploader));
        let reply = MessageReply::new("Image generated: a cat")
            .with_sender("alice")
            .with_media("http://lan/u/full.jpg", "http://lan/u/thumb.jpg");
        assert_eq!(
            n.normalize(Reply::Message(reply)),
            Outcome::Media {
                sender: "alice".to_string(),
                body: "Image generated: a cat".to_string(),
                image_url: Some("http://lan/u/full.jpg".to_string()),
                thumbnail_url: Some("http://lan/u/thumb.jpg".to_string()),
            }
        );
    }

    #[test]
    fn json_null_is_silent() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(n.normalize(Reply::Json(Value::Null)), Outcome::Silent);
    }

    #[test]
    fn json_string_is_bot_text() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(
            n.normalize(Reply::Json(json!("plain"))),
            Outcome::bot_text("plain")
        );
    }

    #[test]
    fn json_modal_flag_counts_by_presence() {
        let n = normalizer(Arc::new(FailingUploader));
        // Even a false-valued flag opens the modal; presence is the contract.
        let payload = json!({"open_modal": false, "prompt": ""});
        assert_eq!(
            n.normalize(Reply::Json(payload.clone())),
            Outcome::ShowModal { payload }
        );
    }

    #[test]
    fn json_cancel_true_is_silent() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(
            n.normalize(Reply::Json(json!({"cancel": true}))),
            Outcome::Silent
        );
        // A false cancel flag does not swallow the message.
        assert_eq!(
            n.normalize(Reply::Json(json!({"cancel": false, "message": "kept"}))),
            Outcome::bot_text("kept")
        );
    }

    #[test]
    fn json_message_object_maps_to_post() {
        let n = normalizer(Arc::new(FailingUploader));
        let outcome = n.normalize(Reply::Json(json!({
            "message": "http://lan/u/pic.jpg",
            "sender": "Bot",
            "is_media": true,
            "image_url": "http://lan/u/pic.jpg",
            "thumbnail_url": "http://lan/u/pic_thumb.jpg",
        })));
        assert_eq!(
            outcome,
            Outcome::Media {
                sender: "Bot".to_string(),
                body: "http://lan/u/pic.jpg".to_string(),
                image_url: Some("http://lan/u/pic.jpg".to_string()),
                thumbnail_url: Some("http://lan/u/pic_thumb.jpg".to_string()),
            }
        );
    }

    #[test]
    fn message_object_and_plain_string_agree() {
        let n = normalizer(Arc::new(FailingUploader));
        let as_object = n.normalize(Reply::Json(json!({"message": "hi", "is_media": false})));
        let as_string = n.normalize(Reply::Json(json!("hi")));
        assert_eq!(as_object, Outcome::bot_text("hi"));
        assert_eq!(as_object, as_string);
    }

    #[test]
    fn json_fallback_is_stringified() {
        let n = normalizer(Arc::new(FailingUploader));
        assert_eq!(n.normalize(Reply::Json(json!(42))), Outcome::bot_text("42"));
        assert_eq!(
            n.normalize(Reply::Json(json!({"status": "ok"}))),
            Outcome::bot_text(r#"{"status":"ok"}"#)
        );
    }
}
