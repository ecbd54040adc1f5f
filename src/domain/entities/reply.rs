use serde_json::Value;
use uuid::Uuid;

/// What a command handler hands back to the dispatcher
///
/// This is the whole vocabulary a handler can speak; the normalizer folds
/// every variant into a canonical [`Outcome`](super::Outcome). `Json` is the
/// escape hatch for handlers that assemble a response dynamically, resolved
/// by the same precedence the typed variants get.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to say
    Empty,
    /// Plain chat text, posted under the bot identity
    Text(String),
    /// A chat message with explicit sender/media fields
    Message(MessageReply),
    /// Ask the client to open a modal dialog with this payload
    Modal(Value),
    /// The user backed out; drop the invocation silently
    Cancel,
    /// Raw image bytes for the uploader
    Image(ImageReply),
    /// Dynamically assembled JSON response
    Json(Value),
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Reply::Text(body.into())
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

/// Chat message reply with optional overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageReply {
    pub text: String,
    /// Name to post under; defaults to the bot identity
    pub sender: Option<String>,
    pub is_media: bool,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl MessageReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_media(
        mut self,
        image_url: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        self.is_media = true;
        self.image_url = Some(image_url.into());
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }
}

impl From<MessageReply> for Reply {
    fn from(m: MessageReply) -> Self {
        Reply::Message(m)
    }
}

/// Raw image bytes, uploaded by the normalizer before posting
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReply {
    pub data: Vec<u8>,
    pub content_type: String,
    /// Upload filename; a random one is generated when absent
    pub filename: Option<String>,
}

impl ImageReply {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: "image/jpeg".to_string(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Filename to upload under, generating a unique one when unset
    pub fn upload_filename(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None => format!("generated_image_{}.jpg", Uuid::new_v4()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_filenames_are_unique() {
        let img = ImageReply::jpeg(vec![0xff, 0xd8]);
        let a = img.upload_filename();
        let b = img.upload_filename();
        assert!(a.starts_with("generated_image_"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn explicit_filename_wins() {
        let img = ImageReply::jpeg(vec![]).with_filename("chicken.jpg");
        assert_eq!(img.upload_filename(), "chicken.jpg");
    }
}
