use serde_json::Value;

/// Name replies are posted under when a handler does not claim one
pub const BOT_SENDER: &str = "Bot";

/// Canonical result of dispatching one chat line
///
/// Every dispatch ends in exactly one of these. Hosts switch on the variant
/// and never inspect handler output themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to post; unknown commands, empty replies and cancellations land here
    Silent,
    /// Tell the sender's client to open a modal dialog; the payload is the handler's, verbatim
    ShowModal { payload: Value },
    /// Post a text chat message
    Text { sender: String, body: String },
    /// Post a media chat message
    Media {
        sender: String,
        body: String,
        image_url: Option<String>,
        thumbnail_url: Option<String>,
    },
    /// The handler failed; hosts surface this as a visible bot post
    Error { reason: String },
}

impl Outcome {
    pub fn bot_text(body: impl Into<String>) -> Self {
        Outcome::Text {
            sender: BOT_SENDER.to_string(),
            body: body.into(),
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Outcome::Silent)
    }

    /// The chat post this outcome produces, if it produces one
    ///
    /// `Silent` and `ShowModal` post nothing. `Error` posts a visible
    /// `Error: ...` line under the bot identity.
    pub fn into_post(self) -> Option<ChatPost> {
        match self {
            Outcome::Silent | Outcome::ShowModal { .. } => None,
            Outcome::Text { sender, body } => Some(ChatPost {
                sender,
                body,
                is_media: false,
                image_url: None,
                thumbnail_url: None,
            }),
            Outcome::Media {
                sender,
                body,
                image_url,
                thumbnail_url,
            } => Some(ChatPost {
                sender,
                body,
                is_media: true,
                image_url,
                thumbnail_url,
            }),
            Outcome::Error { reason } => Some(ChatPost {
                sender: BOT_SENDER.to_string(),
                body: format!("Error: {}", reason),
                is_media: false,
                image_url: None,
                thumbnail_url: None,
            }),
        }
    }
}

/// A message ready to persist and deliver to a channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPost {
    pub sender: String,
    pub body: String,
    pub is_media: bool,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl ChatPost {
    pub fn text(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            is_media: false,
            image_url: None,
            thumbnail_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn silent_and_modal_post_nothing() {
        assert!(Outcome::Silent.into_post().is_none());
        let modal = Outcome::ShowModal {
            payload: json!({"open_modal": true}),
        };
        assert!(modal.into_post().is_none());
    }

    #[test]
    fn error_posts_visible_bot_line() {
        let post = Outcome::Error {
            reason: "boom".to_string(),
        }
        .into_post()
        .unwrap();
        assert_eq!(post.sender, BOT_SENDER);
        assert_eq!(post.body, "Error: boom");
        assert!(!post.is_media);
    }

    #[test]
    fn media_keeps_urls() {
        let post = Outcome::Media {
            sender: "Bot".to_string(),
            body: "http://lan/uploads/a.jpg".to_string(),
            image_url: Some("http://lan/uploads/a.jpg".to_string()),
            thumbnail_url: None,
        }
        .into_post()
        .unwrap();
        assert!(post.is_media);
        assert_eq!(post.image_url.as_deref(), Some("http://lan/uploads/a.jpg"));
    }
}
