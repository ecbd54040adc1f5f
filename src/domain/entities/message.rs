use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured key/value arguments submitted through a client form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(serde_json::Map<String, Value>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build form data from a JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str_of(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn u64_of(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn f64_of(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// True when `key` is present and set to boolean true
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Forms submitted from a dismissed dialog carry `cancel: true`
    pub fn cancelled(&self) -> bool {
        self.flag("cancel")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<serde_json::Map<String, Value>> for FormData {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Arguments handed to a command handler
///
/// Free text is whatever followed the command name on the line. A form is
/// the structured map a client submits from a modal dialog; when a message
/// carries a non-empty form it wins over the free text.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    Text(String),
    Form(FormData),
}

impl Args {
    pub fn text(&self) -> Option<&str> {
        match self {
            Args::Text(s) => Some(s),
            Args::Form(_) => None,
        }
    }

    pub fn form(&self) -> Option<&FormData> {
        match self {
            Args::Form(f) => Some(f),
            Args::Text(_) => None,
        }
    }

    /// The free text, or "" for form arguments
    pub fn text_or_empty(&self) -> &str {
        self.text().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Args::Text(s) => s.trim().is_empty(),
            Args::Form(f) => f.is_empty(),
        }
    }
}

impl From<&str> for Args {
    fn from(s: &str) -> Self {
        Args::Text(s.to_string())
    }
}

impl From<FormData> for Args {
    fn from(f: FormData) -> Self {
        Args::Form(f)
    }
}

/// An inbound chat line as the host hands it to the dispatcher
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub channel: String,
    pub sender: String,
    pub text: String,
    /// Structured form replayed from a modal submission, if any
    pub form: Option<FormData>,
}

impl ChatMessage {
    pub fn new(
        channel: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            sender: sender.into(),
            text: text.into(),
            form: None,
        }
    }

    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self
    }

    /// The form counts only when it actually has fields; an empty map is
    /// treated the same as no form at all
    pub fn effective_form(&self) -> Option<&FormData> {
        self.form.as_ref().filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_data_rejects_non_objects() {
        assert!(FormData::from_value(json!("text")).is_none());
        assert!(FormData::from_value(json!([1, 2])).is_none());
        assert!(FormData::from_value(json!({"prompt": "a cat"})).is_some());
    }

    #[test]
    fn form_data_typed_getters() {
        let form = FormData::new()
            .with("prompt", "a cat")
            .with("steps", 35)
            .with("cfg_scale", 7.5);

        assert_eq!(form.str_of("prompt"), Some("a cat"));
        assert_eq!(form.u64_of("steps"), Some(35));
        assert_eq!(form.f64_of("cfg_scale"), Some(7.5));
        assert_eq!(form.str_of("missing"), None);
    }

    #[test]
    fn cancel_flag_must_be_true() {
        assert!(FormData::new().with("cancel", true).cancelled());
        assert!(!FormData::new().with("cancel", false).cancelled());
        assert!(!FormData::new().with("cancel", "yes").cancelled());
        assert!(!FormData::new().cancelled());
    }

    #[test]
    fn empty_form_does_not_count() {
        let msg = ChatMessage::new("general", "alice", "!image cat").with_form(FormData::new());
        assert!(msg.effective_form().is_none());

        let msg = msg.with_form(FormData::new().with("prompt", "a cat"));
        assert!(msg.effective_form().is_some());
    }
}
