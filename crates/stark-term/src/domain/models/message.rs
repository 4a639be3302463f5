#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Author;

/// Sentinel id held by the opening greeting of every session.
pub const GREETING_ID: &str = "greeting";

pub const FALLBACK_GREETING: &str =
    "Hello! I'm STARK, your AI assistant. How can I help you today?";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub struct FileDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Author,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileDescriptor>,
    /// Set while the greeting still holds the fixed text instead of the
    /// server welcome.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl Message {
    pub fn new(sender: Author, text: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            text: text.to_string().replace('\t', "  "),
            sender,
            timestamp: Utc::now(),
            file: None,
            fallback: false,
        };
    }

    pub fn with_file(sender: Author, text: &str, file: FileDescriptor) -> Message {
        let mut message = Message::new(sender, text);
        message.file = Some(file);
        return message;
    }

    /// Builds the opening greeting. Without a welcome text the fallback
    /// greeting is used and marked so it can be upgraded later.
    pub fn greeting(welcome: Option<&str>) -> Message {
        let mut message = Message::new(Author::Ai, welcome.unwrap_or(FALLBACK_GREETING));
        message.id = GREETING_ID.to_string();
        message.fallback = welcome.is_none();
        return message;
    }

    pub fn is_fallback_greeting(&self) -> bool {
        return self.id == GREETING_ID && self.fallback;
    }

    /// Text used for the session title when this message is the first one
    /// the user sends.
    pub fn title_candidate(&self) -> String {
        let text = self.text.trim();
        if text.is_empty() {
            if let Some(file) = &self.file {
                return file.name.to_string();
            }
        }

        return text.to_string();
    }
}
