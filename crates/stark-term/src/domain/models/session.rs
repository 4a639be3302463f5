use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Message;

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_LENGTH: usize = 20;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, greeting: Message) -> Session {
        return Session {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: vec![greeting],
            created_at: Utc::now(),
        };
    }

    pub fn has_default_title(&self) -> bool {
        return self.title == DEFAULT_TITLE;
    }

    /// True while the greeting is the only message and still holds the
    /// fallback text.
    pub fn holds_only_fallback_greeting(&self) -> bool {
        return self.messages.len() == 1 && self.messages[0].is_fallback_greeting();
    }
}

/// First twenty characters of `text`, with an ellipsis when cut.
pub fn derive_title(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > TITLE_LENGTH {
        let head: String = text.chars().take(TITLE_LENGTH).collect();
        return format!("{head}...");
    }

    return text.to_string();
}

/// The single blob written to durable storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub sessions: Vec<Session>,
    pub active_id: String,
}
