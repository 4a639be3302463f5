use std::time::Duration;
use std::time::Instant;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient status-line message. Never persisted.
#[derive(Clone, Debug)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn info(text: &str) -> Notification {
        return Notification {
            level: NotificationLevel::Info,
            text: text.to_string(),
            created_at: Instant::now(),
        };
    }

    pub fn error(text: &str) -> Notification {
        return Notification {
            level: NotificationLevel::Error,
            text: text.to_string(),
            created_at: Instant::now(),
        };
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        return now.duration_since(self.created_at) >= NOTIFICATION_TTL;
    }
}
