#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use chrono::Utc;

use crate::domain::models::derive_title;
use crate::domain::models::Envelope;
use crate::domain::models::Message;
use crate::domain::models::Session;

/// Owns every chat session and tracks which one is active. All mutations go
/// through this type; ids it does not know are tolerated as no-ops.
#[derive(Debug, Default)]
pub struct Sessions {
    sessions: Vec<Session>,
    active_id: String,
    welcome_text: Option<String>,
}

impl Sessions {
    /// Rebuilds the store from a loaded envelope. Duplicate ids keep their
    /// first occurrence, an empty list gets a default session, and a dangling
    /// active id falls back to the first session.
    pub fn hydrate(envelope: Option<Envelope>) -> Sessions {
        let mut store = Sessions::default();

        if let Some(envelope) = envelope {
            for session in envelope.sessions {
                if store.get(&session.id).is_some() {
                    tracing::warn!(session_id = session.id, "dropping duplicate session");
                    continue;
                }
                store.sessions.push(session);
            }
            store.active_id = envelope.active_id;
        }

        if store.sessions.is_empty() {
            store.create_session();
        }

        if store.get(&store.active_id).is_none() {
            tracing::warn!(
                active_id = store.active_id,
                "active session missing, selecting first session"
            );
            store.active_id = store.sessions[0].id.to_string();
        }

        return store;
    }

    /// Millisecond timestamp, bumped until it is unused.
    pub fn create_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }

        return millis.to_string();
    }

    pub fn create_session(&mut self) -> &Session {
        let greeting = Message::greeting(self.welcome_text.as_deref());
        let session = Session::new(self.create_id(), greeting);
        tracing::debug!(session_id = session.id, "created session");

        self.active_id = session.id.to_string();
        self.sessions.insert(0, session);
        return &self.sessions[0];
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        return self.sessions.iter().find(|e| return e.id == id);
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        return self.sessions.iter_mut().find(|e| return e.id == id);
    }

    /// Replaces the session with the same id in place, or inserts it at the
    /// front.
    pub fn upsert(&mut self, session: Session) {
        if let Some(existing) = self.get_mut(&session.id) {
            *existing = session;
            return;
        }

        self.sessions.insert(0, session);
    }

    /// Raw removal. Leaves the active id and the non-empty guarantee to
    /// `delete_session`.
    pub fn delete(&mut self, id: &str) -> Option<Session> {
        let idx = self.sessions.iter().position(|e| return e.id == id)?;
        return Some(self.sessions.remove(idx));
    }

    pub fn delete_session(&mut self, id: &str) {
        if self.delete(id).is_none() {
            return;
        }
        tracing::debug!(session_id = id, "deleted session");

        if self.sessions.is_empty() {
            self.create_session();
            return;
        }

        if self.active_id == id {
            self.active_id = self.sessions[0].id.to_string();
        }
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        self.active_id = id.to_string();
        return true;
    }

    /// Appends to the target session only. Returns false when the session
    /// no longer exists.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        if let Some(session) = self.get_mut(session_id) {
            session.messages.push(message);
            return true;
        }

        tracing::warn!(session_id, "dropping message for missing session");
        return false;
    }

    pub fn rename_if_default(&mut self, session_id: &str, candidate: &str) -> bool {
        let title = derive_title(candidate);
        if title.is_empty() {
            return false;
        }

        if let Some(session) = self.get_mut(session_id) {
            if session.has_default_title() {
                session.title = title;
                return true;
            }
        }

        return false;
    }

    /// Caches the server welcome and upgrades every greeting that still holds
    /// the fallback text and nothing else. Returns the number of sessions
    /// touched; a second call with the same text touches none.
    pub fn apply_welcome(&mut self, text: &str) -> usize {
        self.welcome_text = Some(text.to_string());

        let mut touched = 0;
        for session in self.sessions.iter_mut() {
            if !session.holds_only_fallback_greeting() {
                continue;
            }

            let greeting = &mut session.messages[0];
            greeting.text = text.to_string();
            greeting.fallback = false;
            touched += 1;
        }

        return touched;
    }

    pub fn welcome_text(&self) -> Option<&str> {
        return self.welcome_text.as_deref();
    }

    pub fn active(&self) -> Option<&Session> {
        return self.get(&self.active_id);
    }

    pub fn active_id(&self) -> &str {
        return &self.active_id;
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        return self.sessions.iter().position(|e| return e.id == id);
    }

    pub fn list(&self) -> &[Session] {
        return &self.sessions;
    }

    pub fn len(&self) -> usize {
        return self.sessions.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.sessions.is_empty();
    }

    pub fn to_envelope(&self) -> Envelope {
        return Envelope {
            sessions: self.sessions.clone(),
            active_id: self.active_id.to_string(),
        };
    }
}
