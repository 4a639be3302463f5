use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Persistence;
use super::Sessions;
use crate::domain::models::describe_file;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Notification;
use crate::domain::models::SendOutcome;
use crate::domain::models::SessionStorageBox;
use crate::domain::models::SlashCommand;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Start a new chat.
- /switch (/s) [NUMBER] - Switch to the chat at NUMBER in the sidebar.
- /delete (/d) [NUMBER?] - Delete the chat at NUMBER, or the current chat.
- /upload (/u) [PATH] [QUESTION?] - Upload an invoice, optionally asking a question about it.
- /clear - Remove the uploaded invoice from the STARK service.
- /help (/h) - Toggle this help.
- /quit /exit (/q) - Exit STARK.

HOTKEYS:
- Enter - Send.
- CTRL+O - Insert a line break at the cursor position.
- CTRL+N - Start a new chat.
- Up/Down, CTRL+U/CTRL+D, PageUp/PageDown - Scroll.
- CTRL+C - Exit.
"#;

    text.trim().to_string()
}

pub struct AppStateProps {
    pub storage: SessionStorageBox,
}

/// Everything the UI task owns. Mutations persist through the write-through
/// mirror before returning.
pub struct AppState {
    pub context_loaded: bool,
    pub help_visible: bool,
    pub notification: Option<Notification>,
    pub persistence: Persistence,
    pub scroll: usize,
    pub sending: HashSet<String>,
    pub sessions: Sessions,
}

impl AppState {
    pub async fn new(props: AppStateProps) -> AppState {
        let mut persistence = Persistence::new(props.storage);
        let envelope = persistence.load().await;

        let app_state = AppState {
            context_loaded: false,
            help_visible: false,
            notification: None,
            persistence,
            scroll: 0,
            sending: HashSet::new(),
            sessions: Sessions::hydrate(envelope),
        };
        app_state.persist().await;

        return app_state;
    }

    pub async fn persist(&self) {
        self.persistence.save(&self.sessions.to_envelope()).await;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if let Some(notification) = &self.notification {
            if notification.is_expired(now) {
                self.notification = None;
            }
        }
    }

    pub fn is_sending(&self) -> bool {
        return self.sending.contains(self.sessions.active_id());
    }

    /// The send control accepts text, a file, or both, while no send is
    /// running for the active session.
    pub fn can_submit(&self, text: &str, file: Option<&Path>) -> bool {
        if self.is_sending() {
            return false;
        }

        return !text.trim().is_empty() || file.is_some();
    }

    pub async fn submit(
        &mut self,
        text: &str,
        file: Option<PathBuf>,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        if !self.can_submit(text, file.as_deref()) {
            return Ok(false);
        }

        let session_id = self.sessions.active_id().to_string();
        let text = text.trim();
        let message = match &file {
            Some(path) => Message::with_file(Author::User, text, describe_file(path)),
            None => Message::new(Author::User, text),
        };
        let candidate = message.title_candidate();

        self.sessions.append_message(&session_id, message);
        self.sessions.rename_if_default(&session_id, &candidate);
        self.sending.insert(session_id.to_string());
        self.scroll = 0;
        self.persist().await;

        tx.send(Action::Submit {
            session_id,
            text: text.to_string(),
            file,
        })?;

        return Ok(true);
    }

    pub fn clear_context(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        tx.send(Action::ClearContext {
            session_id: self.sessions.active_id().to_string(),
        })?;

        return Ok(());
    }

    pub async fn new_session(&mut self) {
        self.sessions.create_session();
        self.scroll = 0;
        self.persist().await;
    }

    pub async fn switch_session(&mut self, id: &str) -> bool {
        if !self.sessions.set_active(id) {
            return false;
        }

        self.scroll = 0;
        self.persist().await;
        return true;
    }

    pub async fn delete_session(&mut self, id: &str) {
        self.sessions.delete_session(id);
        self.sending.remove(id);
        self.scroll = 0;
        self.persist().await;
    }

    /// Applies a worker event. Replies go to the session that was active when
    /// the request was made; replies for deleted sessions are dropped.
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::InitSucceeded(reply) => {
                self.context_loaded = reply.context_loaded;
                if let Some(welcome) = reply.welcome_text {
                    if self.sessions.apply_welcome(&welcome) > 0 {
                        self.persist().await;
                    }
                }
            }
            Event::InitFailed(err) => {
                self.notify(Notification::error(&format!(
                    "Could not connect to STARK: {err}"
                )));
            }
            Event::AssistantReply {
                session_id,
                message,
                context_loaded,
            } => {
                if let Some(context_loaded) = context_loaded {
                    self.context_loaded = context_loaded;
                }
                if self.sessions.append_message(&session_id, message) {
                    self.persist().await;
                }
            }
            Event::SendSettled {
                session_id,
                outcome,
            } => {
                self.sending.remove(&session_id);
                if let SendOutcome::Failure(reason) = outcome {
                    self.notify(Notification::error(&format!("Message failed: {reason}")));
                }
            }
            Event::ContextCleared {
                session_id,
                message,
            } => {
                self.context_loaded = false;
                if self.sessions.append_message(&session_id, message) {
                    self.persist().await;
                }
                self.notify(Notification::info("Invoice context cleared."));
            }
            Event::ClearFailed(err) => {
                self.notify(Notification::error(&format!(
                    "Could not clear invoice: {err}"
                )));
            }
            _ => {}
        }
    }

    /// Returns `(should_break, should_continue)`: quit the loop, or skip
    /// sending the input as a message.
    pub async fn handle_slash_commands(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, true));
        }

        if command.is_help() {
            self.help_visible = !self.help_visible;
        } else if command.is_new() {
            self.new_session().await;
        } else if command.is_switch() {
            match self.session_id_at(command.index_arg()) {
                Some(id) => {
                    self.switch_session(&id).await;
                }
                None => self.notify(Notification::error("Usage: /switch NUMBER")),
            }
        } else if command.is_delete() {
            let id = if command.args.is_empty() {
                Some(self.sessions.active_id().to_string())
            } else {
                self.session_id_at(command.index_arg())
            };
            match id {
                Some(id) => self.delete_session(&id).await,
                None => self.notify(Notification::error("No chat with that number")),
            }
        } else if command.is_upload() {
            match command.args.first() {
                Some(path) => {
                    let text = command.trailing_text();
                    if !self.submit(&text, Some(PathBuf::from(path)), tx).await? {
                        self.notify(Notification::error("Wait for the current reply first"));
                    }
                }
                None => self.notify(Notification::error("Usage: /upload PATH [QUESTION]")),
            }
        } else if command.is_clear() {
            self.clear_context(tx)?;
        } else {
            self.notify(Notification::error(&format!(
                "Unknown command {}, try /help",
                command.command
            )));
        }

        return Ok((false, true));
    }

    fn session_id_at(&self, idx: Option<usize>) -> Option<String> {
        let session = self.sessions.list().get(idx?)?;
        return Some(session.id.to_string());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
