mod action;
mod author;
mod event;
mod exchange;
mod exchange_client;
mod message;
mod notification;
mod session;
mod session_storage;
mod slash_commands;

pub use action::*;
pub use author::*;
pub use event::*;
pub use exchange::*;
pub use exchange_client::*;
pub use message::*;
pub use notification::*;
pub use session::*;
pub use session_storage::*;
pub use slash_commands::*;
