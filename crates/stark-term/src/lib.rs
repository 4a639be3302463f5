//! Terminal chat client for the STARK invoice assistant.
//!
//! This crate keeps a list of chat sessions persisted to a local JSON slot,
//! forwards questions and invoice uploads to the STARK question-answering
//! service, and renders the conversation in a terminal UI.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{
    Action, Author, Envelope, Event, ExchangeClient, ExchangeError, Message, Session,
    SessionStorage,
};
pub use domain::services::{AppStateProps, Persistence, Sessions};
