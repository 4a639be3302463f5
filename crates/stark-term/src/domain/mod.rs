//! Core domain logic for the terminal client.
//!
//! This module holds the session and message models, the session store, and
//! the services that move messages between the UI and the STARK service.

pub mod models;
pub mod services;
