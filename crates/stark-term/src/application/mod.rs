//! Application layer orchestrating the terminal interface.
//!
//! This module handles command-line parsing, logging setup, and the main UI
//! loop. It wires the session store and exchange client together.

pub mod cli;
pub mod ui;
