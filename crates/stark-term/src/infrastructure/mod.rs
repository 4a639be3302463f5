//! Infrastructure layer providing external integrations.
//!
//! This module contains the HTTP client for the STARK service and the
//! storage slots the session envelope is persisted to.

pub mod clients;
pub mod storage;
