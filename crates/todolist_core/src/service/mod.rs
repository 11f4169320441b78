//! Core use-case services.
//!
//! # Responsibility
//! - Put one locking boundary around list state for multi-threaded callers.
//! - Keep CLI and other callers decoupled from list internals.

pub mod list_service;
