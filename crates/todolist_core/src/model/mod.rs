//! Task record model.
//!
//! # Responsibility
//! - Define the record stored by sorted lists.
//! - Keep sort-key and lateness derivation next to the fields they read.
//!
//! # Invariants
//! - A record's sort key is a pure function of its due date and priority.

pub mod task_item;
