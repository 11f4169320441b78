//! Ordered task collections.
//!
//! # Responsibility
//! - Keep task records in sort-key order under insert/remove/edit.
//!
//! # Invariants
//! - Lists are single-threaded; callers serialize access (see `service`).

pub mod sorted_list;
