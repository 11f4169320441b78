//! Core domain logic for the to-do list.
//! This crate is the single source of truth for task ordering invariants.

pub mod list;
pub mod logging;
pub mod model;
pub mod service;

pub use list::sorted_list::{Iter, ListInvariantError, NodeId, SortedList};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::task_item::{
    compute_is_late, compute_sort_key, parse_due_date, DueDateParts, Priority, SortKey, TaskId,
    TaskItem, TaskItemError,
};
pub use service::list_service::{ServiceError, TaskListService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
