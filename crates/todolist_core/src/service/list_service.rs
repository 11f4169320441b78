//! Task list use-case service.
//!
//! # Responsibility
//! - Own one `SortedList` behind a single mutual-exclusion boundary.
//! - Validate caller input before it reaches list operations.
//! - Emit metadata-only diagnostics for every mutation.
//!
//! # Invariants
//! - Every list access goes through the one `Mutex`; no lock is held across
//!   calls.
//! - Names are unique within the service's list.
//! - Reads return owned snapshots, never references into the list.

use crate::list::sorted_list::SortedList;
use crate::model::task_item::{parse_due_date, Priority, TaskId, TaskItem, TaskItemError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

/// Errors from task list service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Another task already uses this name.
    DuplicateName(String),
    /// No task with this name exists.
    TaskNotFound(String),
    /// Record-level validation failure.
    Item(TaskItemError),
    /// The list refused to place the record.
    Unplaced,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "task name must not be blank"),
            Self::DuplicateName(name) => write!(f, "task name already in use: {name}"),
            Self::TaskNotFound(name) => write!(f, "task not found: {name}"),
            Self::Item(err) => write!(f, "{err}"),
            Self::Unplaced => write!(f, "task could not be placed in the list"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskItemError> for ServiceError {
    fn from(value: TaskItemError) -> Self {
        Self::Item(value)
    }
}

/// Thread-safe facade over one named task list.
#[derive(Debug)]
pub struct TaskListService {
    list: Mutex<SortedList>,
}

impl TaskListService {
    /// Creates a service over an empty list.
    pub fn new(list_name: impl Into<String>) -> Self {
        Self::from_list(SortedList::new(list_name))
    }

    /// Wraps an existing list.
    pub fn from_list(list: SortedList) -> Self {
        Self {
            list: Mutex::new(list),
        }
    }

    /// Consumes the service and returns the list.
    pub fn into_list(self) -> SortedList {
        self.list
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn list_name(&self) -> String {
        self.lock().name().to_string()
    }

    /// Creates and inserts a task from raw caller input.
    ///
    /// # Contract
    /// - `name` is trimmed and must not be blank or already in use.
    /// - `priority_digit` is `1|2|3`.
    /// - Returns the new task id.
    pub fn add_task(
        &self,
        name: &str,
        due_date: &str,
        priority_digit: u8,
        notes: &str,
    ) -> Result<TaskId, ServiceError> {
        let name = normalize_name(name)?;
        let priority = Priority::from_digit(priority_digit)?;
        let item = TaskItem::new(name, due_date, priority, notes)?;
        self.insert(item)
    }

    /// Inserts a caller-built record.
    pub fn insert(&self, item: TaskItem) -> Result<TaskId, ServiceError> {
        if item.name().trim().is_empty() {
            return Err(ServiceError::InvalidName);
        }
        let mut list = self.lock();
        if list.contains(item.name()) {
            return Err(ServiceError::DuplicateName(item.name().to_string()));
        }

        let id = item.id();
        let is_late = item.is_late();
        if !list.insert(item) {
            return Err(ServiceError::Unplaced);
        }
        info!(
            "event=task_insert module=service status=ok task_id={} late={} size={}",
            id,
            is_late,
            list.size()
        );
        Ok(id)
    }

    /// Removes a task by name.
    pub fn remove_task(&self, name: &str) -> Result<TaskItem, ServiceError> {
        let mut list = self.lock();
        let item = list
            .take(name)
            .ok_or_else(|| ServiceError::TaskNotFound(name.to_string()))?;
        info!(
            "event=task_remove module=service status=ok task_id={} size={}",
            item.id(),
            list.size()
        );
        Ok(item)
    }

    /// Marks a task complete.
    pub fn complete_task(&self, name: &str) -> Result<(), ServiceError> {
        self.edit(name, "task_complete", |item| {
            item.set_is_done(true);
            Ok(())
        })
    }

    /// Moves a task to a new due date and priority.
    ///
    /// The task is re-placed after any tasks sharing its new key. On
    /// validation failure the task is left untouched.
    pub fn reschedule_task(
        &self,
        name: &str,
        due_date: &str,
        priority_digit: u8,
    ) -> Result<(), ServiceError> {
        let priority = Priority::from_digit(priority_digit)?;
        parse_due_date(due_date)?;
        self.edit(name, "task_reschedule", |item| {
            item.set_due_date(due_date)?;
            item.set_priority(priority);
            Ok(())
        })
    }

    pub fn get_task(&self, name: &str) -> Option<TaskItem> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// Ordered snapshot of every task.
    pub fn list_tasks(&self) -> Vec<TaskItem> {
        self.lock().iter().cloned().collect()
    }

    /// Ordered snapshot of late tasks that are not done.
    pub fn late_tasks(&self) -> Vec<TaskItem> {
        self.lock()
            .iter()
            .filter(|item| item.is_late() && !item.is_done())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        let mut list = self.lock();
        let dropped = list.size();
        list.clear();
        info!(
            "event=list_clear module=service status=ok dropped={}",
            dropped
        );
    }

    pub fn render_listing(&self) -> String {
        self.lock().render_listing()
    }

    fn edit<F>(&self, name: &str, event: &str, apply: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut TaskItem) -> Result<(), TaskItemError>,
    {
        let mut list = self.lock();
        let mut outcome = Ok(());
        let mut task_id = None;
        let found = list.edit(name, |item| {
            task_id = Some(item.id());
            outcome = apply(item);
        });
        if !found {
            return Err(if task_id.is_some() {
                ServiceError::Unplaced
            } else {
                ServiceError::TaskNotFound(name.to_string())
            });
        }
        outcome?;

        if let Some(task_id) = task_id {
            info!(
                "event={} module=service status=ok task_id={}",
                event, task_id
            );
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SortedList> {
        self.list.lock().unwrap_or_else(|poisoned| {
            warn!("event=lock_recover module=service status=error reason=poisoned");
            poisoned.into_inner()
        })
    }
}

fn normalize_name(value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
