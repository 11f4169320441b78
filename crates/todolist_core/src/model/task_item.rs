//! Task record domain model.
//!
//! # Responsibility
//! - Define the task record held by a sorted list.
//! - Derive the composite sort key and the lateness flag from due date and
//!   priority.
//!
//! # Invariants
//! - `sort_key` always matches the current `due_date` and `priority`.
//! - `is_late` is derived once at construction; later edits never recompute it.
//! - `id` is stable and never nil.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
pub type TaskId = Uuid;

/// Composite ordering key in `yyMMddp` decimal form.
pub type SortKey = u32;

static DUE_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2})$").expect("valid due date regex")
});

/// Urgency of a task. Lower digit sorts earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// Parses the `1|2|3` digit form.
    pub fn from_digit(digit: u8) -> Result<Self, TaskItemError> {
        match digit {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(TaskItemError::InvalidPriority(other)),
        }
    }

    /// Returns the `1|2|3` digit form.
    pub fn digit(self) -> u8 {
        self as u8
    }

    /// User-facing label used by the summary output.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Validation errors for task record construction and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskItemError {
    /// Due date is not `M/d/yy` or `MM/dd/yy`.
    InvalidDueDate(String),
    /// Priority digit is outside `1..=3`.
    InvalidPriority(u8),
    /// Caller-supplied id is nil.
    NilId,
}

impl Display for TaskItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected M/d/yy or MM/dd/yy")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected 1 (high), 2 (medium) or 3 (low)")
            }
            Self::NilId => write!(f, "task id must not be nil"),
        }
    }
}

impl Error for TaskItemError {}

/// Calendar components parsed from a due date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateParts {
    pub month: u32,
    pub day: u32,
    /// Last two digits of the year.
    pub year: u32,
}

/// Parses a `M/d/yy` or `MM/dd/yy` due date.
///
/// # Errors
/// - Returns `InvalidDueDate` unless the input has exactly three all-digit
///   `/`-separated tokens with a two-digit year.
pub fn parse_due_date(due_date: &str) -> Result<DueDateParts, TaskItemError> {
    let invalid = || TaskItemError::InvalidDueDate(due_date.to_string());
    let captures = DUE_DATE_PATTERN.captures(due_date).ok_or_else(invalid)?;
    let component = |index: usize| -> Result<u32, TaskItemError> {
        captures
            .get(index)
            .and_then(|value| value.as_str().parse::<u32>().ok())
            .ok_or_else(invalid)
    };

    Ok(DueDateParts {
        month: component(1)?,
        day: component(2)?,
        year: component(3)?,
    })
}

/// Builds the sort key from parsed date parts and priority.
///
/// Equivalent to concatenating `yy`, zero-padded `MM`, zero-padded `dd` and
/// the priority digit, then reading the result as a decimal integer.
pub fn sort_key_from_parts(parts: DueDateParts, priority: Priority) -> SortKey {
    parts.year * 100_000 + parts.month * 1_000 + parts.day * 10 + u32::from(priority.digit())
}

/// Derives the sort key for a due date string and priority.
pub fn compute_sort_key(due_date: &str, priority: Priority) -> Result<SortKey, TaskItemError> {
    parse_due_date(due_date).map(|parts| sort_key_from_parts(parts, priority))
}

/// Decides lateness by comparing the full keys of `today` and the due date.
///
/// `today` is keyed with the record's own priority digit, so a task due today
/// counts as late. `None` means the current date is unavailable and yields
/// `false`.
pub fn compute_is_late(sort_key: SortKey, priority: Priority, today: Option<NaiveDate>) -> bool {
    let Some(today) = today else {
        return false;
    };
    let parts = DueDateParts {
        month: today.month(),
        day: today.day(),
        year: today.year().rem_euclid(100) as u32,
    };
    let today_key = sort_key_from_parts(parts, priority);
    today_key >= sort_key
}

/// A task record ordered by due date, then priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskItemWire")]
pub struct TaskItem {
    id: TaskId,
    name: String,
    due_date: String,
    priority: Priority,
    notes: String,
    is_done: bool,
    is_late: bool,
    sort_key: SortKey,
}

#[derive(Deserialize)]
struct TaskItemWire {
    id: TaskId,
    name: String,
    due_date: String,
    priority: Priority,
    notes: String,
    #[serde(default)]
    is_done: bool,
    #[serde(default)]
    is_late: bool,
}

impl TryFrom<TaskItemWire> for TaskItem {
    type Error = TaskItemError;

    fn try_from(wire: TaskItemWire) -> Result<Self, Self::Error> {
        if wire.id.is_nil() {
            return Err(TaskItemError::NilId);
        }
        let sort_key = compute_sort_key(&wire.due_date, wire.priority)?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            due_date: wire.due_date,
            priority: wire.priority,
            notes: wire.notes,
            is_done: wire.is_done,
            is_late: wire.is_late,
            sort_key,
        })
    }
}

impl TaskItem {
    /// Creates a record with a generated id, judging lateness against the
    /// local calendar date.
    ///
    /// # Errors
    /// - Returns `InvalidDueDate` when `due_date` cannot be parsed.
    pub fn new(
        name: impl Into<String>,
        due_date: impl Into<String>,
        priority: Priority,
        notes: impl Into<String>,
    ) -> Result<Self, TaskItemError> {
        Self::new_at(name, due_date, priority, notes, today())
    }

    /// Creates a record judging lateness against `today`.
    ///
    /// `None` for `today` marks the record not late.
    pub fn new_at(
        name: impl Into<String>,
        due_date: impl Into<String>,
        priority: Priority,
        notes: impl Into<String>,
        today: Option<NaiveDate>,
    ) -> Result<Self, TaskItemError> {
        Self::build(Uuid::new_v4(), name.into(), due_date.into(), priority, notes.into(), today)
    }

    /// Creates a record with a caller-provided stable id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: TaskId,
        name: impl Into<String>,
        due_date: impl Into<String>,
        priority: Priority,
        notes: impl Into<String>,
    ) -> Result<Self, TaskItemError> {
        if id.is_nil() {
            return Err(TaskItemError::NilId);
        }
        Self::build(id, name.into(), due_date.into(), priority, notes.into(), today())
    }

    fn build(
        id: TaskId,
        name: String,
        due_date: String,
        priority: Priority,
        notes: String,
        today: Option<NaiveDate>,
    ) -> Result<Self, TaskItemError> {
        let sort_key = compute_sort_key(&due_date, priority)?;
        Ok(Self {
            id,
            name,
            due_date,
            priority,
            notes,
            is_done: false,
            is_late: compute_is_late(sort_key, priority, today),
            sort_key,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Completion flag.
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn is_late(&self) -> bool {
        self.is_late
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the due date and re-derives the sort key.
    ///
    /// Lateness is left as is. On error the record is unchanged.
    pub fn set_due_date(&mut self, due_date: impl Into<String>) -> Result<(), TaskItemError> {
        let due_date = due_date.into();
        self.sort_key = compute_sort_key(&due_date, self.priority)?;
        self.due_date = due_date;
        Ok(())
    }

    /// Replaces the priority and re-derives the sort key.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.sort_key = self.sort_key - self.sort_key % 10 + u32::from(priority.digit());
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Overrides the derived lateness flag.
    pub fn set_is_late(&mut self, is_late: bool) {
        self.is_late = is_late;
    }

    pub fn set_is_done(&mut self, is_done: bool) {
        self.is_done = is_done;
    }

    /// Orders two records by sort key only.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.sort_key.cmp(&other.sort_key)
    }

    /// Multi-line human-readable summary.
    pub fn all_info(&self) -> String {
        format!(
            "Name: {}\nDue Date: {}\nPriority: {}\nNotes: {}\nLate: {}\nItem Complete: {}",
            self.name,
            self.due_date,
            self.priority.label(),
            self.notes,
            yes_no(self.is_late),
            yes_no(self.is_done),
        )
    }
}

impl Display for TaskItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.all_info())
    }
}

fn today() -> Option<NaiveDate> {
    Some(Local::now().date_naive())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
