//! Sorted doubly linked task list.
//!
//! # Responsibility
//! - Keep task records ordered by sort key, with insertion order breaking ties.
//! - Reuse the last touched position as the search start for the next insert.
//!
//! # Invariants
//! - Walking `next` from `head` visits exactly `size` records with
//!   non-decreasing sort keys; walking `prev` from the last record reaches
//!   `head`.
//! - A one-item list has `head` set and `tail` absent.
//! - `cursor` is absent iff the list is empty, and otherwise resolves to a
//!   record in the list.
//!
//! Nodes live in a slot arena and link to each other by `NodeId`. Handles carry
//! a generation that is never reused, so a handle to a removed or cleared node
//! resolves to nothing instead of aliasing a newer node.

use crate::model::task_item::{SortKey, TaskItem};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Handle to a node in one `SortedList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Node {
    item: TaskItem,
    generation: u64,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Broken structural invariant reported by `SortedList::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListInvariantError {
    /// A link points at a node that does not resolve.
    DanglingLink { position: usize },
    /// `next`/`prev` of two neighbours disagree.
    AsymmetricLink { position: usize },
    /// Adjacent records are out of order.
    OutOfOrder {
        position: usize,
        previous: SortKey,
        current: SortKey,
    },
    /// Reachable node count differs from `size`.
    SizeMismatch { expected: usize, actual: usize },
    /// The chain does not end at the recorded tail.
    TailMismatch,
    /// The cursor is set on an empty list, unset on a non-empty one, or does
    /// not resolve.
    BadCursor,
}

impl Display for ListInvariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingLink { position } => {
                write!(f, "dangling link at position {position}")
            }
            Self::AsymmetricLink { position } => {
                write!(f, "next/prev links disagree at position {position}")
            }
            Self::OutOfOrder {
                position,
                previous,
                current,
            } => write!(
                f,
                "sort key {current} at position {position} is below previous key {previous}"
            ),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "list size is {expected} but {actual} nodes are linked")
            }
            Self::TailMismatch => write!(f, "chain does not end at the recorded tail"),
            Self::BadCursor => write!(f, "cursor does not match list contents"),
        }
    }
}

impl Error for ListInvariantError {}

/// Named list of task records kept in sort-key order.
#[derive(Debug, Clone)]
pub struct SortedList {
    name: String,
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    next_generation: u64,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    cursor: Option<NodeId>,
    size: usize,
}

impl SortedList {
    /// Creates an empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            free: Vec::new(),
            next_generation: 0,
            head: None,
            tail: None,
            cursor: None,
            size: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn head(&self) -> Option<&TaskItem> {
        self.head.and_then(|id| self.item(id))
    }

    /// Last record of a list with two or more records.
    pub fn tail(&self) -> Option<&TaskItem> {
        self.tail.and_then(|id| self.item(id))
    }

    /// Last record, including the sole record of a one-item list.
    pub fn last(&self) -> Option<&TaskItem> {
        self.tail.or(self.head).and_then(|id| self.item(id))
    }

    /// Most recently touched record.
    pub fn cursor(&self) -> Option<&TaskItem> {
        self.cursor.and_then(|id| self.item(id))
    }

    pub fn head_id(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail_id(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn cursor_id(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Resolves a handle. Stale handles resolve to `None`.
    pub fn item(&self, id: NodeId) -> Option<&TaskItem> {
        self.node(id).map(|node| &node.item)
    }

    pub fn next_id(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    pub fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.prev)
    }

    /// Places `item` by sort key after any records with an equal key.
    ///
    /// Returns `false` only when the chain is corrupt and the record could not
    /// be placed; the record is dropped in that case.
    pub fn insert(&mut self, item: TaskItem) -> bool {
        let key = item.sort_key();
        let id = self.alloc(item);

        let placed = match (self.size, self.head) {
            (0, _) => {
                self.head = Some(id);
                self.tail = None;
                true
            }
            (1, Some(head)) => self.place_beside_single(head, id, key),
            (_, Some(head)) => self.place_in_chain(head, id, key),
            (_, None) => false,
        };

        debug_assert!(placed, "sorted list `{}` could not place a record", self.name);
        if !placed {
            error!(
                "event=list_insert module=list status=error reason=unplaced size={} key={}",
                self.size, key
            );
            self.release(id);
            return false;
        }

        self.cursor = Some(id);
        self.size += 1;
        true
    }

    /// Returns the first record named `name`.
    pub fn get(&self, name: &str) -> Option<&TaskItem> {
        self.iter().find(|item| item.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes the first record named `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        self.take(name).is_some()
    }

    /// Removes the first record named `name` and hands it back.
    pub fn take(&mut self, name: &str) -> Option<TaskItem> {
        let id = self.find_id(name)?;
        self.unlink(id)
    }

    /// Applies `edit` to the first record named `name`.
    ///
    /// When the edit changes the sort key, the record is moved to its new
    /// position and sorts after existing records with an equal key.
    pub fn edit<F>(&mut self, name: &str, edit: F) -> bool
    where
        F: FnOnce(&mut TaskItem),
    {
        let Some(id) = self.find_id(name) else {
            return false;
        };
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.item.sort_key();
        edit(&mut node.item);
        if node.item.sort_key() == before {
            return true;
        }

        match self.unlink(id) {
            Some(item) => self.insert(item),
            None => false,
        }
    }

    /// Drops every record and resets the list to empty.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.cursor = None;
        self.size = 0;
        self.slots.clear();
        self.free.clear();
    }

    /// Ordered iterator over records from head to last.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.size,
        }
    }

    /// Ordered iterator over record names.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.iter().map(TaskItem::name)
    }

    /// Numbered listing of record names, one per line.
    pub fn render_listing(&self) -> String {
        if self.is_empty() {
            return "List is empty".to_string();
        }
        self.names()
            .enumerate()
            .map(|(index, name)| format!("To do {}. {}", index + 1, name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Walks the chain in both directions and checks every structural
    /// invariant.
    pub fn validate(&self) -> Result<(), ListInvariantError> {
        match (self.size, self.cursor) {
            (0, None) => {}
            (0, Some(_)) | (_, None) => return Err(ListInvariantError::BadCursor),
            (_, Some(cursor)) if self.node(cursor).is_none() => {
                return Err(ListInvariantError::BadCursor)
            }
            _ => {}
        }

        let mut count = 0;
        let mut previous: Option<(NodeId, SortKey)> = None;
        let mut at = self.head;
        while let Some(id) = at {
            let node = self
                .node(id)
                .ok_or(ListInvariantError::DanglingLink { position: count })?;
            if node.prev != previous.map(|(prev_id, _)| prev_id) {
                return Err(ListInvariantError::AsymmetricLink { position: count });
            }
            if let Some((_, previous_key)) = previous {
                if previous_key > node.item.sort_key() {
                    return Err(ListInvariantError::OutOfOrder {
                        position: count,
                        previous: previous_key,
                        current: node.item.sort_key(),
                    });
                }
            }
            count += 1;
            if count > self.size {
                return Err(ListInvariantError::SizeMismatch {
                    expected: self.size,
                    actual: count,
                });
            }
            previous = Some((id, node.item.sort_key()));
            at = node.next;
        }

        if count != self.size {
            return Err(ListInvariantError::SizeMismatch {
                expected: self.size,
                actual: count,
            });
        }

        let last = previous.map(|(id, _)| id);
        let expected_tail = if self.size <= 1 { None } else { last };
        if self.tail != expected_tail {
            return Err(ListInvariantError::TailMismatch);
        }

        let mut backwards = 0;
        let mut at = last;
        while let Some(id) = at {
            backwards += 1;
            if backwards > self.size {
                break;
            }
            at = self.prev_id(id);
        }
        if backwards != self.size {
            return Err(ListInvariantError::SizeMismatch {
                expected: self.size,
                actual: backwards,
            });
        }

        Ok(())
    }

    fn place_beside_single(&mut self, head: NodeId, id: NodeId, key: SortKey) -> bool {
        let Some(head_key) = self.key(head) else {
            return false;
        };
        if head_key > key {
            self.set_links(id, None, Some(head));
            self.set_links(head, Some(id), None);
            self.head = Some(id);
            self.tail = Some(head);
        } else {
            self.set_links(head, None, Some(id));
            self.set_links(id, Some(head), None);
            self.tail = Some(id);
        }
        true
    }

    fn place_in_chain(&mut self, head: NodeId, id: NodeId, key: SortKey) -> bool {
        let Some(tail) = self.tail else {
            return false;
        };
        let (Some(head_key), Some(tail_key)) = (self.key(head), self.key(tail)) else {
            return false;
        };

        if head_key > key {
            self.set_links(id, None, Some(head));
            self.set_prev(head, Some(id));
            self.head = Some(id);
            return true;
        }
        if key >= tail_key {
            self.set_links(id, Some(tail), None);
            self.set_next(tail, Some(id));
            self.tail = Some(id);
            return true;
        }

        // head <= key < tail from here, so both walks stop before running off
        // the chain.
        let start = self
            .cursor
            .filter(|cursor| self.node(*cursor).is_some())
            .unwrap_or(head);
        let Some(start_key) = self.key(start) else {
            return false;
        };

        let mut at = start;
        if start_key <= key {
            loop {
                let Some(next) = self.next_id(at) else {
                    return false;
                };
                let Some(next_key) = self.key(next) else {
                    return false;
                };
                if next_key > key {
                    self.splice_between(at, next, id);
                    return true;
                }
                at = next;
            }
        } else {
            loop {
                let Some(prev) = self.prev_id(at) else {
                    return false;
                };
                let Some(prev_key) = self.key(prev) else {
                    return false;
                };
                if prev_key <= key {
                    self.splice_between(prev, at, id);
                    return true;
                }
                at = prev;
            }
        }
    }

    fn unlink(&mut self, id: NodeId) -> Option<TaskItem> {
        let (prev, next) = {
            let node = self.node(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }

        let item = self.release(id)?;
        self.size -= 1;
        if self.size == 0 {
            self.clear();
        } else {
            if self.size == 1 {
                self.tail = None;
            }
            self.cursor = next.or(prev);
        }
        Some(item)
    }

    fn find_id(&self, name: &str) -> Option<NodeId> {
        let mut at = self.head;
        while let Some(id) = at {
            let node = self.node(id)?;
            if node.item.name() == name {
                return Some(id);
            }
            at = node.next;
        }
        None
    }

    fn splice_between(&mut self, prev: NodeId, next: NodeId, id: NodeId) {
        self.set_links(id, Some(prev), Some(next));
        self.set_next(prev, Some(id));
        self.set_prev(next, Some(id));
    }

    fn alloc(&mut self, item: TaskItem) -> NodeId {
        let generation = self.next_generation;
        self.next_generation += 1;
        let node = Node {
            item,
            generation,
            prev: None,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        NodeId { index, generation }
    }

    fn release(&mut self, id: NodeId) -> Option<TaskItem> {
        self.node(id)?;
        let node = self.slots.get_mut(id.index)?.take()?;
        self.free.push(id.index);
        Some(node.item)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)?
            .as_ref()
            .filter(|node| node.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)?
            .as_mut()
            .filter(|node| node.generation == id.generation)
    }

    fn key(&self, id: NodeId) -> Option<SortKey> {
        self.item(id).map(TaskItem::sort_key)
    }

    fn set_links(&mut self, id: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
            node.next = next;
        }
    }

    fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }
}

/// Head-to-last iterator over a `SortedList`.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    list: &'a SortedList,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TaskItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<'a> IntoIterator for &'a SortedList {
    type Item = &'a TaskItem;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
