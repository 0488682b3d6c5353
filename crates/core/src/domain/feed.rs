// Message Feed & Activity Log

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Display classification of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
    Success,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One line of the activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time, `HH:MM:SS`
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
            severity,
        }
    }
}

/// A simulated received message (opaque text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(String);

impl Message {
    /// Synthetic message produced by one consume tick
    pub fn received(timestamp: &str, token: &str) -> Self {
        Self(format!("[{}] Message received: {}", timestamp, token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Newest-first list that evicts its oldest items past `capacity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedFeed<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedFeed<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    /// Most recent item
    pub fn latest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Items, newest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
