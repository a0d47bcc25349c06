use std::collections::VecDeque;

use crate::models::ConfirmedGesture;

/// The most recent confirmed gestures, newest first. The oldest entry falls
/// off silently once the buffer is full. Deliberately not cleared on
/// stop/start; it lives as long as the owning view does.
#[derive(Debug)]
pub struct HistoryBuffer {
    entries: VecDeque<ConfirmedGesture>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: ConfirmedGesture) {
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot for display, newest first.
    pub fn entries(&self) -> Vec<ConfirmedGesture> {
        self.entries.iter().cloned().collect()
    }
}
