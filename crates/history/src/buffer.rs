//! Bounded history window

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sliding window that drops its oldest entry once full
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryBuffer<T> {
    /// Entries, oldest at the front
    entries: VecDeque<T>,
    /// Maximum number of retained entries
    capacity: usize,
    /// Total entries ever pushed (for statistics)
    total_written: usize,
}

impl<T> HistoryBuffer<T> {
    /// Create a new window holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be > 0");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    /// Append an entry, evicting the oldest if the window is full
    pub fn push(&mut self, item: T) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
        self.total_written += 1;
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate entries from most recent to oldest
    pub fn iter_recent(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }

    /// Iterate entries from oldest to most recent
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// First entry, searching from the most recent, for which `f` yields a value
    pub fn find_recent<'a, U, F>(&'a self, f: F) -> Option<U>
    where
        F: FnMut(&'a T) -> Option<U>,
    {
        self.entries.iter().rev().find_map(f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries pushed since creation or the last clear
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_written = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_latest() {
        let mut buffer = HistoryBuffer::new(5);

        for i in 0..3 {
            buffer.push(i * 100);
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.latest(), Some(&200));

        let recent: Vec<_> = buffer.iter_recent().copied().collect();
        assert_eq!(recent, vec![200, 100, 0]);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = HistoryBuffer::new(3);

        for i in 0..10 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(buffer.total_written(), 10);
    }

    #[test]
    fn test_find_recent_skips_misses() {
        let mut buffer: HistoryBuffer<Option<u32>> = HistoryBuffer::new(3);
        buffer.push(Some(1));
        buffer.push(Some(2));
        buffer.push(None);

        assert_eq!(buffer.find_recent(|entry| *entry), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut buffer = HistoryBuffer::new(2);
        buffer.push("a");
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
        assert_eq!(buffer.total_written(), 0);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(capacity in 1usize..8, pushes in 0usize..64) {
            let mut buffer = HistoryBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(i);
            }
            prop_assert_eq!(buffer.len(), pushes.min(capacity));
            if pushes > 0 {
                prop_assert_eq!(buffer.latest(), Some(&(pushes - 1)));
            }
        }
    }
}
