//! LRU Tracker Module
//!
//! Keeps the recency order of cache keys.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks keys by recency of touch.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently touched
/// - Back = Least recently touched (next eviction victim)
///
/// A key appears at most once.
#[derive(Debug)]
pub struct LruTracker<K> {
    order: VecDeque<K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently touched key.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Iter ==
    /// Iterates keys from most to least recently touched.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }
}

impl<K: PartialEq + Clone> LruTracker<K> {
    // == Touch ==
    /// Moves a key to the front, inserting it if absent.
    pub fn touch(&mut self, key: &K) {
        match self.order.iter().position(|k| k == key) {
            Some(0) => {}
            Some(idx) => {
                if let Some(existing) = self.order.remove(idx) {
                    self.order.push_front(existing);
                }
            }
            None => self.order.push_front(key.clone()),
        }
    }

    // == Remove ==
    /// Removes a key. Returns false if it was not tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(idx) => {
                self.order.remove(idx);
                true
            }
            None => false,
        }
    }
}
