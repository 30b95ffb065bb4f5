//! Edge detection over raw held/released key samples.
use std::{collections::HashMap, hash::Hash};

/// Converts a continuous "key is down" signal into a single press per physical press.
///
/// The detector only remembers the previous sample of each key, so each key must be
/// sampled at most once per logical frame or an edge can be swallowed.
#[derive(Debug, Clone)]
pub struct InputEdgeDetector<K> {
    previous: HashMap<K, bool>,
}

impl<K> Default for InputEdgeDetector<K> {
    fn default() -> Self {
        Self {
            previous: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> InputEdgeDetector<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current sample for `key` and reports whether it was just pressed.
    pub fn pressed(&mut self, key: K, is_down: bool) -> bool {
        let was_down = self.previous.insert(key, is_down).unwrap_or(false);
        is_down && !was_down
    }
}
