use std::collections::{HashSet, VecDeque};

/// Signatures a wallet has already seen, shared by all of its channels.
///
/// Bounded: once `capacity` signatures are stored the oldest is forgotten.
/// Duplicate suppression therefore holds within the last `capacity`
/// signatures only; a replay of an evicted signature is treated as new.
#[derive(Debug)]
pub struct DedupStore {
    seen: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl DedupStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.seen.contains(signature)
    }

    /// Record a signature; returns false if it was already present
    pub fn insert(&mut self, signature: &str) -> bool {
        if self.seen.contains(signature) {
            return false;
        }

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }

        self.seen.insert(signature.to_string());
        self.order.push_back(signature.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once() {
        let mut store = DedupStore::new(10);
        assert!(store.insert("a"));
        assert!(!store.insert("a"));
        assert!(store.contains("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut store = DedupStore::new(2);
        store.insert("a");
        store.insert("b");
        store.insert("c");
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(store.contains("c"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replay_of_evicted_signature_is_new() {
        let mut store = DedupStore::new(2);
        store.insert("a");
        store.insert("b");
        assert!(!store.insert("a"));

        store.insert("c");
        // "a" fell out of the window
        assert!(store.insert("a"));
        assert!(!store.contains("b"));
    }
}
