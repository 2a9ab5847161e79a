use chainscope_api::Occurrences;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// A set that keeps only the `capacity` heaviest keys.
///
/// Entries iterate by descending weight; equal weights fall back to key order.
#[derive(Debug, Clone)]
pub struct TopKSet<K: Ord + Hash + Clone> {
    capacity: usize,
    entries: BTreeSet<Occurrences<K>>,
    weights: HashMap<K, u64>,
}

impl<K: Ord + Hash + Clone> TopKSet<K> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: BTreeSet::new(),
            weights: HashMap::new(),
        }
    }

    /// Inserts `key` with `weight`, evicting the lightest entry on overflow.
    ///
    /// A key already present keeps the larger of its two weights. Returns whether
    /// `key` is in the set afterwards.
    pub fn insert(&mut self, key: K, weight: u64) -> bool {
        if let Some(&existing) = self.weights.get(&key) {
            if existing >= weight {
                return true;
            }
            self.entries.remove(&Occurrences::new(key.clone(), existing));
        }

        self.weights.insert(key.clone(), weight);
        self.entries.insert(Occurrences::new(key.clone(), weight));

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_last() {
                self.weights.remove(&evicted.value);
                return evicted.value != key;
            }
        }
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.weights.contains_key(key)
    }

    pub fn weight_of(&self, key: &K) -> Option<u64> {
        self.weights.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Occurrences<K>> {
        self.entries.iter()
    }

    /// The entries, heaviest first.
    pub fn into_sorted_vec(self) -> Vec<Occurrences<K>> {
        self.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_heaviest_in_order() {
        let mut set = TopKSet::new(3);
        set.insert("a", 10);
        set.insert("b", 30);
        set.insert("c", 20);
        set.insert("d", 40);

        let keys: Vec<_> = set.iter().map(|o| o.value).collect();
        assert_eq!(keys, vec!["d", "b", "c"]);
        assert!(!set.contains(&"a"));
    }

    #[test]
    fn test_rejected_insert_reports_absence() {
        let mut set = TopKSet::new(2);
        assert!(set.insert("a", 10));
        assert!(set.insert("b", 20));
        assert!(!set.insert("c", 5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate_keys_keep_best_weight() {
        let mut set = TopKSet::new(4);
        set.insert("a", 10);
        set.insert("a", 5);
        assert_eq!(set.weight_of(&"a"), Some(10));
        set.insert("a", 50);
        assert_eq!(set.weight_of(&"a"), Some(50));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ties_are_broken_by_key() {
        let mut set = TopKSet::new(2);
        set.insert("z", 7);
        set.insert("y", 7);
        set.insert("x", 7);

        let keys: Vec<_> = set.into_sorted_vec().into_iter().map(|o| o.value).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut set = TopKSet::new(0);
        assert_eq!(set.capacity(), 1);
        set.insert(1u32, 1);
        set.insert(2u32, 2);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&2));
    }
}
