//! Deterministic ordering helpers.
//!
//! Generated documents feed build caches, so identical inputs must always
//! produce byte-identical output. Everything here preserves first-seen input
//! order instead of sorting or hashing into an unordered collection.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Drop duplicates, keeping the first occurrence of each item.
pub fn unique_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Group items by key. Groups appear in the order their key was first seen,
/// and items keep their relative order within a group.
pub fn group_in_order<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}
