//! LruMap: hash index over an arena-backed recency list
//!
//! The index maps each canonical key to its slot in the recency list. Every
//! public operation keeps the two in step, so `index.len() == list.len()`
//! whenever control returns to the caller.

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;

use ahash::RandomState;
use tracing::debug;

use crate::key::ToKey;
use crate::list::RecencyList;
use crate::options::{Dispose, LruOptions};
use crate::traverse::{Direction, Walk};

/// Map that remembers the order in which its entries were last touched
///
/// Entries are ordered from oldest (least recently used) to newest.
/// [`set`](Self::set) and [`get`](Self::get) move an entry to the newest
/// position; [`peek`](Self::peek) and [`has`](Self::has) do not.
///
/// The map never evicts by itself. Shrink it with
/// [`truncate`](Self::truncate) or the `del_*_while` walks, which run the
/// configured dispose callback for each entry they remove.
pub struct LruMap<V> {
    /// Canonical key -> slot in `list`
    pub(crate) index: HashMap<String, usize, RandomState>,

    /// Entries ordered oldest to newest
    pub(crate) list: RecencyList<V>,

    /// Recorded but never enforced automatically
    limit: Option<usize>,

    /// Eviction callback
    pub(crate) dispose: Option<Dispose<V>>,
}

impl<V> LruMap<V> {
    /// Create an empty map with default options
    pub fn new() -> Self {
        Self::with_options(LruOptions::new())
    }

    /// Create an empty map
    ///
    /// Accepts [`LruOptions`] or a plain `usize` limit.
    pub fn with_options(options: impl Into<LruOptions<V>>) -> Self {
        let options = options.into();
        if let Some(limit) = options.limit {
            debug!(limit, "limit recorded, eviction stays caller driven");
        }

        Self {
            index: HashMap::with_hasher(RandomState::new()),
            list: RecencyList::new(),
            limit: options.limit,
            dispose: options.dispose,
        }
    }

    /// Check whether `key` is present without touching recency
    pub fn has(&self, key: impl ToKey) -> bool {
        self.index.contains_key(&*key.to_key())
    }

    /// Get a value without touching recency
    pub fn peek(&self, key: impl ToKey) -> Option<&V> {
        let idx = *self.index.get(&*key.to_key())?;
        self.list.entry(idx).map(|entry| &entry.value)
    }

    /// Get a value and mark its entry as the newest
    pub fn get(&mut self, key: impl ToKey) -> Option<&V> {
        let idx = self.promote(key)?;
        self.list.entry(idx).map(|entry| &entry.value)
    }

    /// Get a mutable value and mark its entry as the newest
    pub fn get_mut(&mut self, key: impl ToKey) -> Option<&mut V> {
        let idx = self.promote(key)?;
        self.list.entry_mut(idx).map(|entry| &mut entry.value)
    }

    /// Insert or update `key`, making it the newest entry
    ///
    /// Returns `true` if the key already existed. Updating the newest entry
    /// leaves the order untouched.
    pub fn set(&mut self, key: impl ToKey, value: V) -> bool {
        let key = key.to_key();
        if let Some(&idx) = self.index.get(&*key) {
            // Update existing
            if let Some(entry) = self.list.entry_mut(idx) {
                entry.value = value;
            }
            self.list.move_to_back(idx);
            true
        } else {
            // Insert new
            let key = key.into_owned();
            let idx = self.list.push_back(key.clone(), value);
            self.index.insert(key, idx);
            false
        }
    }

    /// Delete `key`, returning `true` if it existed
    ///
    /// Explicit deletion never runs the dispose callback.
    pub fn del(&mut self, key: impl ToKey) -> bool {
        self.remove(key).is_some()
    }

    /// Delete `key` and hand back its value
    ///
    /// Like [`del`](Self::del), this never runs the dispose callback.
    pub fn remove(&mut self, key: impl ToKey) -> Option<V> {
        let idx = self.index.remove(&*key.to_key())?;
        self.list.remove(idx).map(|entry| entry.value)
    }

    /// Key of the least recently used entry
    pub fn oldest_key(&self) -> Option<&str> {
        self.list
            .front()
            .and_then(|idx| self.list.entry(idx))
            .map(|entry| entry.key.as_str())
    }

    /// Key of the most recently used entry
    pub fn newest_key(&self) -> Option<&str> {
        self.list
            .back()
            .and_then(|idx| self.list.entry(idx))
            .map(|entry| entry.key.as_str())
    }

    /// Value of the least recently used entry
    pub fn oldest_value(&self) -> Option<&V> {
        self.list
            .front()
            .and_then(|idx| self.list.entry(idx))
            .map(|entry| &entry.value)
    }

    /// Value of the most recently used entry
    pub fn newest_value(&self) -> Option<&V> {
        self.list
            .back()
            .and_then(|idx| self.list.entry(idx))
            .map(|entry| &entry.value)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Limit supplied at construction, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Evict oldest entries until at most `len` remain
    ///
    /// Each evicted entry goes through the dispose callback, oldest first.
    /// Asking for a length at or above the current one does nothing.
    pub fn truncate(&mut self, len: usize) {
        let before = self.len();
        if len >= before {
            return;
        }

        let _ = self.del_oldest_while(|_, _, map| {
            if map.len() > len {
                ControlFlow::<()>::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });

        debug!(
            target_len = len,
            evicted = before.saturating_sub(self.len()),
            "truncated lru map"
        );
    }

    /// Evict every entry through the dispose callback
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Iterate entries from oldest to newest
    ///
    /// The iterator is double-ended; `.rev()` walks newest to oldest.
    pub fn iter(&self) -> Walk<'_, V> {
        self.walk(Direction::Oldest)
    }

    fn promote(&mut self, key: impl ToKey) -> Option<usize> {
        let idx = *self.index.get(&*key.to_key())?;
        self.list.move_to_back(idx);
        Some(idx)
    }
}

impl<V> Default for LruMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for LruMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: ToKey, V> FromIterator<(K, V)> for LruMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: ToKey, V> Extend<(K, V)> for LruMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a LruMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Walk<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn assert_consistent<V>(map: &LruMap<V>) {
        assert_eq!(map.index.len(), map.list.len());
        assert_eq!(map.iter().count(), map.len());
        for (key, _) in map.iter() {
            assert!(map.has(key));
        }
    }

    #[test]
    fn test_map_new_empty() {
        let map: LruMap<u32> = LruMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.limit(), None);
        assert_eq!(map.oldest_key(), None);
        assert_eq!(map.newest_key(), None);
        assert_eq!(map.oldest_value(), None);
        assert_eq!(map.newest_value(), None);
    }

    #[test]
    fn test_map_numeric_options() {
        let map: LruMap<u32> = LruMap::with_options(123usize);
        assert_eq!(map.limit(), Some(123));
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_set_get() {
        let mut map = LruMap::new();
        assert!(!map.has("a"));
        assert_eq!(map.get("a"), None);

        assert!(!map.set("a", 1));
        assert_eq!(map.len(), 1);
        assert!(map.has("a"));
        assert_eq!(map.get("a"), Some(&1));

        assert!(map.set("a", 1));
        assert_eq!(map.len(), 1);

        assert!(!map.set("b", 2));
        assert_eq!(map.len(), 2);
        assert_eq!(map.oldest_key(), Some("a"));
        assert_eq!(map.newest_key(), Some("b"));
        assert_eq!(map.oldest_value(), Some(&1));
        assert_eq!(map.newest_value(), Some(&2));
        assert_consistent(&map);
    }

    #[test]
    fn test_map_key_coercion() {
        let mut map = LruMap::new();
        map.set(1, "one");
        assert!(map.has("1"));
        assert!(map.has(1u64));
        assert_eq!(map.peek('1'), Some(&"one"));

        // Same canonical key updates in place
        assert!(map.set("1", "uno"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1), Some(&"uno"));
    }

    #[test]
    fn test_map_get_promotes() {
        let mut map = LruMap::new();
        map.set("a", 1);
        map.set("b", 2);
        map.set("c", 3);

        map.get("a");
        assert_eq!(map.newest_key(), Some("a"));
        assert_eq!(map.oldest_key(), Some("b"));
    }

    #[test]
    fn test_map_peek_does_not_promote() {
        let mut map = LruMap::new();
        map.set("a", 1);
        map.set("b", 2);

        assert_eq!(map.peek("a"), Some(&1));
        assert_eq!(map.oldest_key(), Some("a"));
        assert_eq!(map.newest_key(), Some("b"));
        assert_eq!(map.peek("missing"), None);
    }

    #[test]
    fn test_map_get_mut_promotes() {
        let mut map = LruMap::new();
        map.set("a", 1);
        map.set("b", 2);

        if let Some(value) = map.get_mut("a") {
            *value += 10;
        }
        assert_eq!(map.peek("a"), Some(&11));
        assert_eq!(map.newest_key(), Some("a"));
    }

    #[test]
    fn test_map_set_existing_moves_to_newest() {
        let mut map = LruMap::new();
        map.set("a", 1);
        map.set("b", 2);
        map.set("c", 3);

        assert!(map.set("a", 10));
        let keys: Vec<_> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "c", "a"]);

        // Updating the newest entry keeps the order
        assert!(map.set("a", 11));
        let keys: Vec<_> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "c", "a"]);
        assert_eq!(map.peek("a"), Some(&11));
    }

    #[test]
    fn test_map_del() {
        let mut map = LruMap::new();
        assert!(!map.has("1"));
        assert!(!map.set("1", "a"));
        assert!(map.del("1"));
        assert_eq!(map.oldest_value(), None);
        assert!(!map.has("1"));
        assert!(!map.del("1"));
        assert_eq!(map.len(), 0);
        assert_consistent(&map);
    }

    #[test]
    fn test_map_remove_returns_value() {
        let mut map = LruMap::new();
        map.set("a", String::from("alpha"));
        assert_eq!(map.remove("a"), Some(String::from("alpha")));
        assert_eq!(map.remove("a"), None);
    }

    #[test]
    fn test_map_del_skips_dispose() {
        let disposed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&disposed);
        let mut map = LruMap::with_options(
            LruOptions::new().dispose(move |key: &str, _: &mut LruMap<u32>| {
                sink.borrow_mut().push(key.to_string())
            }),
        );
        map.set("a", 1);
        map.set("b", 2);

        assert!(map.del("a"));
        assert_eq!(map.remove("b"), Some(2));
        assert!(disposed.borrow().is_empty());
    }

    #[test]
    fn test_map_truncate() {
        let mut map = LruMap::new();
        for i in 0..5 {
            map.set(i, format!("value_{}", i));
        }

        map.truncate(3);
        assert_eq!(map.len(), 3);
        assert!(!map.has("0"));
        assert!(!map.has("1"));
        assert_eq!(map.oldest_key(), Some("2"));
        assert_eq!(map.newest_key(), Some("4"));
        assert_consistent(&map);
    }

    #[test]
    fn test_map_truncate_does_not_grow() {
        let mut map = LruMap::new();
        map.truncate(4);
        assert_eq!(map.len(), 0);

        for i in 0..10 {
            map.set(i, i);
        }
        map.truncate(21);
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn test_map_truncate_disposes_oldest_first() {
        let disposed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&disposed);
        let mut map = LruMap::with_options(
            LruOptions::new().dispose(move |key: &str, map: &mut LruMap<u32>| {
                let value = map.peek(key).copied();
                sink.borrow_mut().push((key.to_string(), value));
            }),
        );
        for i in 0..5u32 {
            map.set(i, i * 10);
        }

        map.truncate(2);
        assert_eq!(
            *disposed.borrow(),
            [
                ("0".to_string(), Some(0)),
                ("1".to_string(), Some(10)),
                ("2".to_string(), Some(20))
            ]
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_truncate_terminates_when_dispose_resets_key() {
        let mut map = LruMap::with_options(LruOptions::new().dispose(
            |key: &str, map: &mut LruMap<u32>| {
                map.set(key, 0);
            },
        ));
        for i in 0..5u32 {
            map.set(i, i);
        }

        map.truncate(2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.oldest_keys(), ["3", "4"]);
        assert_consistent(&map);

        map.clear();
        assert!(map.is_empty());
        assert_consistent(&map);
    }

    #[test]
    fn test_map_clear_disposes_everything() {
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let mut map = LruMap::with_options(
            LruOptions::new().dispose(move |_: &str, _: &mut LruMap<u32>| *counter.borrow_mut() += 1),
        );
        map.set("a", 1);
        map.set("b", 2);
        map.clear();

        assert!(map.is_empty());
        assert_eq!(*count.borrow(), 2);
        assert_consistent(&map);
    }

    #[test]
    fn test_map_limit_is_not_enforced() {
        let mut map = LruMap::with_options(2usize);
        for i in 0..5 {
            map.set(i, i);
        }
        assert_eq!(map.len(), 5);

        if let Some(limit) = map.limit() {
            map.truncate(limit);
        }
        assert_eq!(map.len(), 2);
        assert_eq!(map.oldest_key(), Some("3"));
    }

    #[test]
    fn test_map_iter_both_ends() {
        let map: LruMap<u32> = (1..=4u32).map(|i| (i, i)).collect();

        let mut iter = map.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(("1", &1)));
        assert_eq!(iter.next_back(), Some(("4", &4)));
        assert_eq!(iter.next(), Some(("2", &2)));
        assert_eq!(iter.next_back(), Some(("3", &3)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let newest_first: Vec<_> = map.iter().rev().map(|(_, v)| *v).collect();
        assert_eq!(newest_first, [4, 3, 2, 1]);
    }

    #[test]
    fn test_map_debug() {
        let mut map = LruMap::new();
        map.set("a", 1);
        map.set("b", 2);
        assert_eq!(format!("{:?}", map), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_map_independent_instances() {
        let mut map1 = LruMap::new();
        let mut map2 = LruMap::new();

        map1.set("a", "1");
        assert_eq!(map1.len(), 1);
        assert_eq!(map2.len(), 0);
        assert_eq!(map2.get("a"), None);

        map2.set("b", "3");
        map1.set("b", "5");
        assert_eq!(map1.len(), 2);
        assert_eq!(map2.len(), 1);
        assert_eq!(map2.peek("b"), Some(&"3"));
    }
}
