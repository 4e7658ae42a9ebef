//! Directional traversal and eviction walks
//!
//! Every walk starts at one end of the recency list and resolves the next
//! entry before handing the current one to a callback. Callbacks that can
//! stop a walk return [`ControlFlow`]: `Continue(())` keeps going and
//! `Break(b)` stops, with `b` passed back to the caller.

use std::iter::FusedIterator;
use std::ops::ControlFlow;

use tracing::trace;

use crate::error::{Error, Result};
use crate::list::RecencyList;
use crate::map::LruMap;

/// End of the recency list a walk starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Least recently used first
    Oldest,
    /// Most recently used first
    Newest,
}

impl Direction {
    /// The opposite end
    pub fn reverse(self) -> Self {
        match self {
            Direction::Oldest => Direction::Newest,
            Direction::Newest => Direction::Oldest,
        }
    }

    fn start<V>(self, list: &RecencyList<V>) -> Option<usize> {
        match self {
            Direction::Oldest => list.front(),
            Direction::Newest => list.back(),
        }
    }

    fn step<V>(self, list: &RecencyList<V>, idx: usize) -> Option<usize> {
        match self {
            Direction::Oldest => list.next(idx),
            Direction::Newest => list.prev(idx),
        }
    }
}

/// Iterator over `(key, value)` pairs in a chosen [`Direction`]
///
/// Double-ended: `next_back` walks in from the opposite end.
pub struct Walk<'a, V> {
    list: &'a RecencyList<V>,
    front: Option<usize>,
    back: Option<usize>,
    direction: Direction,
    remaining: usize,
}

impl<'a, V> Walk<'a, V> {
    fn yield_entry(&self, idx: usize) -> Option<(&'a str, &'a V)> {
        self.list
            .entry(idx)
            .map(|entry| (entry.key.as_str(), &entry.value))
    }
}

impl<'a, V> Iterator for Walk<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front?;
        self.front = self.direction.step(self.list, idx);
        self.remaining -= 1;
        self.yield_entry(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Walk<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back?;
        self.back = self.direction.reverse().step(self.list, idx);
        self.remaining -= 1;
        self.yield_entry(idx)
    }
}

impl<V> ExactSizeIterator for Walk<'_, V> {}

impl<V> FusedIterator for Walk<'_, V> {}

impl<V> LruMap<V> {
    /// Iterate entries starting from the given end
    pub fn walk(&self, direction: Direction) -> Walk<'_, V> {
        Walk {
            list: &self.list,
            front: direction.start(&self.list),
            back: direction.reverse().start(&self.list),
            direction,
            remaining: self.list.len(),
        }
    }

    /// Visit entries until the callback breaks
    ///
    /// Returns the callback's `Break` value if it stopped the walk, or
    /// `Continue(())` if every entry was visited.
    pub fn some<B, F>(&self, direction: Direction, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        for (key, value) in self.walk(direction) {
            if let ControlFlow::Break(b) = f(value, key, self) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    /// [`some`](Self::some) from the oldest entry
    pub fn some_oldest<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        self.some(Direction::Oldest, f)
    }

    /// [`some`](Self::some) from the newest entry
    pub fn some_newest<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        self.some(Direction::Newest, f)
    }

    /// Apply `f` to every entry, collecting results in walk order
    pub fn map<R, F>(&self, direction: Direction, mut f: F) -> Vec<R>
    where
        F: FnMut(&V, &str, &Self) -> R,
    {
        self.walk(direction)
            .map(|(key, value)| f(value, key, self))
            .collect()
    }

    /// [`map`](Self::map) from the oldest entry
    pub fn map_oldest<R, F>(&self, f: F) -> Vec<R>
    where
        F: FnMut(&V, &str, &Self) -> R,
    {
        self.map(Direction::Oldest, f)
    }

    /// [`map`](Self::map) from the newest entry
    pub fn map_newest<R, F>(&self, f: F) -> Vec<R>
    where
        F: FnMut(&V, &str, &Self) -> R,
    {
        self.map(Direction::Newest, f)
    }

    /// Fold entries into an accumulator of any type
    pub fn fold<A, F>(&self, direction: Direction, init: A, mut f: F) -> A
    where
        F: FnMut(A, &V, &str, &Self) -> A,
    {
        self.walk(direction)
            .fold(init, |acc, (key, value)| f(acc, value, key, self))
    }

    /// Fold entries, seeding from the first visited value when no initial
    /// value is given
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the map is empty and `initial`
    /// is `None`.
    pub fn reduce<F>(&self, direction: Direction, initial: Option<V>, mut f: F) -> Result<V>
    where
        V: Clone,
        F: FnMut(V, &V, &str, &Self) -> V,
    {
        let mut walk = self.walk(direction);
        let init = match initial {
            Some(init) => init,
            None => match walk.next() {
                Some((_, value)) => value.clone(),
                None => {
                    return Err(Error::InvalidArgument(
                        "reduce of empty map with no initial value".to_string(),
                    ))
                }
            },
        };

        Ok(walk.fold(init, |acc, (key, value)| f(acc, value, key, self)))
    }

    /// [`reduce`](Self::reduce) from the oldest entry
    pub fn reduce_oldest<F>(&self, initial: Option<V>, f: F) -> Result<V>
    where
        V: Clone,
        F: FnMut(V, &V, &str, &Self) -> V,
    {
        self.reduce(Direction::Oldest, initial, f)
    }

    /// [`reduce`](Self::reduce) from the newest entry
    pub fn reduce_newest<F>(&self, initial: Option<V>, f: F) -> Result<V>
    where
        V: Clone,
        F: FnMut(V, &V, &str, &Self) -> V,
    {
        self.reduce(Direction::Newest, initial, f)
    }

    /// Keys in walk order
    pub fn keys(&self, direction: Direction) -> Vec<&str> {
        self.walk(direction).map(|(key, _)| key).collect()
    }

    /// Keys from oldest to newest
    pub fn oldest_keys(&self) -> Vec<&str> {
        self.keys(Direction::Oldest)
    }

    /// Keys from newest to oldest
    pub fn newest_keys(&self) -> Vec<&str> {
        self.keys(Direction::Newest)
    }

    /// Values in walk order
    pub fn values(&self, direction: Direction) -> Vec<&V> {
        self.walk(direction).map(|(_, value)| value).collect()
    }

    /// Values from oldest to newest
    pub fn oldest_values(&self) -> Vec<&V> {
        self.values(Direction::Oldest)
    }

    /// Values from newest to oldest
    pub fn newest_values(&self) -> Vec<&V> {
        self.values(Direction::Newest)
    }

    /// Evict entries from one end while the predicate continues
    ///
    /// The entry that makes the predicate break is kept, and the break value
    /// is returned. For every other visited entry the dispose callback runs
    /// first, while the entry is still in the map; whatever is stored under
    /// that key afterwards is removed. The callback may read or modify the
    /// map, and the next entry is taken from the chosen end once it returns.
    /// Evictions started from inside the callback do not dispose.
    pub fn del_while<B, F>(&mut self, direction: Direction, mut predicate: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        let mut dispose = self.dispose.take();

        let flow = loop {
            let idx = match direction.start(&self.list) {
                Some(idx) => idx,
                None => break ControlFlow::Continue(()),
            };

            let key = match self.list.entry(idx) {
                Some(entry) => {
                    if let ControlFlow::Break(b) = predicate(&entry.value, &entry.key, &*self) {
                        break ControlFlow::Break(b);
                    }
                    entry.key.clone()
                }
                None => break ControlFlow::Continue(()),
            };
            trace!(key = %key, ?direction, "evicting entry");

            if let Some(dispose) = dispose.as_mut() {
                dispose(&key, self);
            }

            // The callback may have moved or deleted the entry
            if let Some(idx) = self.index.remove(&key) {
                self.list.remove(idx);
            }
        };

        if self.dispose.is_none() {
            self.dispose = dispose;
        }
        flow
    }

    /// [`del_while`](Self::del_while) from the oldest entry
    pub fn del_oldest_while<B, F>(&mut self, predicate: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        self.del_while(Direction::Oldest, predicate)
    }

    /// [`del_while`](Self::del_while) from the newest entry
    pub fn del_newest_while<B, F>(&mut self, predicate: F) -> ControlFlow<B>
    where
        F: FnMut(&V, &str, &Self) -> ControlFlow<B>,
    {
        self.del_while(Direction::Newest, predicate)
    }
}
