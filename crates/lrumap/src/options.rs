//! Construction options

use std::fmt;

use crate::map::LruMap;

/// Callback run for every entry removed by [`LruMap::truncate`] or a
/// `del_*_while` walk.
///
/// It runs just before the entry is evicted and receives the entry's key and
/// the map. The entry is still present, so its value is reachable through
/// [`LruMap::peek`]. Whatever is stored under the key once the callback
/// returns is removed.
pub type Dispose<V> = Box<dyn FnMut(&str, &mut LruMap<V>)>;

/// Options accepted by [`LruMap::with_options`]
///
/// A bare `usize` converts into options carrying only a limit.
pub struct LruOptions<V> {
    pub(crate) limit: Option<usize>,
    pub(crate) dispose: Option<Dispose<V>>,
}

impl<V> LruOptions<V> {
    /// Options with no limit and no dispose callback
    pub fn new() -> Self {
        Self {
            limit: None,
            dispose: None,
        }
    }

    /// Record a size limit
    ///
    /// The limit is stored for callers to read back through
    /// [`LruMap::limit`]. The map never evicts on its own to honour it;
    /// call [`LruMap::truncate`] to enforce it.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Install the eviction callback
    pub fn dispose<F>(mut self, dispose: F) -> Self
    where
        F: FnMut(&str, &mut LruMap<V>) + 'static,
    {
        self.dispose = Some(Box::new(dispose));
        self
    }
}

impl<V> Default for LruOptions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<usize> for LruOptions<V> {
    fn from(limit: usize) -> Self {
        Self::new().limit(limit)
    }
}

impl<V> fmt::Debug for LruOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruOptions")
            .field("limit", &self.limit)
            .field("dispose", &self.dispose.is_some())
            .finish()
    }
}
