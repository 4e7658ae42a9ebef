//! Recency list
//!
//! Doubly-linked list of entries stored in a slot arena. Links are slot
//! indices, so the index can hold a stable handle to every entry while the
//! list splices it around. `head` is the oldest entry, `tail` the newest.

/// One stored key/value pair and its position in recency order
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
    /// Older neighbour
    prev: Option<usize>,
    /// Newer neighbour
    next: Option<usize>,
}

/// Arena-backed doubly-linked list ordered oldest to newest
pub(crate) struct RecencyList<V> {
    slots: Vec<Option<Entry<V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<V> RecencyList<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Oldest entry
    pub(crate) fn front(&self) -> Option<usize> {
        self.head
    }

    /// Newest entry
    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    /// Next newer entry after `idx`
    pub(crate) fn next(&self, idx: usize) -> Option<usize> {
        self.slots[idx].as_ref().and_then(|entry| entry.next)
    }

    /// Next older entry before `idx`
    pub(crate) fn prev(&self, idx: usize) -> Option<usize> {
        self.slots[idx].as_ref().and_then(|entry| entry.prev)
    }

    pub(crate) fn entry(&self, idx: usize) -> Option<&Entry<V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry<V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Append a new entry as the newest and return its slot
    pub(crate) fn push_back(&mut self, key: String, value: V) -> usize {
        let idx = self.alloc_slot();
        self.slots[idx] = Some(Entry {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_back(idx);
        idx
    }

    /// Splice an entry to the newest position
    pub(crate) fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return; // Already newest
        }

        self.unlink(idx);
        self.link_back(idx);
    }

    /// Unlink an entry and release its slot
    pub(crate) fn remove(&mut self, idx: usize) -> Option<Entry<V>> {
        self.slots[idx].as_ref()?;
        self.unlink(idx);
        self.free_list.push(idx);
        self.slots[idx].take()
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(entry) = &mut self.slots[idx] {
            entry.prev = old_tail;
            entry.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.slots[tail_idx] {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
        self.len += 1;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(entry) = &self.slots[idx] {
            (entry.prev, entry.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = &mut self.slots[prev_idx] {
                    prev_entry.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_entry) = &mut self.slots[next_idx] {
                    next_entry.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(entry) = &mut self.slots[idx] {
            entry.prev = None;
            entry.next = None;
        }
        self.len -= 1;
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(None);
            idx
        }
    }
}
