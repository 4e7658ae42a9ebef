//! # lrumap
//!
//! Map that keeps its entries in least-recently-used order.
//!
//! ## Architecture
//! - **Index**: AHash map from canonical key to entry slot (O(1))
//! - **Recency list**: Doubly-linked list over a slot arena, oldest to newest (O(1) splice)
//! - **Eviction**: Caller driven through `truncate` and `del_*_while`, with a dispose hook
//!
//! Keys are stored as strings. Anything implementing [`ToKey`] (strings,
//! integers, floats, `char`, `bool`) can be used as a key and is rendered to
//! its string form, so `map.set(1, v)` and `map.get("1")` address the same
//! entry.
//!
//! ```
//! use lrumap::LruMap;
//!
//! let mut map = LruMap::new();
//! map.set("a", 1);
//! map.set("b", 2);
//! map.get("a");
//!
//! assert_eq!(map.oldest_key(), Some("b"));
//! assert_eq!(map.newest_key(), Some("a"));
//!
//! map.truncate(1);
//! assert_eq!(map.oldest_keys(), ["a"]);
//! ```

#![warn(missing_docs)]

mod error;
mod key;
mod list;
mod map;
mod options;
mod traverse;

pub use error::{Error, Result};
pub use key::ToKey;
pub use map::LruMap;
pub use options::{Dispose, LruOptions};
pub use traverse::{Direction, Walk};
