//! In-Memory Store with Lazy Expiry
//!
//! The store maps each key to exactly one [`StoredValue`]: a string with an
//! optional expiry time, or a list.
//!
//! ## Design Decisions
//!
//! 1. **Single owner**: the store is owned by the server and only touched
//!    from the event loop thread, so it is a plain `HashMap` with no locks.
//! 2. **Lazy expiry**: an expired string is hidden from reads but stays in
//!    the map until it is overwritten. Nothing sweeps in the background.
//! 3. **Deques for lists**: pushes at either end are O(1).
//!
//! Reads that care about expiry take the current time as an argument so
//! callers (and tests) control the clock.

use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// A string payload with an optional absolute expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEntry {
    pub value: Bytes,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl StringEntry {
    pub fn new(value: Bytes, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// An entry is expired once `now` is strictly past its expiry time.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}

/// The value held under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    String(StringEntry),
    List(VecDeque<Bytes>),
}

impl StoredValue {
    /// Returns false only for a string entry that has expired at `now`.
    pub fn is_live_at(&self, now: Instant) -> bool {
        match self {
            StoredValue::String(entry) => !entry.is_expired_at(now),
            StoredValue::List(_) => true,
        }
    }
}

/// The key-value store.
///
/// # Example
///
/// ```
/// use respkv::storage::{Store, StoredValue};
/// use bytes::Bytes;
/// use std::time::Instant;
///
/// let mut store = Store::new();
/// store.set_string(Bytes::from("foo"), Bytes::from("bar"), None);
///
/// let now = Instant::now();
/// match store.get_live(b"foo", now) {
///     Some(StoredValue::String(entry)) => assert_eq!(entry.value, Bytes::from("bar")),
///     other => panic!("unexpected value: {:?}", other),
/// }
///
/// assert_eq!(store.append_list_tail(Bytes::from("list"), vec![Bytes::from("a")]), 1);
/// ```
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<Bytes, StoredValue>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw entry for a key, expired or not.
    pub fn get(&self, key: &[u8]) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    /// Returns the entry for a key unless it is a string that has expired
    /// at `now`. An expired entry is left in place.
    pub fn get_live(&self, key: &[u8], now: Instant) -> Option<&StoredValue> {
        self.entries.get(key).filter(|value| value.is_live_at(now))
    }

    /// Stores a string, replacing whatever the key held before.
    pub fn set_string(&mut self, key: Bytes, value: Bytes, expires_at: Option<Instant>) {
        self.entries
            .insert(key, StoredValue::String(StringEntry::new(value, expires_at)));
    }

    /// Appends `values` to the tail of the list at `key`, in order.
    ///
    /// A missing key, or a key that does not hold a list, starts from an
    /// empty list. Returns the new length.
    pub fn append_list_tail(&mut self, key: Bytes, values: Vec<Bytes>) -> usize {
        self.update_list(key, |list| list.extend(values))
    }

    /// Pushes `values` onto the head of the list at `key`, one at a time in
    /// the order given, so the last value ends up first:
    /// pushing `a, b, c` onto `[z]` gives `[c, b, a, z]`.
    ///
    /// A missing key, or a key that does not hold a list, starts from an
    /// empty list. Returns the new length.
    pub fn prepend_list_head(&mut self, key: Bytes, values: Vec<Bytes>) -> usize {
        self.update_list(key, |list| {
            for value in values {
                list.push_front(value);
            }
        })
    }

    /// Returns the elements at positions `start..=end` of the list at `key`.
    ///
    /// Positions past the end are skipped. A missing key or a non-list key
    /// yields an empty vector.
    pub fn slice_list(&self, key: &[u8], start: usize, end: usize) -> Vec<Bytes> {
        match self.entries.get(key) {
            Some(StoredValue::List(list)) if start <= end && start < list.len() => list
                .range(start..=end.min(list.len() - 1))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Length of the list at `key`, or `None` if the key does not hold a list.
    pub fn list_len(&self, key: &[u8]) -> Option<usize> {
        match self.entries.get(key) {
            Some(StoredValue::List(list)) => Some(list.len()),
            _ => None,
        }
    }

    /// Returns true if the key is physically present, expired or not.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of physically present keys, including lazily expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies `update` to the list at `key` and returns its new length.
    /// Anything other than a list under `key` is replaced by an empty list
    /// first.
    fn update_list(&mut self, key: Bytes, update: impl FnOnce(&mut VecDeque<Bytes>)) -> usize {
        let mut list = match self.entries.remove(&key) {
            Some(StoredValue::List(list)) => list,
            _ => VecDeque::new(),
        };
        update(&mut list);
        let len = list.len();
        self.entries.insert(key, StoredValue::List(list));
        len
    }
}
