//! Ordered key/value primitive shared by tabs and the workspace.
//!
//! # Responsibility
//! - Keep keyed lookup and one explicit, user-visible order in a single value.
//! - Provide insertion-style reposition (move, not swap) for drag reorder.
//!
//! # Invariants
//! - Keys are unique.
//! - Order only changes through `insert_at_end`, `remove`, `reposition` and
//!   `replace_key`; `replace_key` keeps the entry at its current position.
//! - Equality is order-sensitive.

use indexmap::IndexMap;
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

/// Result type used by ordered map operations.
pub type OrderedMapResult<T> = Result<T, OrderedMapError>;

/// Errors from ordered map operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedMapError {
    /// Key is already present.
    DuplicateKey,
    /// Key is absent.
    KeyNotFound,
    /// Position is outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for OrderedMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "key already present"),
            Self::KeyNotFound => write!(f, "key not found"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
        }
    }
}

impl Error for OrderedMapError {}

/// Mapping with O(1) keyed lookup and an explicit iteration order.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Looks up one value by key.
    pub fn get<Q>(&self, key: &Q) -> OrderedMapResult<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).ok_or(OrderedMapError::KeyNotFound)
    }

    /// Looks up one value by key for in-place mutation. Order is untouched.
    pub fn get_mut<Q>(&mut self, key: &Q) -> OrderedMapResult<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key).ok_or(OrderedMapError::KeyNotFound)
    }

    /// Returns the entry at one position.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get_index(index)
    }

    /// Returns the current position of one key.
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_index_of(key)
    }

    /// Appends one entry and returns its position.
    ///
    /// # Errors
    /// - `DuplicateKey` when `key` is already present; the map is unchanged.
    pub fn insert_at_end(&mut self, key: K, value: V) -> OrderedMapResult<usize> {
        if self.entries.contains_key(&key) {
            return Err(OrderedMapError::DuplicateKey);
        }
        let (index, _) = self.entries.insert_full(key, value);
        Ok(index)
    }

    /// Removes one entry and shifts later entries down by one position.
    pub fn remove<Q>(&mut self, key: &Q) -> OrderedMapResult<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Like [`OrderedMap::remove`], but also hands back the owned key.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> OrderedMapResult<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .shift_remove_entry(key)
            .ok_or(OrderedMapError::KeyNotFound)
    }

    /// Moves the entry at `from` so it ends up at `to`.
    ///
    /// Entries in between shift by one toward the vacated slot:
    /// `[A,B,C,D,E]` with `reposition(0, 3)` becomes `[B,C,D,A,E]`.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when either index is outside `[0, len)`.
    pub fn reposition(&mut self, from: usize, to: usize) -> OrderedMapResult<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(OrderedMapError::IndexOutOfRange { index, len });
            }
        }
        self.entries.move_index(from, to);
        Ok(())
    }

    /// Swaps the key of one entry while keeping its value and position.
    ///
    /// Replacing a key with itself is a no-op.
    ///
    /// # Errors
    /// - `KeyNotFound` when `old` is absent.
    /// - `DuplicateKey` when `new` is present on another entry.
    pub fn replace_key<Q>(&mut self, old: &Q, new: K) -> OrderedMapResult<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self
            .entries
            .get_index_of(old)
            .ok_or(OrderedMapError::KeyNotFound)?;
        if <K as Borrow<Q>>::borrow(&new) == old {
            return Ok(());
        }
        if self.entries.contains_key(&new) {
            return Err(OrderedMapError::DuplicateKey);
        }
        if let Some((_, value)) = self.entries.shift_remove_index(index) {
            self.entries.shift_insert(index, new, value);
        }
        Ok(())
    }

    /// Keys in current order.
    pub fn ordered_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Entries in current order.
    pub fn ordered_entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter()
    }

    /// Values in current order.
    pub fn ordered_values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }
}

// IndexMap equality ignores order; the user-visible order is part of the value here.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

#[cfg(test)]
mod tests {
    use super::{OrderedMap, OrderedMapError};

    fn letters(keys: &[&'static str]) -> OrderedMap<&'static str, usize> {
        let mut map = OrderedMap::new();
        for (value, key) in keys.iter().enumerate() {
            map.insert_at_end(*key, value).unwrap();
        }
        map
    }

    fn keys(map: &OrderedMap<&'static str, usize>) -> Vec<&'static str> {
        map.ordered_keys().copied().collect()
    }

    #[test]
    fn reposition_forward_shifts_intervening_entries() {
        let mut map = letters(&["A", "B", "C", "D", "E"]);
        map.reposition(0, 3).unwrap();
        assert_eq!(keys(&map), ["B", "C", "D", "A", "E"]);
    }

    #[test]
    fn reposition_backward_restores_neighbours() {
        let mut map = letters(&["A", "B", "C", "D", "E"]);
        map.reposition(0, 3).unwrap();
        map.reposition(3, 0).unwrap();
        assert_eq!(keys(&map), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn reposition_same_index_is_noop() {
        let mut map = letters(&["A", "B", "C"]);
        map.reposition(1, 1).unwrap();
        assert_eq!(keys(&map), ["A", "B", "C"]);
    }

    #[test]
    fn reposition_rejects_out_of_range_without_mutation() {
        let mut map = letters(&["A", "B", "C"]);
        assert_eq!(
            map.reposition(0, 3).unwrap_err(),
            OrderedMapError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            map.reposition(5, 0).unwrap_err(),
            OrderedMapError::IndexOutOfRange { index: 5, len: 3 }
        );
        assert_eq!(keys(&map), ["A", "B", "C"]);
    }

    #[test]
    fn insert_duplicate_is_rejected() {
        let mut map = letters(&["A", "B"]);
        assert_eq!(
            map.insert_at_end("A", 9).unwrap_err(),
            OrderedMapError::DuplicateKey
        );
        assert_eq!(keys(&map), ["A", "B"]);
        assert_eq!(*map.get("A").unwrap(), 0);
    }

    #[test]
    fn remove_shifts_later_positions() {
        let mut map = letters(&["A", "B", "C"]);
        assert_eq!(map.remove("A").unwrap(), 0);
        assert_eq!(map.index_of("C"), Some(1));
        assert_eq!(map.remove("A").unwrap_err(), OrderedMapError::KeyNotFound);
    }

    #[test]
    fn replace_key_keeps_position() {
        let mut map = letters(&["A", "B", "C"]);
        map.replace_key("B", "X").unwrap();
        assert_eq!(keys(&map), ["A", "X", "C"]);
        assert_eq!(*map.get("X").unwrap(), 1);

        assert_eq!(
            map.replace_key("A", "C").unwrap_err(),
            OrderedMapError::DuplicateKey
        );
        assert_eq!(
            map.replace_key("Q", "Z").unwrap_err(),
            OrderedMapError::KeyNotFound
        );
        map.replace_key("A", "A").unwrap();
        assert_eq!(keys(&map), ["A", "X", "C"]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let left = letters(&["A", "B"]);
        let mut right = OrderedMap::new();
        right.insert_at_end("B", 1).unwrap();
        right.insert_at_end("A", 0).unwrap();
        assert_ne!(left, right);
    }
}
