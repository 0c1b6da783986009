//! Ordered, id-indexed item storage.
//!
//! [`KeyedList`] keeps items in insertion order (consumers iterate it
//! directly) while answering key lookups through a hash index. Every
//! mutation keeps the index consistent with the backing vector.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// An item with a stable identity key.
pub trait Keyed {
    type Key: Clone + Eq + Hash;

    fn key(&self) -> &Self::Key;
}

/// Ordered list with unique keys and O(1) lookup by key.
#[derive(Debug, Clone)]
pub struct KeyedList<T: Keyed> {
    items: Vec<T>,
    index: FxHashMap<T::Key, usize>,
}

impl<T: Keyed> Default for KeyedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: Keyed> KeyedList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items, handing back the first item whose key repeats.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self, T> {
        let mut list = Self::new();
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Index of the item with `key`.
    #[must_use]
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    #[must_use]
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.position(key).and_then(|index| self.items.get(index))
    }

    #[must_use]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Append at the end. A duplicate key hands the item back.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        self.insert_at(self.items.len(), item)
    }

    /// Insert at `position` (clamped to the list length).
    ///
    /// A duplicate key hands the item back and leaves the list untouched.
    pub fn insert_at(&mut self, position: usize, item: T) -> Result<(), T> {
        if self.index.contains_key(item.key()) {
            return Err(item);
        }
        let position = position.min(self.items.len());
        self.items.insert(position, item);
        self.reindex_from(position);
        Ok(())
    }

    /// Remove the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        let _ = self.index.remove(removed.key());
        self.reindex_from(index);
        Some(removed)
    }

    /// Move the item at `from` so it ends up at `to`.
    ///
    /// Returns `false` when either index is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
            self.reindex_from(from.min(to));
        }
        true
    }

    /// Mutate the item at `index` in place.
    ///
    /// If the closure changes the key to one already used by another item
    /// the change is reverted and `false` is returned.
    pub fn update_at(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let before = item.clone();
        f(item);
        if item.key() == before.key() {
            return true;
        }
        if self.index.contains_key(item.key()) {
            *item = before;
            return false;
        }
        let _ = self.index.remove(before.key());
        let _ = self.index.insert(item.key().clone(), index);
        true
    }

    fn reindex_from(&mut self, start: usize) {
        for (offset, item) in self.items[start..].iter().enumerate() {
            let _ = self.index.insert(item.key().clone(), start + offset);
        }
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Keyed + PartialEq> PartialEq for KeyedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Keyed + Eq> Eq for KeyedList<T> {}

#[cfg(test)]
mod tests {
    use super::{Keyed, KeyedList};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        key: &'static str,
        value: u32,
    }

    impl Keyed for Entry {
        type Key = &'static str;

        fn key(&self) -> &Self::Key {
            &self.key
        }
    }

    fn entry(key: &'static str, value: u32) -> Entry {
        Entry { key, value }
    }

    fn keys(list: &KeyedList<Entry>) -> Vec<&'static str> {
        list.iter().map(|e| e.key).collect()
    }

    fn assert_index_consistent(list: &KeyedList<Entry>) {
        for (i, e) in list.iter().enumerate() {
            assert_eq!(list.position(&e.key), Some(i), "index drift for {}", e.key);
        }
    }

    #[test]
    fn push_and_find() {
        let mut list = KeyedList::new();
        list.push(entry("a", 1)).expect("fresh key");
        list.push(entry("b", 2)).expect("fresh key");
        assert_eq!(list.len(), 2);
        assert_eq!(list.find(&"b").map(|e| e.value), Some(2));
        assert_eq!(list.position(&"a"), Some(0));
        assert!(list.find(&"zzz").is_none());
    }

    #[test]
    fn duplicate_key_is_handed_back() {
        let mut list = KeyedList::new();
        list.push(entry("a", 1)).expect("fresh key");
        let rejected = list.push(entry("a", 9)).expect_err("duplicate key");
        assert_eq!(rejected.value, 9);
        assert_eq!(list.len(), 1);
        assert_eq!(list.find(&"a").map(|e| e.value), Some(1));
    }

    #[test]
    fn from_items_rejects_duplicates() {
        let err = KeyedList::from_items([entry("a", 1), entry("b", 2), entry("a", 3)])
            .expect_err("duplicate key");
        assert_eq!(err, entry("a", 3));
    }

    #[test]
    fn insert_at_shifts_index() {
        let mut list = KeyedList::from_items([entry("a", 1), entry("c", 3)]).expect("unique");
        list.insert_at(1, entry("b", 2)).expect("fresh key");
        assert_eq!(keys(&list), ["a", "b", "c"]);
        assert_index_consistent(&list);

        list.insert_at(99, entry("d", 4)).expect("fresh key");
        assert_eq!(keys(&list), ["a", "b", "c", "d"]);
    }

    #[test]
    fn remove_at_reindexes_tail() {
        let mut list =
            KeyedList::from_items([entry("a", 1), entry("b", 2), entry("c", 3)]).expect("unique");
        assert_eq!(list.remove_at(0), Some(entry("a", 1)));
        assert_eq!(keys(&list), ["b", "c"]);
        assert!(!list.contains(&"a"));
        assert_index_consistent(&list);
        assert_eq!(list.remove_at(5), None);
    }

    #[test]
    fn reorder_moves_item() {
        let mut list = KeyedList::from_items([entry("a", 1), entry("b", 2), entry("c", 3)])
            .expect("unique");
        assert!(list.reorder(0, 2));
        assert_eq!(keys(&list), ["b", "c", "a"]);
        assert_index_consistent(&list);
        assert!(list.reorder(2, 0));
        assert_eq!(keys(&list), ["a", "b", "c"]);
        assert!(!list.reorder(0, 3));
    }

    #[test]
    fn update_at_keeps_index_and_rejects_key_collisions() {
        let mut list = KeyedList::from_items([entry("a", 1), entry("b", 2)]).expect("unique");
        assert!(list.update_at(0, |e| e.value = 10));
        assert_eq!(list.find(&"a").map(|e| e.value), Some(10));

        assert!(!list.update_at(0, |e| e.key = "b"));
        assert_eq!(keys(&list), ["a", "b"]);

        assert!(list.update_at(1, |e| e.key = "z"));
        assert_eq!(list.position(&"z"), Some(1));
        assert!(!list.contains(&"b"));
        assert!(!list.update_at(7, |_| {}));
    }
}
