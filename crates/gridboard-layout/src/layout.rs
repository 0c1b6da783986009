//! Layout items and the immutable layout value.
//!
//! A [`Layout`] is a shared, immutable snapshot. Mutation operations never
//! touch their input; they return either the very same allocation (nothing
//! changed) or a fresh one. [`Layout::ptr_eq`] is the identity check callers
//! use to tell the two apart.

use std::fmt;
use std::sync::Arc;

use gridboard_core::geometry::GridRect;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::store::{Keyed, KeyedList};

/// Identifier of a layout item, unique within one layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutItemId(String);

impl LayoutItemId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayoutItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for LayoutItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Opaque reference to the widget hosted by an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for WidgetId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One placed widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: LayoutItemId,
    #[serde(rename = "widgetId")]
    pub widget_id: WidgetId,
    pub rect: GridRect,
}

impl LayoutItem {
    #[must_use]
    pub fn new(id: impl Into<LayoutItemId>, widget_id: impl Into<WidgetId>, rect: GridRect) -> Self {
        Self {
            id: id.into(),
            widget_id: widget_id.into(),
            rect,
        }
    }
}

impl Keyed for LayoutItem {
    type Key = LayoutItemId;

    fn key(&self) -> &LayoutItemId {
        &self.id
    }
}

/// Errors while building a layout from raw items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutBuildError {
    DuplicateItemId { id: LayoutItemId },
}

impl fmt::Display for LayoutBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItemId { id } => write!(f, "duplicate layout item id {id:?}"),
        }
    }
}

impl std::error::Error for LayoutBuildError {}

/// Ordered, immutable set of layout items for one canvas.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    items: Arc<KeyedList<LayoutItem>>,
}

impl Layout {
    /// Empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items in order, rejecting duplicate ids.
    pub fn from_items(items: impl IntoIterator<Item = LayoutItem>) -> Result<Self, LayoutBuildError> {
        KeyedList::from_items(items)
            .map(Self::from_list)
            .map_err(|item| LayoutBuildError::DuplicateItemId { id: item.id })
    }

    pub(crate) fn from_list(items: KeyedList<LayoutItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub(crate) fn list(&self) -> &KeyedList<LayoutItem> {
        &self.items
    }

    /// Working copy of the items for a mutation.
    pub(crate) fn to_list(&self) -> KeyedList<LayoutItem> {
        self.items.as_ref().clone()
    }

    /// True when both values share the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.items, &b.items)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[LayoutItem] {
        self.items.as_slice()
    }

    #[must_use]
    pub fn get(&self, id: &LayoutItemId) -> Option<&LayoutItem> {
        self.items.find(id)
    }

    #[must_use]
    pub fn position(&self, id: &LayoutItemId) -> Option<usize> {
        self.items.position(id)
    }

    #[must_use]
    pub fn contains(&self, id: &LayoutItemId) -> bool {
        self.items.contains(id)
    }

    /// Lowest occupied row boundary (`max(y + h)`), or 0 when empty.
    #[must_use]
    pub fn content_bottom(&self) -> i32 {
        self.iter().map(|item| item.rect.bottom()).max().unwrap_or(0).max(0)
    }

    /// Every pair of distinct items whose rectangles intersect, in layout order.
    #[must_use]
    pub fn overlapping_pairs(&self) -> Vec<(LayoutItemId, LayoutItemId)> {
        let items = self.items();
        let mut pairs = Vec::new();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                if a.rect.intersects(&b.rect) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }

    #[must_use]
    pub fn has_overlaps(&self) -> bool {
        let items = self.items();
        items
            .iter()
            .enumerate()
            .any(|(i, a)| items[i + 1..].iter().any(|b| a.rect.intersects(&b.rect)))
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.items == other.items
    }
}

impl Eq for Layout {}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutItem;
    type IntoIter = std::slice::Iter<'a, LayoutItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LayoutItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}
