//! Layout mutation operations.
//!
//! Every operation is total. Unknown ids, duplicate ids, and impossible
//! placements degrade to a no-op that returns the input layout itself
//! (check with [`Layout::ptr_eq`]); creations additionally report `None` for
//! the new item. Any operation that changes geometry returns a fresh layout in
//! which no two items overlap, provided the input had none.

use gridboard_core::geometry::{GridPoint, GridRect, GridSize};
use serde::{Deserialize, Serialize};

use crate::collision::{cascade, processing_order};
use crate::layout::{Layout, LayoutItem, LayoutItemId, WidgetId};

/// Request to place an item at an explicit rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLayoutItem {
    pub id: LayoutItemId,
    #[serde(rename = "widgetId")]
    pub widget_id: WidgetId,
    pub rect: GridRect,
}

impl NewLayoutItem {
    #[must_use]
    pub fn new(id: impl Into<LayoutItemId>, widget_id: impl Into<WidgetId>, rect: GridRect) -> Self {
        Self {
            id: id.into(),
            widget_id: widget_id.into(),
            rect,
        }
    }
}

/// Request to place an item wherever a rectangle of `size` first fits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeAreaRequest {
    pub id: LayoutItemId,
    #[serde(rename = "widgetId")]
    pub widget_id: WidgetId,
    pub size: GridSize,
}

impl FreeAreaRequest {
    #[must_use]
    pub fn new(id: impl Into<LayoutItemId>, widget_id: impl Into<WidgetId>, size: GridSize) -> Self {
        Self {
            id: id.into(),
            widget_id: widget_id.into(),
            size,
        }
    }
}

/// Per-edge resize amounts in grid units.
///
/// Positive values move an edge outward (growing the item), negative values
/// move it inward. Absent edges stay put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<i32>,
}

impl EdgeDelta {
    #[must_use]
    pub const fn left(delta: i32) -> Self {
        Self {
            left: Some(delta),
            top: None,
            right: None,
            bottom: None,
        }
    }

    #[must_use]
    pub const fn top(delta: i32) -> Self {
        Self {
            left: None,
            top: Some(delta),
            right: None,
            bottom: None,
        }
    }

    #[must_use]
    pub const fn right(delta: i32) -> Self {
        Self {
            left: None,
            top: None,
            right: Some(delta),
            bottom: None,
        }
    }

    #[must_use]
    pub const fn bottom(delta: i32) -> Self {
        Self {
            left: None,
            top: None,
            right: None,
            bottom: Some(delta),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}

/// Insert an item at `request.rect` and push aside whatever it covers.
///
/// The rectangle is normalized (negative fields become 0) but no minimum
/// extent is enforced. A duplicate id is rejected.
#[must_use]
pub fn create_layout_item(layout: &Layout, request: NewLayoutItem) -> (Layout, Option<LayoutItem>) {
    if layout.contains(&request.id) {
        tracing::debug!(id = %request.id, "create rejected: duplicate id");
        return (layout.clone(), None);
    }

    let item = LayoutItem {
        id: request.id,
        widget_id: request.widget_id,
        rect: request.rect.normalized(),
    };
    let mut items = layout.to_list();
    if items.push(item.clone()).is_err() {
        return (layout.clone(), None);
    }
    let last = items.len() - 1;
    let _ = cascade(&mut items, last);
    (Layout::from_list(items), Some(item))
}

/// Insert an item at the first free rectangle of `request.size`.
///
/// Scans rows top to bottom and columns left to right within the first
/// `columns` columns. Rejects duplicate ids and sizes wider than the grid.
#[must_use]
pub fn create_layout_item_at_free_area(
    layout: &Layout,
    request: FreeAreaRequest,
    columns: u16,
) -> (Layout, Option<LayoutItem>) {
    if layout.contains(&request.id) {
        tracing::debug!(id = %request.id, "free-area create rejected: duplicate id");
        return (layout.clone(), None);
    }
    let size = request.size.normalized();
    let Some(origin) = find_free_area(layout, size, columns) else {
        tracing::debug!(
            id = %request.id,
            width = size.w,
            columns,
            "free-area create rejected: wider than grid"
        );
        return (layout.clone(), None);
    };

    let item = LayoutItem {
        id: request.id,
        widget_id: request.widget_id,
        rect: GridRect::from_parts(origin, size),
    };
    let mut items = layout.to_list();
    if items.push(item.clone()).is_err() {
        return (layout.clone(), None);
    }
    (Layout::from_list(items), Some(item))
}

/// First origin at which a rectangle of `size` overlaps nothing.
///
/// On a hit the scan jumps past the right edge of the first colliding item
/// (bottom-right-first order) and continues along the row. A row that fails
/// everywhere is followed by the lowest bottom edge among the items that
/// blocked it, since no row in between can differ. The row holding the
/// layout's lowest bottom edge is always free; `None` means `size.w` exceeds
/// `columns`.
#[must_use]
pub fn find_free_area(layout: &Layout, size: GridSize, columns: u16) -> Option<GridPoint> {
    let size = size.normalized();
    let columns = i32::from(columns);
    if size.w > columns {
        return None;
    }

    let list = layout.list();
    let order = processing_order(list);
    let last_row = layout.content_bottom();

    let mut y = 0;
    while y <= last_row {
        let mut x = 0;
        let mut next_row = i32::MAX;
        while x <= columns - size.w {
            let candidate = GridRect::new(x, y, size.w, size.h);
            let hit = order
                .iter()
                .filter_map(|&index| list.get(index))
                .find(|item| item.rect.intersects(&candidate));
            match hit {
                None => return Some(GridPoint::new(x, y)),
                Some(item) => {
                    next_row = next_row.min(item.rect.bottom());
                    x = item.rect.right();
                }
            }
        }
        if next_row <= y {
            break;
        }
        y = next_row;
    }
    None
}

/// Move an item's top-left corner to `to` (negative coordinates clamp to 0).
///
/// No-op if the item is unknown or already there.
#[must_use]
pub fn move_layout_item(layout: &Layout, id: &LayoutItemId, to: GridPoint) -> Layout {
    let Some(index) = layout.position(id) else {
        return layout.clone();
    };
    let to = to.normalized();
    if layout.items()[index].rect.origin() == to {
        return layout.clone();
    }

    let mut items = layout.to_list();
    let _ = items.update_at(index, |item| item.rect = item.rect.with_origin(to));
    let _ = cascade(&mut items, index);
    Layout::from_list(items)
}

/// Resize an item by moving any of its edges.
///
/// No edge moves an extent below `min_size`, and the left/top edges never
/// cross 0. No-op if the item is unknown or the rectangle is unchanged.
#[must_use]
pub fn resize_layout_item_by_edges(
    layout: &Layout,
    id: &LayoutItemId,
    delta: EdgeDelta,
    min_size: GridSize,
) -> Layout {
    let Some(index) = layout.position(id) else {
        return layout.clone();
    };
    let current = layout.items()[index].rect;
    let next = resize_rect_by_edges(current, delta, min_size);
    if next == current {
        return layout.clone();
    }

    let mut items = layout.to_list();
    let _ = items.update_at(index, |item| item.rect = next);
    let _ = cascade(&mut items, index);
    Layout::from_list(items)
}

/// Apply an [`EdgeDelta`] to one rectangle.
///
/// Edges are applied left, right, top, bottom; each sees the extent left by
/// the previous one, so opposite edges together still respect `min_size`.
#[must_use]
pub fn resize_rect_by_edges(rect: GridRect, delta: EdgeDelta, min_size: GridSize) -> GridRect {
    let mut rect = rect;

    if let Some(left) = delta.left {
        let grow = bounded(left, min_size.w.saturating_sub(rect.w), rect.x);
        rect.x = rect.x.saturating_sub(grow);
        rect.w = rect.w.saturating_add(grow);
    }
    if let Some(right) = delta.right {
        rect.w = rect.w.saturating_add(right.max(min_size.w.saturating_sub(rect.w)));
    }
    if let Some(top) = delta.top {
        let grow = bounded(top, min_size.h.saturating_sub(rect.h), rect.y);
        rect.y = rect.y.saturating_sub(grow);
        rect.h = rect.h.saturating_add(grow);
    }
    if let Some(bottom) = delta.bottom {
        rect.h = rect.h.saturating_add(bottom.max(min_size.h.saturating_sub(rect.h)));
    }

    rect
}

/// Clamp where the upper bound wins if the bounds cross.
fn bounded(value: i32, lower: i32, upper: i32) -> i32 {
    value.max(lower).min(upper)
}

/// Remove an item. No-op if it is unknown.
#[must_use]
pub fn remove_layout_item(layout: &Layout, id: &LayoutItemId) -> Layout {
    let Some(index) = layout.position(id) else {
        return layout.clone();
    };
    let mut items = layout.to_list();
    let _ = items.remove_at(index);
    Layout::from_list(items)
}
