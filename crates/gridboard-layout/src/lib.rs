#![forbid(unsafe_code)]

//! Grid layout engine for widget dashboards.
//!
//! Widgets sit on a fixed-column grid as rectangles in integer grid units.
//! This crate owns the item store, the collision resolver that keeps items
//! from overlapping, the mutation operations (create, move, resize, remove),
//! and the pixel/grid-unit transform used by renderers and pointer handlers.
//!
//! All operations are pure: they take a [`Layout`] and return a new one, or
//! the input itself when nothing changed.
//!
//! ```
//! use gridboard_layout::{GridPoint, GridRect, Layout, LayoutItem, move_layout_item};
//!
//! let layout = Layout::from_items([
//!     LayoutItem::new("clock", "w-clock", GridRect::new(0, 0, 4, 2)),
//!     LayoutItem::new("news", "w-news", GridRect::new(0, 2, 4, 2)),
//! ])
//! .unwrap();
//!
//! let moved = move_layout_item(&layout, &"clock".into(), GridPoint::new(0, 1));
//! assert_eq!(moved.get(&"news".into()).unwrap().rect.y, 3);
//! ```

pub mod collision;
pub mod config;
pub mod engine;
pub mod layout;
pub mod mutation;
pub mod snapshot;
pub mod store;
pub mod transform;

pub use gridboard_core::geometry::{GridPoint, GridRect, GridSize, PixelRect};

pub use collision::resolve_collisions;
pub use config::{
    GRID_COLUMNS, GRID_MARGIN_PX, GRID_PADDING_PX, GRID_ROWS, GridConfig, GridConfigError,
};
pub use engine::{LayoutEngine, LayoutOperation, LayoutOperationKind, LayoutOutcome, PixelEdgeDelta};
pub use layout::{Layout, LayoutBuildError, LayoutItem, LayoutItemId, WidgetId};
pub use mutation::{
    EdgeDelta, FreeAreaRequest, NewLayoutItem, create_layout_item,
    create_layout_item_at_free_area, find_free_area, move_layout_item, remove_layout_item,
    resize_layout_item_by_edges, resize_rect_by_edges,
};
pub use snapshot::{
    LAYOUT_SNAPSHOT_SCHEMA_VERSION, LayoutInvariantCode, LayoutInvariantIssue,
    LayoutInvariantReport, LayoutInvariantSeverity, LayoutRestoreError, LayoutSnapshot,
};
pub use store::{Keyed, KeyedList};
pub use transform::{
    GridTransform, Viewport, grid_col_width, grid_row_height, px_delta_to_units,
    px_to_units_offset, px_to_units_size, units_to_px_offset, units_to_px_size,
};
