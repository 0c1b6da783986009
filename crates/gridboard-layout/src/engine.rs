//! Replayable layout operations.
//!
//! [`LayoutOperation`] is the data form of every mutation in
//! [`crate::mutation`], so an editing session can be logged as a sequence of
//! operations and replayed deterministically. [`LayoutEngine`] binds the
//! operations to one validated [`GridConfig`] and adds pointer-driven helpers
//! that take pixel deltas instead of grid units.

use gridboard_core::geometry::{GridPoint, GridSize};
use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, GridConfigError};
use crate::layout::{Layout, LayoutItem, LayoutItemId};
use crate::mutation::{
    EdgeDelta, FreeAreaRequest, NewLayoutItem, create_layout_item,
    create_layout_item_at_free_area, move_layout_item, remove_layout_item,
    resize_layout_item_by_edges,
};
use crate::transform::{GridTransform, Viewport};

/// One layout mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOperation {
    Create {
        item: NewLayoutItem,
    },
    CreateAtFreeArea {
        request: FreeAreaRequest,
    },
    Move {
        id: LayoutItemId,
        to: GridPoint,
    },
    ResizeByEdges {
        id: LayoutItemId,
        delta: EdgeDelta,
        min_size: GridSize,
    },
    Remove {
        id: LayoutItemId,
    },
}

impl LayoutOperation {
    #[must_use]
    pub const fn kind(&self) -> LayoutOperationKind {
        match self {
            Self::Create { .. } => LayoutOperationKind::Create,
            Self::CreateAtFreeArea { .. } => LayoutOperationKind::CreateAtFreeArea,
            Self::Move { .. } => LayoutOperationKind::Move,
            Self::ResizeByEdges { .. } => LayoutOperationKind::ResizeByEdges,
            Self::Remove { .. } => LayoutOperationKind::Remove,
        }
    }
}

/// Stable operation discriminant for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutOperationKind {
    Create,
    CreateAtFreeArea,
    Move,
    ResizeByEdges,
    Remove,
}

impl LayoutOperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::CreateAtFreeArea => "create_at_free_area",
            Self::Move => "move",
            Self::ResizeByEdges => "resize_by_edges",
            Self::Remove => "remove",
        }
    }
}

/// Result of applying one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub layout: Layout,
    /// The inserted item, for accepted create operations.
    pub created: Option<LayoutItem>,
    /// False when `layout` is the input layout itself.
    pub changed: bool,
}

/// Pointer deltas per edge, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelEdgeDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

impl PixelEdgeDelta {
    /// Whole-unit edge deltas under `transform`.
    #[must_use]
    pub fn to_units(self, transform: &GridTransform) -> EdgeDelta {
        EdgeDelta {
            left: self.left.map(|px| transform.dx_to_units(px)),
            top: self.top.map(|py| transform.dy_to_units(py)),
            right: self.right.map(|px| transform.dx_to_units(px)),
            bottom: self.bottom.map(|py| transform.dy_to_units(py)),
        }
    }
}

/// Applies operations under one grid configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: GridConfig,
}

impl LayoutEngine {
    /// Build an engine, rejecting invalid configuration.
    pub fn new(config: GridConfig) -> Result<Self, GridConfigError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Pixel transform for `viewport`.
    #[must_use]
    pub fn transform(&self, viewport: Viewport) -> GridTransform {
        GridTransform::new(viewport, &self.config)
    }

    /// Apply one operation to `layout`.
    #[must_use]
    pub fn apply(&self, layout: &Layout, operation: LayoutOperation) -> LayoutOutcome {
        let _span =
            tracing::debug_span!("layout_apply", op = operation.kind().as_str()).entered();

        let (next, created) = match operation {
            LayoutOperation::Create { item } => create_layout_item(layout, item),
            LayoutOperation::CreateAtFreeArea { request } => {
                create_layout_item_at_free_area(layout, request, self.config.columns)
            }
            LayoutOperation::Move { id, to } => (move_layout_item(layout, &id, to), None),
            LayoutOperation::ResizeByEdges {
                id,
                delta,
                min_size,
            } => (
                resize_layout_item_by_edges(layout, &id, delta, min_size),
                None,
            ),
            LayoutOperation::Remove { id } => (remove_layout_item(layout, &id), None),
        };

        let changed = !Layout::ptr_eq(layout, &next);
        tracing::debug!(changed, items = next.len(), "layout operation applied");
        LayoutOutcome {
            layout: next,
            created,
            changed,
        }
    }

    /// Apply `operations` in order and return the final layout.
    #[must_use]
    pub fn replay(
        &self,
        layout: &Layout,
        operations: impl IntoIterator<Item = LayoutOperation>,
    ) -> Layout {
        operations
            .into_iter()
            .fold(layout.clone(), |current, operation| {
                self.apply(&current, operation).layout
            })
    }

    /// Move an item by a pointer delta, snapped to whole cells.
    #[must_use]
    pub fn move_item_by_px(
        &self,
        layout: &Layout,
        id: &LayoutItemId,
        viewport: Viewport,
        dx: f64,
        dy: f64,
    ) -> Layout {
        let Some(item) = layout.get(id) else {
            return layout.clone();
        };
        let transform = self.transform(viewport);
        let origin = item.rect.origin();
        let to = GridPoint::new(
            origin.x.saturating_add(transform.dx_to_units(dx)),
            origin.y.saturating_add(transform.dy_to_units(dy)),
        );
        move_layout_item(layout, id, to)
    }

    /// Resize an item by per-edge pointer deltas, snapped to whole cells.
    #[must_use]
    pub fn resize_item_by_px(
        &self,
        layout: &Layout,
        id: &LayoutItemId,
        viewport: Viewport,
        delta: PixelEdgeDelta,
        min_size: GridSize,
    ) -> Layout {
        let delta = delta.to_units(&self.transform(viewport));
        resize_layout_item_by_edges(layout, id, delta, min_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::geometry::GridRect;
    use tracing_test::traced_test;

    const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

    fn layout(items: impl IntoIterator<Item = LayoutItem>) -> Layout {
        Layout::from_items(items).expect("unique ids")
    }

    fn item(id: &str, x: i32, y: i32, w: i32, h: i32) -> LayoutItem {
        LayoutItem::new(id, "w", GridRect::new(x, y, w, h))
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GridConfig {
            columns: 0,
            ..GridConfig::default()
        };
        assert!(matches!(
            LayoutEngine::new(config),
            Err(GridConfigError::Validation(_))
        ));
    }

    #[test]
    fn operation_json_is_tagged() {
        let op = LayoutOperation::Move {
            id: "A".into(),
            to: GridPoint::new(1, 2),
        };
        let json = serde_json::to_value(&op).expect("operation should serialize");
        assert_eq!(
            json,
            serde_json::json!({"op": "move", "id": "A", "to": {"x": 1, "y": 2}})
        );
        let back: LayoutOperation = serde_json::from_value(json).expect("operation should parse");
        assert_eq!(back, op);
        assert_eq!(back.kind().as_str(), "move");
    }

    #[test]
    fn resize_operation_parses_from_json() {
        let op: LayoutOperation = serde_json::from_value(serde_json::json!({
            "op": "resize_by_edges",
            "id": "A",
            "delta": {"right": 2},
            "min_size": {"w": 1, "h": 1}
        }))
        .expect("operation should parse");
        assert_eq!(op.kind(), LayoutOperationKind::ResizeByEdges);
    }

    #[test]
    fn apply_reports_creation_and_change() {
        let engine = LayoutEngine::default();
        let empty = Layout::new();
        let outcome = engine.apply(
            &empty,
            LayoutOperation::CreateAtFreeArea {
                request: FreeAreaRequest::new("A", "clock", GridSize::new(4, 2)),
            },
        );
        assert!(outcome.changed);
        assert_eq!(
            outcome.created.map(|i| i.rect),
            Some(GridRect::new(0, 0, 4, 2))
        );

        let again = engine.apply(&outcome.layout, LayoutOperation::Remove { id: "Z".into() });
        assert!(!again.changed);
        assert!(Layout::ptr_eq(&again.layout, &outcome.layout));
    }

    #[test]
    fn free_area_uses_configured_columns() {
        let engine = LayoutEngine::new(GridConfig {
            columns: 4,
            ..GridConfig::default()
        })
        .expect("valid config");
        let start = layout([item("A", 0, 0, 4, 1)]);
        let outcome = engine.apply(
            &start,
            LayoutOperation::CreateAtFreeArea {
                request: FreeAreaRequest::new("B", "w", GridSize::new(2, 1)),
            },
        );
        assert_eq!(outcome.created.map(|i| i.rect), Some(GridRect::new(0, 1, 2, 1)));

        let rejected = engine.apply(
            &start,
            LayoutOperation::CreateAtFreeArea {
                request: FreeAreaRequest::new("C", "w", GridSize::new(5, 1)),
            },
        );
        assert!(rejected.created.is_none());
        assert!(!rejected.changed);
    }

    #[test]
    fn replay_folds_operations() {
        let engine = LayoutEngine::default();
        let ops = vec![
            LayoutOperation::Create {
                item: NewLayoutItem::new("A", "w", GridRect::new(0, 0, 4, 2)),
            },
            LayoutOperation::Create {
                item: NewLayoutItem::new("B", "w", GridRect::new(0, 2, 4, 2)),
            },
            LayoutOperation::Move {
                id: "A".into(),
                to: GridPoint::new(0, 1),
            },
            LayoutOperation::ResizeByEdges {
                id: "B".into(),
                delta: EdgeDelta::right(2),
                min_size: GridSize::new(1, 1),
            },
        ];
        let result = engine.replay(&Layout::new(), ops);
        assert_eq!(
            result,
            layout([item("A", 0, 1, 4, 2), item("B", 0, 3, 6, 2)])
        );
    }

    #[test]
    fn move_by_px_snaps_to_strides() {
        let engine = LayoutEngine::default();
        let start = layout([item("A", 2, 2, 2, 2)]);
        // Column stride 79.625, row stride 89.25.
        let moved = engine.move_item_by_px(&start, &"A".into(), VIEWPORT, 170.0, -100.0);
        assert_eq!(moved.get(&"A".into()).map(|i| i.rect), Some(GridRect::new(4, 1, 2, 2)));

        let jitter = engine.move_item_by_px(&start, &"A".into(), VIEWPORT, 20.0, -30.0);
        assert!(Layout::ptr_eq(&start, &jitter));
    }

    #[test]
    fn resize_by_px_grows_edges() {
        let engine = LayoutEngine::default();
        let start = layout([item("A", 2, 2, 2, 2)]);
        let delta = PixelEdgeDelta {
            left: Some(80.0),
            bottom: Some(180.0),
            ..PixelEdgeDelta::default()
        };
        let resized =
            engine.resize_item_by_px(&start, &"A".into(), VIEWPORT, delta, GridSize::new(1, 1));
        assert_eq!(resized.get(&"A".into()).map(|i| i.rect), Some(GridRect::new(1, 2, 3, 4)));
    }

    #[test]
    #[traced_test]
    fn apply_logs_collision_cascade() {
        let engine = LayoutEngine::default();
        let start = layout([item("A", 0, 0, 4, 2), item("B", 0, 2, 4, 2)]);
        let outcome = engine.apply(
            &start,
            LayoutOperation::Move {
                id: "A".into(),
                to: GridPoint::new(0, 1),
            },
        );
        assert!(outcome.changed);
        assert!(logs_contain("collision cascade settled"));
        assert!(logs_contain("layout operation applied"));
    }
}
