#![no_main]

use arbitrary::Arbitrary;
use gridboard_layout::{
    EdgeDelta, FreeAreaRequest, GridPoint, GridRect, GridSize, Layout, LayoutEngine,
    LayoutOperation, NewLayoutItem,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Create { slot: u8, x: i8, y: i8, w: u8, h: u8 },
    CreateAtFreeArea { slot: u8, w: u8, h: u8 },
    Move { slot: u8, x: i8, y: i8 },
    Resize { slot: u8, left: Option<i8>, top: Option<i8>, right: Option<i8>, bottom: Option<i8> },
    Remove { slot: u8 },
}

// A small id space so operations keep hitting existing items.
fn id(slot: u8) -> String {
    format!("item-{}", slot % 24)
}

fn to_operation(step: Step) -> LayoutOperation {
    let edge = |v: Option<i8>| v.map(i32::from);
    match step {
        Step::Create { slot, x, y, w, h } => LayoutOperation::Create {
            item: NewLayoutItem::new(
                id(slot),
                "widget",
                GridRect::new(i32::from(x), i32::from(y), i32::from(w % 20), i32::from(h % 12)),
            ),
        },
        Step::CreateAtFreeArea { slot, w, h } => LayoutOperation::CreateAtFreeArea {
            request: FreeAreaRequest::new(
                id(slot),
                "widget",
                GridSize::new(i32::from(w % 20), i32::from(h % 12)),
            ),
        },
        Step::Move { slot, x, y } => LayoutOperation::Move {
            id: id(slot).into(),
            to: GridPoint::new(i32::from(x), i32::from(y)),
        },
        Step::Resize {
            slot,
            left,
            top,
            right,
            bottom,
        } => LayoutOperation::ResizeByEdges {
            id: id(slot).into(),
            delta: EdgeDelta {
                left: edge(left),
                top: edge(top),
                right: edge(right),
                bottom: edge(bottom),
            },
            min_size: GridSize::new(1, 1),
        },
        Step::Remove { slot } => LayoutOperation::Remove { id: id(slot).into() },
    }
}

fuzz_target!(|steps: Vec<Step>| {
    // Cap sequence length to keep each run short.
    if steps.len() > 256 {
        return;
    }

    let engine = LayoutEngine::default();
    let mut layout = Layout::new();
    for step in steps {
        let outcome = engine.apply(&layout, to_operation(step));
        assert_eq!(outcome.changed, !Layout::ptr_eq(&layout, &outcome.layout));
        assert!(
            !outcome.layout.has_overlaps(),
            "overlaps: {:?}",
            outcome.layout.overlapping_pairs()
        );
        layout = outcome.layout;
    }

    let restored = layout
        .to_snapshot()
        .into_layout()
        .expect("engine output passes its own invariant check");
    assert_eq!(restored, layout);
});
