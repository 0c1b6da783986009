//! Cascading collision resolution.
//!
//! When one item (the initiator) moves, grows, or is inserted, every item it
//! now overlaps is pushed straight down so its top edge sits on the pusher's
//! bottom edge. Each pushed item then becomes the pusher for whatever it
//! overlaps in turn, until nothing collides.
//!
//! Items are never moved sideways or upward, so every push strictly increases
//! one item's `y` and the cascade always terminates. The walk is depth-first
//! and visits colliders bottom-right first (descending `y`, then descending
//! `x`, by their positions before the pass). It runs on an explicit stack, so
//! long chains do not grow the call stack.

use crate::layout::{Layout, LayoutItem, LayoutItemId};
use crate::store::KeyedList;

/// Resolve overlaps caused by `initiator`.
///
/// Returns `layout` itself (same allocation) when the initiator is unknown
/// or nothing had to move.
#[must_use]
pub fn resolve_collisions(layout: &Layout, initiator: &LayoutItemId) -> Layout {
    let Some(index) = layout.position(initiator) else {
        return layout.clone();
    };
    let mut items = layout.to_list();
    if cascade(&mut items, index) == 0 {
        return layout.clone();
    }
    Layout::from_list(items)
}

/// Indices of every item intersecting `items[index]`, in processing order.
#[must_use]
pub fn collisions(items: &KeyedList<LayoutItem>, order: &[usize], index: usize) -> Vec<usize> {
    let Some(subject) = items.get(index) else {
        return Vec::new();
    };
    order
        .iter()
        .copied()
        .filter(|&other| other != index)
        .filter(|&other| {
            items
                .get(other)
                .is_some_and(|item| item.rect.intersects(&subject.rect))
        })
        .collect()
}

/// Item indices sorted bottom-right first.
#[must_use]
pub fn processing_order(items: &KeyedList<LayoutItem>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (items.as_slice()[a].rect, items.as_slice()[b].rect);
        rb.y.cmp(&ra.y).then(rb.x.cmp(&ra.x))
    });
    order
}

struct Frame {
    pusher: usize,
    colliders: Vec<usize>,
    next: usize,
}

/// Push everything overlapping `initiator` downward, transitively.
///
/// Returns the number of pushes performed.
pub(crate) fn cascade(items: &mut KeyedList<LayoutItem>, initiator: usize) -> usize {
    let order = processing_order(items);
    let mut pushes = 0usize;
    let mut stack = vec![Frame {
        pusher: initiator,
        colliders: collisions(items, &order, initiator),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&target) = frame.colliders.get(frame.next) else {
            let _ = stack.pop();
            continue;
        };
        frame.next += 1;
        let pusher = frame.pusher;
        if target == initiator {
            continue;
        }

        let pusher_rect = items.as_slice()[pusher].rect;
        // An earlier branch may already have carried the target clear.
        if !items.as_slice()[target].rect.intersects(&pusher_rect) {
            continue;
        }
        let _ = items.update_at(target, |item| item.rect.y = pusher_rect.bottom());
        pushes += 1;

        stack.push(Frame {
            pusher: target,
            colliders: collisions(items, &order, target),
            next: 0,
        });
    }

    tracing::debug!(
        initiator = %items.as_slice()[initiator].id,
        pushes,
        "collision cascade settled"
    );
    pushes
}
