//! Fixed back-to-front ordering for overlapping translucent rings.
//!
//! Keys are assigned once at setup for the default viewing direction and
//! never re-sorted as the camera moves.

use crate::geometry::RingSide;

/// Opaque identifier of a sort group. Keys only compare within a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortGroup(pub u32);

/// Order key of the solid occluder that hides the tracked anchor.
pub const OCCLUDER_ORDER: i32 = -1;

/// Order keys of both surfaces of one ring instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOrder {
    pub group: SortGroup,
    pub inner: i32,
    pub outer: i32,
}

impl DrawOrder {
    pub fn key(&self, side: RingSide) -> i32 {
        match side {
            RingSide::Inside => self.inner,
            RingSide::Outside => self.outer,
        }
    }
}

/// Scalar that correlates with apparent depth in a given configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DepthKey {
    #[default]
    Scale,
    VerticalJitter,
}

/// Sorts descending by `key`, so the largest (furthest) item comes first.
pub fn sort_by_depth_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> f32,
{
    items.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

/// Keys for `count` rings already sorted by [`sort_by_depth_key`].
///
/// Ring `i` draws its inner surface at `i` and its outer surface at
/// `2 * count - i`: every inner surface precedes every outer one, and
/// bigger rings precede smaller ones on the inner pass.
pub fn assign_draw_order(count: usize, group: SortGroup) -> Vec<DrawOrder> {
    let total = 2 * count as i32;
    (0..count as i32)
        .map(|i| DrawOrder {
            group,
            inner: i,
            outer: total - i,
        })
        .collect()
}

/// What a single draw-list entry renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawItem {
    Occluder,
    Ring { instance: usize, side: RingSide },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawEntry {
    pub order: i32,
    pub item: DrawItem,
}

/// Consecutive entries that draw the same surface kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawRun {
    pub kind: DrawRunKind,
    /// Range into [`DrawList::entries`].
    pub start: usize,
    pub len: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawRunKind {
    Occluder,
    Ring(RingSide),
}

/// All surfaces of a cluster in composite order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub entries: Vec<DrawEntry>,
    pub runs: Vec<DrawRun>,
}

impl DrawList {
    /// Flattens per-instance orders (plus the optional occluder), sorts
    /// ascending and groups runs of the same surface kind.
    pub fn build(orders: &[DrawOrder], with_occluder: bool) -> Self {
        let mut entries = Vec::with_capacity(orders.len() * 2 + 1);
        if with_occluder {
            entries.push(DrawEntry {
                order: OCCLUDER_ORDER,
                item: DrawItem::Occluder,
            });
        }
        for (instance, order) in orders.iter().enumerate() {
            for side in RingSide::BOTH {
                entries.push(DrawEntry {
                    order: order.key(side),
                    item: DrawItem::Ring { instance, side },
                });
            }
        }
        // stable: ties keep insertion order
        entries.sort_by_key(|e| e.order);

        let mut runs: Vec<DrawRun> = Vec::new();
        for (i, e) in entries.iter().enumerate() {
            let kind = match e.item {
                DrawItem::Occluder => DrawRunKind::Occluder,
                DrawItem::Ring { side, .. } => DrawRunKind::Ring(side),
            };
            match runs.last_mut() {
                Some(run) if run.kind == kind => run.len += 1,
                _ => runs.push(DrawRun {
                    kind,
                    start: i,
                    len: 1,
                }),
            }
        }
        Self { entries, runs }
    }
}
