//! Render projection
//!
//! Turns ring state into positioned frames a host can draw without knowing
//! anything about recycling.

use glide_core::{Point, ScrollDirection};
use smallvec::SmallVec;

use crate::ring::{SlotId, SlotRing};

/// One item's place inside a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub index: usize,
    /// Offset from the slot origin
    pub translate: Point,
    /// The source had no data for this index
    pub empty: bool,
}

/// A slot positioned relative to the viewport origin
#[derive(Debug, Clone, PartialEq)]
pub struct SlotFrame {
    pub slot: SlotId,
    /// `None` for hidden slots
    pub row: Option<usize>,
    pub translate: Point,
    pub cells: SmallVec<[CellFrame; 4]>,
}

impl SlotFrame {
    pub fn is_hidden(&self) -> bool {
        self.row.is_none()
    }
}

/// Frames for every slot in ring order.
///
/// `cell_cross_extent` spaces grid cells along the cross axis; pass 0 for lists.
pub fn project<T>(ring: &SlotRing<T>, offset: f32, axis: ScrollDirection, cell_cross_extent: f32) -> Vec<SlotFrame> {
    let base = ring.transform(offset);
    let size = ring.slot_size();

    ring.slots()
        .enumerate()
        .map(|(k, slot)| {
            let cells = slot
                .cells()
                .iter()
                .enumerate()
                .map(|(column, cell)| CellFrame {
                    index: cell.index,
                    translate: axis.point(0.0, column as f32 * cell_cross_extent),
                    empty: cell.item.is_none(),
                })
                .collect();

            SlotFrame {
                slot: slot.id(),
                row: slot.row(),
                translate: axis.point(base + k as f32 * size, 0.0),
                cells,
            }
        })
        .collect()
}
