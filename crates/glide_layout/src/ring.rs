//! Slot ring and recycling arithmetic
//!
//! A ring of `visible + 2` slots covers the rows around the viewport, one
//! buffer row on each side. Slots are created once. When the offset crosses
//! a row boundary, slots that scrolled out at one end are rebound to the
//! rows coming into view at the other end and moved there.
//!
//! For an offset `o` and slot size `s`, the front slot holds logical row
//! `floor(-o / s) - 1` and slot `k` holds that row plus `k`. Wrapping rings
//! reduce logical rows modulo the row count; linear rings leave slots
//! outside the data set empty.

use std::collections::VecDeque;
use std::ops::Range;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::data_source::DataSource;

/// Stable identity of a slot for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

/// One bound item inside a slot
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<T> {
    pub index: usize,
    /// `None` when the source had no data for `index`; rendered empty
    pub item: Option<T>,
}

/// A reusable row container
#[derive(Debug)]
pub struct Slot<T> {
    id: SlotId,
    row: Option<usize>,
    cells: SmallVec<[Cell<T>; 4]>,
}

impl<T> Slot<T> {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            row: None,
            cells: SmallVec::new(),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Data row this slot shows, `None` when hidden
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(|c| c.index)
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_none()
    }
}

/// Shape of the data set a ring windows over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingGeometry {
    pub item_count: usize,
    /// Items per row; 1 for lists
    pub columns: usize,
    pub wrap: bool,
}

impl RingGeometry {
    pub fn list(item_count: usize) -> Self {
        Self {
            item_count,
            columns: 1,
            wrap: false,
        }
    }

    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.item_count.div_ceil(self.columns)
        }
    }

    /// Data row for `logical` when it sits at ring position `k`
    pub fn resolve(&self, logical: i64, k: usize) -> Option<usize> {
        let rows = self.rows() as i64;
        if rows == 0 {
            return None;
        }
        if self.wrap {
            // Fewer rows than slots: leave the surplus empty rather than repeat rows
            (k < rows as usize).then(|| logical.rem_euclid(rows) as usize)
        } else if (0..rows).contains(&logical) {
            Some(logical as usize)
        } else {
            None
        }
    }
}

/// What a recycling pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecycleOutcome {
    /// Rows the ring moved forward (positive) or backward (negative)
    pub shift: i64,
    /// Slots whose content was rewritten
    pub rebound: usize,
}

/// Fixed set of slots recycled against a scroll offset
pub struct SlotRing<T> {
    slots: VecDeque<Slot<T>>,
    /// Logical row held by the front slot; `None` until the first pass
    leading: Option<i64>,
    /// Shape of the data set the slots were last bound against
    bound: Option<RingGeometry>,
    slot_size: f32,
    /// Offset at which the current leading row was aligned
    recycled_offset: f32,
    rebinds: u64,
    next_id: u32,
}

impl<T> SlotRing<T> {
    pub fn new(slot_count: usize, slot_size: f32) -> Self {
        let mut ring = Self {
            slots: VecDeque::with_capacity(slot_count),
            leading: None,
            bound: None,
            slot_size,
            recycled_offset: 0.0,
            rebinds: 0,
            next_id: 0,
        };
        for _ in 0..slot_count {
            let slot = Slot::new(ring.alloc_id());
            ring.slots.push_back(slot);
        }
        ring
    }

    fn alloc_id(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_size(&self) -> f32 {
        self.slot_size
    }

    /// Change the row size; every slot is rebound on the next pass
    pub fn set_slot_size(&mut self, slot_size: f32) {
        self.slot_size = slot_size;
        self.invalidate();
    }

    /// Forget the current binding so the next pass rebinds every slot
    pub fn invalidate(&mut self) {
        self.leading = None;
    }

    /// Geometry of the last binding pass
    pub fn geometry(&self) -> Option<RingGeometry> {
        self.bound
    }

    pub fn leading_row(&self) -> Option<i64> {
        self.leading
    }

    pub fn recycled_offset(&self) -> f32 {
        self.recycled_offset
    }

    /// Total slot rebinds since creation
    pub fn rebinds(&self) -> u64 {
        self.rebinds
    }

    /// Slots in ring order, front first
    pub fn slots(&self) -> impl Iterator<Item = &Slot<T>> {
        self.slots.iter()
    }

    /// Every bound item index in ring order
    pub fn indices(&self) -> Vec<usize> {
        self.slots.iter().flat_map(|s| s.indices()).collect()
    }

    /// Row of every slot in ring order
    pub fn rows(&self) -> Vec<Option<usize>> {
        self.slots.iter().map(|s| s.row).collect()
    }

    /// Logical row that belongs at the front for `offset`
    pub fn leading_for(&self, offset: f32) -> i64 {
        (-offset / self.slot_size).floor() as i64 - 1
    }

    /// Translation of the front slot relative to the viewport origin
    pub fn transform(&self, offset: f32) -> f32 {
        offset - self.recycled_offset - self.slot_size
    }

    /// Bring slot contents in line with `offset`.
    ///
    /// Calling this again with an offset inside the same row is a no-op.
    pub fn recycle<S>(&mut self, offset: f32, geometry: RingGeometry, source: &S) -> RecycleOutcome
    where
        S: DataSource<Item = T> + ?Sized,
    {
        if self.slots.is_empty() || self.slot_size.is_nan() || self.slot_size <= 0.0 || !offset.is_finite() {
            return RecycleOutcome::default();
        }

        let len = self.slots.len();
        let target = self.leading_for(offset);

        // A different item count, column count or wrap mode invalidates every slot
        let leading = self.leading.filter(|_| self.bound == Some(geometry));
        let outcome = match leading {
            None => RecycleOutcome {
                shift: 0,
                rebound: self.rebind_all(target, geometry, source),
            },
            Some(leading) => {
                // Equal to floor((recycled_offset - offset) / slot_size)
                let shift = target - leading;
                if shift == 0 {
                    return RecycleOutcome::default();
                }

                let rebound = if shift.unsigned_abs() >= len as u64
                    || (geometry.wrap && geometry.rows() < len)
                {
                    self.rebind_all(target, geometry, source)
                } else if shift > 0 {
                    for step in 0..shift {
                        let logical = leading + len as i64 + step;
                        if let Some(mut slot) = self.slots.pop_front() {
                            bind(&mut slot, geometry.resolve(logical, len - 1), geometry, source);
                            self.slots.push_back(slot);
                        }
                    }
                    shift as usize
                } else {
                    for step in 0..-shift {
                        let logical = leading - 1 - step;
                        if let Some(mut slot) = self.slots.pop_back() {
                            bind(&mut slot, geometry.resolve(logical, 0), geometry, source);
                            self.slots.push_front(slot);
                        }
                    }
                    (-shift) as usize
                };

                RecycleOutcome { shift, rebound }
            }
        };

        self.leading = Some(target);
        self.bound = Some(geometry);
        self.recycled_offset = -((target + 1) as f32) * self.slot_size;
        self.rebinds += outcome.rebound as u64;

        if outcome.rebound > 0 {
            self.prefetch(source);
        }

        tracing::trace!(
            offset,
            leading = target,
            shift = outcome.shift,
            rebound = outcome.rebound,
            "recycled"
        );
        outcome
    }

    /// Grow or shrink the ring. New slots join at the back and are bound to
    /// the rows following the current window; surplus slots leave from the back.
    pub fn resize<S>(&mut self, slot_count: usize, geometry: RingGeometry, source: &S)
    where
        S: DataSource<Item = T> + ?Sized,
    {
        let len = self.slots.len();
        if slot_count > len {
            for k in len..slot_count {
                let mut slot = Slot::new(self.alloc_id());
                if let Some(leading) = self.leading {
                    bind(&mut slot, geometry.resolve(leading + k as i64, k), geometry, source);
                    self.rebinds += 1;
                }
                self.slots.push_back(slot);
            }
        } else {
            self.slots.truncate(slot_count);
        }
    }

    /// Renumber logical rows by `delta` without touching slot contents.
    ///
    /// Used by wrapping rings when the offset is folded back by a whole
    /// number of data-set lengths.
    pub fn renumber(&mut self, delta: i64) {
        if let Some(leading) = self.leading {
            let leading = leading + delta;
            self.leading = Some(leading);
            self.recycled_offset = -((leading + 1) as f32) * self.slot_size;
        }
    }

    /// Every slot holds the row its position implies and no index repeats
    pub fn is_consistent(&self, geometry: RingGeometry) -> bool {
        let Some(leading) = self.leading else {
            return self.slots.iter().all(|s| s.row.is_none());
        };

        let mut seen = FxHashSet::default();
        self.slots.iter().enumerate().all(|(k, slot)| {
            slot.row == geometry.resolve(leading + k as i64, k)
                && slot.indices().all(|index| index < geometry.item_count.max(1) && seen.insert(index))
        })
    }

    fn rebind_all<S>(&mut self, leading: i64, geometry: RingGeometry, source: &S) -> usize
    where
        S: DataSource<Item = T> + ?Sized,
    {
        for (k, slot) in self.slots.iter_mut().enumerate() {
            bind(slot, geometry.resolve(leading + k as i64, k), geometry, source);
        }
        self.slots.len()
    }

    fn prefetch<S>(&self, source: &S)
    where
        S: DataSource<Item = T> + ?Sized,
    {
        // One request per contiguous run; a wrapping window splits at the seam
        let mut run: Option<Range<usize>> = None;
        for index in self.slots.iter().flat_map(|s| s.indices()) {
            match &mut run {
                Some(r) if r.end == index => r.end += 1,
                _ => {
                    if let Some(done) = run.replace(index..index + 1) {
                        source.prefetch(done);
                    }
                }
            }
        }
        if let Some(done) = run {
            source.prefetch(done);
        }
    }
}

fn bind<S>(slot: &mut Slot<S::Item>, row: Option<usize>, geometry: RingGeometry, source: &S)
where
    S: DataSource + ?Sized,
{
    slot.row = row;
    slot.cells.clear();
    if let Some(row) = row {
        let first = row * geometry.columns;
        let last = (first + geometry.columns).min(geometry.item_count);
        for index in first..last {
            slot.cells.push(Cell {
                index,
                item: source.item_at(index),
            });
        }
    }
}
