//! Double-buffered tile queues
//!
//! Each queue role (three inputs, one output) owns `BUFFER_NUM` rotating
//! tile-local buffers, sized once to the full tile element count and reused
//! for every iteration without reallocation. A stage takes a free slot with
//! [`TileQueue::alloc`], fills it, and hands it downstream with `enqueue`;
//! the consumer claims it with `dequeue` and returns it to the free list with
//! `release`. With two slots per role, the load of tile *i+1* may fill one
//! slot while tile *i*'s data still occupies the other.
//!
//! Queue misuse (alloc with no free slot, dequeue with nothing enqueued)
//! cannot happen when the lane loop runs its stages in order; it is treated
//! as a programming-error assertion, not a recoverable condition.

use std::collections::VecDeque;

use crate::dtype::Element;
use crate::planner::BUFFER_NUM;

/// Index of a tile buffer inside its queue
pub(crate) type Slot = usize;

/// A fixed set of rotating tile buffers with a FIFO handshake
pub(crate) struct TileQueue<T> {
    slots: Vec<Vec<T>>,
    free: VecDeque<Slot>,
    ready: VecDeque<Slot>,
}

impl<T: Element> TileQueue<T> {
    /// Allocate `BUFFER_NUM` buffers of `tile_len` elements each
    pub fn init(tile_len: usize) -> Self {
        let depth = BUFFER_NUM as usize;
        Self {
            slots: (0..depth).map(|_| vec![T::zero(); tile_len]).collect(),
            free: (0..depth).collect(),
            ready: VecDeque::with_capacity(depth),
        }
    }

    /// Take a free slot for filling
    pub fn alloc(&mut self) -> Slot {
        self.free.pop_front().expect("tile queue over-allocated")
    }

    /// Hand a filled slot to the consuming stage
    pub fn enqueue(&mut self, slot: Slot) {
        self.ready.push_back(slot);
    }

    /// Claim the oldest filled slot
    pub fn dequeue(&mut self) -> Slot {
        self.ready.pop_front().expect("tile queue dequeued while empty")
    }

    /// Return a consumed slot to the free list
    pub fn release(&mut self, slot: Slot) {
        self.free.push_back(slot);
    }

    /// Read access to a slot's buffer
    pub fn buf(&self, slot: Slot) -> &[T] {
        &self.slots[slot]
    }

    /// Write access to a slot's buffer
    pub fn buf_mut(&mut self, slot: Slot) -> &mut [T] {
        &mut self.slots[slot]
    }
}
