//! Per-lane executor
//!
//! One `LaneExecutor` instance runs per active lane, fully self-contained: it
//! owns its disjoint output slice, reads the shared parameter block, and
//! iterates its tiles through the CopyIn → Compute → CopyOut pipeline. Every
//! iteration processes `tile_data_num` elements except the last, which
//! processes the precomputed tail count. The tiling plan guarantees in-bounds
//! access by construction; there is no retry path.

use crate::dtype::Element;
use crate::executor::compute::{select_tile, strategy_for, BlendScratch, SelectStrategy};
use crate::executor::index::IndexOdometer;
use crate::executor::pipeline::TileQueue;
use crate::planner::{LaneSlice, SelectV2Params, MAX_DIMS};

/// Lifecycle of a lane
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LaneState {
    /// Initialized, not yet started
    Idle,
    /// Iterating tiles
    Running,
    /// All tiles processed
    Done,
}

/// One lane's execution state and tile-local buffers
pub(crate) struct LaneExecutor<'a, T: Element> {
    // Slice geometry
    base: u32,
    tile_num: u32,
    tile_data_num: u32,
    tail_data_num: u32,
    state: LaneState,

    // Broadcast metadata from the parameter block
    params: &'a SelectV2Params,
    cond_need_broadcast: bool,
    x1_need_broadcast: bool,
    x2_need_broadcast: bool,

    // Bulk storage
    cond_gm: &'a [u8],
    x1_gm: &'a [T],
    x2_gm: &'a [T],
    y_gm: &'a mut [T],

    // Tile-local pipeline
    in_queue_cond: TileQueue<u8>,
    in_queue_x1: TileQueue<T>,
    in_queue_x2: TileQueue<T>,
    out_queue_y: TileQueue<T>,
    scratch: BlendScratch,
    strategy: SelectStrategy,
}

impl<'a, T: Element> LaneExecutor<'a, T> {
    /// Initialize a lane for its slice.
    ///
    /// `y_slice` is this lane's disjoint region of the output buffer; the
    /// input buffers are shared whole because broadcast gathers may reach
    /// anywhere in them.
    pub fn init(
        params: &'a SelectV2Params,
        slice: LaneSlice,
        cond_gm: &'a [u8],
        x1_gm: &'a [T],
        x2_gm: &'a [T],
        y_slice: &'a mut [T],
    ) -> Self {
        let dim_num = params.dim_num as usize;
        let mut cond_need_broadcast = false;
        let mut x1_need_broadcast = false;
        let mut x2_need_broadcast = false;
        for d in 0..dim_num {
            cond_need_broadcast |= params.cond_shape[d] != params.y_shape[d];
            x1_need_broadcast |= params.x1_shape[d] != params.y_shape[d];
            x2_need_broadcast |= params.x2_shape[d] != params.y_shape[d];
        }

        let tile_len = params.tile_data_num as usize;
        Self {
            base: slice.offset,
            tile_num: slice.tile_num,
            tile_data_num: params.tile_data_num,
            tail_data_num: slice.tail_data_num,
            state: LaneState::Idle,
            params,
            cond_need_broadcast,
            x1_need_broadcast,
            x2_need_broadcast,
            cond_gm,
            x1_gm,
            x2_gm,
            y_gm: y_slice,
            in_queue_cond: TileQueue::init(tile_len),
            in_queue_x1: TileQueue::init(tile_len),
            in_queue_x2: TileQueue::init(tile_len),
            out_queue_y: TileQueue::init(tile_len),
            scratch: BlendScratch::new(tile_len),
            strategy: strategy_for(T::DTYPE),
        }
    }

    /// Run all tile iterations to completion.
    pub fn process(&mut self) {
        self.state = LaneState::Running;
        let mut process_data_num = self.tile_data_num as usize;
        for progress in 0..self.tile_num {
            if progress == self.tile_num - 1 {
                process_data_num = self.tail_data_num as usize;
            }
            self.copy_in(progress, process_data_num);
            self.compute(process_data_num);
            self.copy_out(progress, process_data_num);
        }
        self.state = LaneState::Done;
    }

    /// Terminal-state check, used by tests and the launcher
    pub fn is_done(&self) -> bool {
        self.state == LaneState::Done
    }

    /// Load one tile of each input: bulk copy when contiguous, odometer
    /// gather when the operand broadcasts.
    fn copy_in(&mut self, progress: u32, process_data_num: usize) {
        let base_index = self.base + progress * self.tile_data_num;
        let p = self.params;
        let dim_num = p.dim_num as usize;

        let slot = self.in_queue_cond.alloc();
        gather_or_copy(
            self.in_queue_cond.buf_mut(slot),
            self.cond_gm,
            base_index,
            process_data_num,
            self.cond_need_broadcast,
            dim_num,
            &p.y_shape,
            &p.y_strides,
            &p.cond_shape,
            &p.cond_strides,
        );
        self.in_queue_cond.enqueue(slot);

        let slot = self.in_queue_x1.alloc();
        gather_or_copy(
            self.in_queue_x1.buf_mut(slot),
            self.x1_gm,
            base_index,
            process_data_num,
            self.x1_need_broadcast,
            dim_num,
            &p.y_shape,
            &p.y_strides,
            &p.x1_shape,
            &p.x1_strides,
        );
        self.in_queue_x1.enqueue(slot);

        let slot = self.in_queue_x2.alloc();
        gather_or_copy(
            self.in_queue_x2.buf_mut(slot),
            self.x2_gm,
            base_index,
            process_data_num,
            self.x2_need_broadcast,
            dim_num,
            &p.y_shape,
            &p.y_strides,
            &p.x2_shape,
            &p.x2_strides,
        );
        self.in_queue_x2.enqueue(slot);
    }

    /// Select one tile into the output queue.
    fn compute(&mut self, process_data_num: usize) {
        let cond_slot = self.in_queue_cond.dequeue();
        let x1_slot = self.in_queue_x1.dequeue();
        let x2_slot = self.in_queue_x2.dequeue();
        let y_slot = self.out_queue_y.alloc();

        select_tile(
            self.strategy,
            &self.in_queue_cond.buf(cond_slot)[..process_data_num],
            &self.in_queue_x1.buf(x1_slot)[..process_data_num],
            &self.in_queue_x2.buf(x2_slot)[..process_data_num],
            &mut self.out_queue_y.buf_mut(y_slot)[..process_data_num],
            &mut self.scratch,
        );

        self.out_queue_y.enqueue(y_slot);
        self.in_queue_cond.release(cond_slot);
        self.in_queue_x1.release(x1_slot);
        self.in_queue_x2.release(x2_slot);
    }

    /// Store one tile to the lane's output region (always contiguous).
    fn copy_out(&mut self, progress: u32, process_data_num: usize) {
        let slot = self.out_queue_y.dequeue();
        let start = (progress * self.tile_data_num) as usize;
        self.y_gm[start..start + process_data_num]
            .copy_from_slice(&self.out_queue_y.buf(slot)[..process_data_num]);
        self.out_queue_y.release(slot);
    }
}

/// Fill a tile buffer from bulk storage: contiguous copy or broadcast gather.
#[allow(clippy::too_many_arguments)]
fn gather_or_copy<T: Element>(
    buf: &mut [T],
    gm: &[T],
    base_index: u32,
    process_data_num: usize,
    need_broadcast: bool,
    dim_num: usize,
    y_shape: &[u16; MAX_DIMS],
    y_strides: &[u32; MAX_DIMS],
    shape: &[u16; MAX_DIMS],
    strides: &[u32; MAX_DIMS],
) {
    if need_broadcast {
        let mut cursor =
            IndexOdometer::new(base_index, dim_num, y_shape, y_strides, shape, strides);
        for item in buf.iter_mut().take(process_data_num) {
            *item = gm[cursor.offset() as usize];
            cursor.step();
        }
    } else {
        let start = base_index as usize;
        buf[..process_data_num].copy_from_slice(&gm[start..start + process_data_num]);
    }
}
