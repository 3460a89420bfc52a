//! Tile sizing and lane partition
//!
//! Work is divided at 32-byte block granularity over the condition buffer:
//! blocks are dealt out across lanes, the first `tail_block_num` lanes ("big"
//! lanes) absorbing one extra block each when the division is uneven. Within
//! a lane, elements are processed in tiles of `tile_data_num` elements, sized
//! so that every simultaneous tile-local buffer of the compute path fits the
//! working-memory budget with double buffering.

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::platform::PlatformInfo;

/// Base block unit in bytes
pub const BLOCK_SIZE: u32 = 32;

/// Double-buffer depth of every tile queue
pub const BUFFER_NUM: u32 = 2;

/// Condition element width in bytes (always a 1-byte boolean)
pub const COND_BYTES: u32 = 1;

/// Working-memory inflation factor per value dtype.
///
/// How many block-sized buffers one condition block's worth of elements
/// occupies across the whole compute path, counting the three value tiles,
/// the condition tile, and the temporary cast buffers that dtype's kernel
/// needs (3r for x1/x2/y, 1 for condition, 2r for the one/cond buffers, 2
/// for cast scratch, with r the value-to-condition width ratio).
pub(crate) fn rate(dtype: DType) -> Result<u32> {
    match dtype {
        DType::F16 => Ok(11),
        DType::F32 => Ok(23),
        DType::I8 => Ok(14),
        DType::I32 => Ok(23),
        _ => Err(Error::unsupported_dtype(dtype, "select_v2")),
    }
}

/// Immutable per-invocation tiling parameters
///
/// Computed once by the planner and read by every lane; all counts are in
/// elements unless noted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TilingPlan {
    /// Total number of output elements
    pub total_data_num: u32,
    /// Number of active lanes
    pub used_lane_num: u32,
    /// Number of big lanes (lanes that absorb one extra condition block)
    pub tail_block_num: u32,
    /// Elements assigned to each big lane (unclamped)
    pub big_data_num: u32,
    /// Elements assigned to each small lane (unclamped)
    pub small_data_num: u32,
    /// Tile iterations a big lane runs
    pub final_big_tile_num: u32,
    /// Tile iterations a small lane runs
    pub final_small_tile_num: u32,
    /// Elements per full tile
    pub tile_data_num: u32,
    /// Elements of a big lane's final tile
    pub big_tail_data_num: u32,
    /// Elements of a small lane's final tile
    pub small_tail_data_num: u32,
}

/// One lane's share of the work, clamped to the output length
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneSlice {
    /// First output element this lane owns
    pub offset: u32,
    /// Number of elements this lane owns
    pub data_num: u32,
    /// Tile iterations this lane runs
    pub tile_num: u32,
    /// Elements of the final (ragged) tile
    pub tail_data_num: u32,
}

impl TilingPlan {
    /// Compute the tiling for one invocation.
    ///
    /// `need_broadcast` forces a single lane: the general N-D gather keeps
    /// per-dimension cursor state that is not worth duplicating across lanes
    /// (known limitation inherited from the reference schedule).
    pub fn compute(
        total_data_num: u64,
        dtype: DType,
        platform: &PlatformInfo,
        need_broadcast: bool,
    ) -> Result<Self> {
        let total: u32 = total_data_num.try_into().map_err(|_| {
            Error::invalid_argument("y_shape", format!("{total_data_num} elements exceed u32"))
        })?;

        let rate = rate(dtype)?;

        // Tile sizing under the memory budget: BUFFER_NUM rotating copies of
        // `rate` block-sized buffers per condition block must fit.
        let tile_cond_block_num = platform.working_memory_bytes / BUFFER_NUM / BLOCK_SIZE / rate;
        if tile_cond_block_num == 0 {
            return Err(Error::invalid_argument(
                "working_memory_bytes",
                format!(
                    "budget {} cannot hold one {BLOCK_SIZE}-byte block per buffer at rate {rate}",
                    platform.working_memory_bytes
                ),
            ));
        }
        let tile_data_num = BLOCK_SIZE * tile_cond_block_num / COND_BYTES;

        // Lane partition at condition-block granularity.
        let cond_block_num = total.div_ceil(BLOCK_SIZE / COND_BYTES);
        let hardware_lanes = if need_broadcast { 1 } else { platform.lane_count };
        let used_lane_num = hardware_lanes.min(cond_block_num).max(1);

        let every_lane_cond_block = cond_block_num / used_lane_num;
        let tail_block_num = cond_block_num % used_lane_num;

        // Small lanes.
        let small_data_num = every_lane_cond_block * BLOCK_SIZE / COND_BYTES;
        let small_tile_num = every_lane_cond_block / tile_cond_block_num;
        let final_small_tile_num = if every_lane_cond_block % tile_cond_block_num == 0 {
            small_tile_num
        } else {
            small_tile_num + 1
        };
        let small_tail_data_num = match small_data_num - tile_data_num * small_tile_num {
            0 => tile_data_num,
            tail => tail,
        };

        // Big lanes: one extra condition block each.
        let big_cond_block = every_lane_cond_block + 1;
        let big_data_num = big_cond_block * BLOCK_SIZE / COND_BYTES;
        let big_tile_num = big_cond_block / tile_cond_block_num;
        let final_big_tile_num = if big_cond_block % tile_cond_block_num == 0 {
            big_tile_num
        } else {
            big_tile_num + 1
        };
        let big_tail_data_num = match big_data_num - tile_data_num * big_tile_num {
            0 => tile_data_num,
            tail => tail,
        };

        Ok(Self {
            total_data_num: total,
            used_lane_num,
            tail_block_num,
            big_data_num,
            small_data_num,
            final_big_tile_num,
            final_small_tile_num,
            tile_data_num,
            big_tail_data_num,
            small_tail_data_num,
        })
    }

    /// The slice of `[0, total_data_num)` lane `lane` owns.
    ///
    /// Lane boundaries fall on condition-block multiples except for the very
    /// last occupied lane, whose count is clamped so the slices exactly cover
    /// the output with no block padding. A clamped lane re-derives its tile
    /// and tail counts from the clamped element count.
    pub fn lane_slice(&self, lane: u32) -> LaneSlice {
        let (class_data_num, class_tiles, class_tail, offset) = if lane < self.tail_block_num {
            (
                self.big_data_num,
                self.final_big_tile_num,
                self.big_tail_data_num,
                self.big_data_num * lane,
            )
        } else {
            (
                self.small_data_num,
                self.final_small_tile_num,
                self.small_tail_data_num,
                self.big_data_num * self.tail_block_num
                    + self.small_data_num * (lane - self.tail_block_num),
            )
        };

        let offset = offset.min(self.total_data_num);
        let data_num = class_data_num.min(self.total_data_num - offset);

        if data_num == class_data_num {
            return LaneSlice {
                offset,
                data_num,
                tile_num: class_tiles,
                tail_data_num: class_tail,
            };
        }

        // Clamped (last occupied) lane: ragged tail against the true total.
        let (tile_num, tail_data_num) = if data_num == 0 {
            (0, 0)
        } else {
            let tiles = data_num.div_ceil(self.tile_data_num);
            (tiles, data_num - self.tile_data_num * (tiles - 1))
        };
        LaneSlice {
            offset,
            data_num,
            tile_num,
            tail_data_num,
        }
    }
}
