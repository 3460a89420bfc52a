//! Fixed-layout parameter block
//!
//! The planner's entire output — tiling scalars, aligned shapes, and stride
//! tables — packed into one `#[repr(C)]` block with a stable byte layout.
//! The block is written once by the planner and read verbatim by every lane;
//! there are no partial updates. Shapes use the compact 16-bit extent layout,
//! strides are 32-bit element counts.

use bytemuck::{Pod, Zeroable};

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::planner::shape::{BroadcastSpec, MAX_DIMS};
use crate::planner::tiling::TilingPlan;

/// Serialized tiling parameters for one invocation
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct SelectV2Params {
    /// Total number of output elements
    pub total_data_num: u32,
    /// Number of active lanes
    pub used_lane_num: u32,
    /// Number of big lanes
    pub tail_block_num: u32,
    /// Elements per big lane
    pub big_data_num: u32,
    /// Elements per small lane
    pub small_data_num: u32,
    /// Tile iterations per big lane
    pub final_big_tile_num: u32,
    /// Tile iterations per small lane
    pub final_small_tile_num: u32,
    /// Elements per full tile
    pub tile_data_num: u32,
    /// Final-tile elements of a big lane
    pub big_tail_data_num: u32,
    /// Final-tile elements of a small lane
    pub small_tail_data_num: u32,
    /// Output rank
    pub dim_num: u32,
    /// 1 if any operand broadcasts against the output
    pub need_broadcast: u32,
    /// Stable type code of the value dtype
    pub dtype_code: u32,
    /// Condition extents, reversed, right-aligned
    pub cond_shape: [u16; MAX_DIMS],
    /// x1 extents
    pub x1_shape: [u16; MAX_DIMS],
    /// x2 extents
    pub x2_shape: [u16; MAX_DIMS],
    /// Output extents
    pub y_shape: [u16; MAX_DIMS],
    /// Condition strides in elements
    pub cond_strides: [u32; MAX_DIMS],
    /// x1 strides
    pub x1_strides: [u32; MAX_DIMS],
    /// x2 strides
    pub x2_strides: [u32; MAX_DIMS],
    /// Output strides
    pub y_strides: [u32; MAX_DIMS],
}

impl SelectV2Params {
    /// Pack a tiling plan and broadcast metadata into the wire layout
    pub fn pack(plan: &TilingPlan, spec: &BroadcastSpec, dtype: DType) -> Self {
        Self {
            total_data_num: plan.total_data_num,
            used_lane_num: plan.used_lane_num,
            tail_block_num: plan.tail_block_num,
            big_data_num: plan.big_data_num,
            small_data_num: plan.small_data_num,
            final_big_tile_num: plan.final_big_tile_num,
            final_small_tile_num: plan.final_small_tile_num,
            tile_data_num: plan.tile_data_num,
            big_tail_data_num: plan.big_tail_data_num,
            small_tail_data_num: plan.small_tail_data_num,
            dim_num: spec.dim_num as u32,
            need_broadcast: spec.need_broadcast as u32,
            dtype_code: dtype.code(),
            cond_shape: spec.cond_shape,
            x1_shape: spec.x1_shape,
            x2_shape: spec.x2_shape,
            y_shape: spec.y_shape,
            cond_strides: spec.cond_strides,
            x1_strides: spec.x1_strides,
            x2_strides: spec.x2_strides,
            y_strides: spec.y_strides,
        }
    }

    /// The tiling scalars as a plan the executor can slice lanes from
    pub fn tiling_plan(&self) -> TilingPlan {
        TilingPlan {
            total_data_num: self.total_data_num,
            used_lane_num: self.used_lane_num,
            tail_block_num: self.tail_block_num,
            big_data_num: self.big_data_num,
            small_data_num: self.small_data_num,
            final_big_tile_num: self.final_big_tile_num,
            final_small_tile_num: self.final_small_tile_num,
            tile_data_num: self.tile_data_num,
            big_tail_data_num: self.big_tail_data_num,
            small_tail_data_num: self.small_tail_data_num,
        }
    }

    /// Decode the value dtype carried in the block
    pub fn dtype(&self) -> Result<DType> {
        DType::from_code(self.dtype_code)
    }

    /// The block's raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Read a block back from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bytemuck::try_pod_read_unaligned(bytes).map_err(|e| {
            Error::precondition(format!("malformed parameter block ({e}, {} bytes)", bytes.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformInfo;

    fn sample() -> SelectV2Params {
        let spec = BroadcastSpec::derive(&[2, 3], &[1, 3], &[2, 3], &[2, 3]).unwrap();
        let platform = PlatformInfo::new(8, 16 * 1024);
        let plan =
            TilingPlan::compute(spec.total_elements(), DType::F32, &platform, spec.need_broadcast)
                .unwrap();
        SelectV2Params::pack(&plan, &spec, DType::F32)
    }

    #[test]
    fn test_byte_roundtrip() {
        let params = sample();
        let restored = SelectV2Params::from_bytes(params.as_bytes()).unwrap();
        assert_eq!(params, restored);
    }

    #[test]
    fn test_truncated_block_rejected() {
        let params = sample();
        let bytes = params.as_bytes();
        assert!(SelectV2Params::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_plan_scalars_survive_packing() {
        let params = sample();
        let plan = params.tiling_plan();
        assert_eq!(plan.total_data_num, 6);
        assert_eq!(plan.used_lane_num, 1); // broadcast forces one lane
        assert_eq!(params.dtype().unwrap(), DType::F32);
        assert_eq!(params.need_broadcast, 1);
    }
}
