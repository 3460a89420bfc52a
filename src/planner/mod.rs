//! Host-side tile planner
//!
//! Runs once per invocation, before any lane starts: derives aligned shapes
//! and strides, detects broadcasting, sizes tiles against the working-memory
//! budget, partitions condition blocks across lanes, and packs everything
//! into the fixed-layout parameter block the lanes consume.

pub mod params;
pub mod shape;
pub mod tiling;

pub use params::SelectV2Params;
pub use shape::{broadcast_shape, BroadcastSpec, MAX_DIMS};
pub use tiling::{LaneSlice, TilingPlan, BLOCK_SIZE, BUFFER_NUM};

use crate::dtype::DType;
use crate::error::Result;
use crate::platform::PlatformInfo;

/// Plan one select invocation.
///
/// `y_shape` must be the broadcast of the three operand shapes (the host API
/// computes it with [`broadcast_shape`]). The returned block is a pure
/// function of the arguments: identical inputs produce bit-identical bytes.
pub fn plan(
    cond_shape: &[usize],
    x1_shape: &[usize],
    x2_shape: &[usize],
    y_shape: &[usize],
    dtype: DType,
    platform: &PlatformInfo,
) -> Result<SelectV2Params> {
    let spec = BroadcastSpec::derive(cond_shape, x1_shape, x2_shape, y_shape)?;
    let plan = TilingPlan::compute(spec.total_elements(), dtype, platform, spec.need_broadcast)?;
    Ok(SelectV2Params::pack(&plan, &spec, dtype))
}
