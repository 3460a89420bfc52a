//! Device-side execution
//!
//! `launch` is the kernel entry: it validates the parameter block against the
//! bulk buffers, dispatches on the value dtype, and runs one [`lane::LaneExecutor`]
//! per active lane. Lanes share nothing mutable — each owns a disjoint slice
//! of the output — so they run in parallel without synchronization (rayon
//! scope with the `rayon` feature, a serial loop without).

mod compute;
mod index;
mod lane;
mod pipeline;

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::planner::{SelectV2Params, MAX_DIMS};

use lane::LaneExecutor;

/// Number of elements in a reversed aligned shape
fn shape_numel(shape: &[u16; MAX_DIMS], dim_num: usize) -> usize {
    shape[..dim_num].iter().map(|&e| e as usize).product()
}

/// Execute one planned select invocation over raw byte buffers.
///
/// Buffer lengths must match the shapes in the parameter block exactly
/// (element count times element width); anything else is a precondition
/// violation, not a recoverable error, because the planner's contract
/// guarantees consistency by construction.
pub fn launch(
    params: &SelectV2Params,
    cond: &[u8],
    x1: &[u8],
    x2: &[u8],
    y: &mut [u8],
) -> Result<()> {
    let dtype = params.dtype()?;
    if params.used_lane_num == 0 {
        return Err(Error::precondition("zero active lanes in tiling plan"));
    }
    if params.tile_data_num == 0 {
        return Err(Error::precondition("zero tile size in tiling plan"));
    }

    let dim_num = params.dim_num as usize;
    let value_bytes = dtype.size_in_bytes();
    let expect = [
        ("condition", cond.len(), shape_numel(&params.cond_shape, dim_num)),
        ("x1", x1.len(), shape_numel(&params.x1_shape, dim_num) * value_bytes),
        ("x2", x2.len(), shape_numel(&params.x2_shape, dim_num) * value_bytes),
        ("y", y.len(), params.total_data_num as usize * value_bytes),
    ];
    for (name, got, want) in expect {
        if got != want {
            return Err(Error::precondition(format!(
                "{name} buffer holds {got} bytes, tiling plan expects {want}"
            )));
        }
    }

    match dtype {
        DType::F32 => run_lanes::<f32>(params, cond, x1, x2, y),
        DType::F16 => run_lanes::<half::f16>(params, cond, x1, x2, y),
        DType::I8 => run_lanes::<i8>(params, cond, x1, x2, y),
        DType::I32 => run_lanes::<i32>(params, cond, x1, x2, y),
        DType::Bool => Err(Error::unsupported_dtype(dtype, "select_v2")),
    }
}

/// Typed lane fan-out: split the output into disjoint per-lane slices and
/// run every lane to completion.
fn run_lanes<T: Element>(
    params: &SelectV2Params,
    cond: &[u8],
    x1: &[u8],
    x2: &[u8],
    y: &mut [u8],
) -> Result<()> {
    let x1: &[T] = bytemuck::try_cast_slice(x1)
        .map_err(|_| Error::precondition("x1 buffer misaligned for its dtype"))?;
    let x2: &[T] = bytemuck::try_cast_slice(x2)
        .map_err(|_| Error::precondition("x2 buffer misaligned for its dtype"))?;
    let y: &mut [T] = bytemuck::try_cast_slice_mut(y)
        .map_err(|_| Error::precondition("y buffer misaligned for its dtype"))?;

    let plan = params.tiling_plan();
    let mut lanes = Vec::with_capacity(plan.used_lane_num as usize);
    let mut rest = y;
    for lane in 0..plan.used_lane_num {
        let slice = plan.lane_slice(lane);
        let (own, tail) = rest.split_at_mut(slice.data_num as usize);
        lanes.push((slice, own));
        rest = tail;
    }

    #[cfg(feature = "rayon")]
    rayon::scope(|s| {
        for (slice, y_slice) in lanes {
            s.spawn(move |_| {
                let mut lane = LaneExecutor::init(params, slice, cond, x1, x2, y_slice);
                lane.process();
                debug_assert!(lane.is_done());
            });
        }
    });

    #[cfg(not(feature = "rayon"))]
    for (slice, y_slice) in lanes {
        let mut lane = LaneExecutor::init(params, slice, cond, x1, x2, y_slice);
        lane.process();
        debug_assert!(lane.is_done());
    }

    Ok(())
}
