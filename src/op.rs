//! Host-side operator entry
//!
//! Validates operands against the registry metadata, computes the broadcast
//! output shape, plans the tiling, and launches the lanes. This is the whole
//! invocation lifecycle: the plan lives only for the duration of one call.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::executor;
use crate::planner::{self, broadcast_shape};
use crate::platform::PlatformInfo;
use crate::registry::SELECT_V2;

/// Elementwise ternary select with broadcasting.
///
/// `y[i] = cond[i] ? x1[i] : x2[i]`, where the three inputs broadcast
/// together under standard right-aligned rules. The condition is a 1-byte
/// boolean buffer (nonzero = true). Returns the output elements and the
/// broadcast output shape.
///
/// # Example
///
/// ```
/// use selectv2::{select_v2, PlatformInfo};
///
/// let cond = [1u8, 0, 1, 0];
/// let x1 = [10.0f32, 20.0, 30.0, 40.0];
/// let x2 = [1.0f32, 2.0, 3.0, 4.0];
/// let (y, shape) = select_v2(&cond, &[4], &x1, &[4], &x2, &[4], &PlatformInfo::host()).unwrap();
/// assert_eq!(shape, [4]);
/// assert_eq!(y, [10.0, 2.0, 30.0, 4.0]);
/// ```
pub fn select_v2<T: Element>(
    cond: &[u8],
    cond_shape: &[usize],
    x1: &[T],
    x1_shape: &[usize],
    x2: &[T],
    x2_shape: &[usize],
    platform: &PlatformInfo,
) -> Result<(Vec<T>, Vec<usize>)> {
    if !SELECT_V2.inputs[1].accepted.contains(T::DTYPE) {
        return Err(Error::unsupported_dtype(T::DTYPE, SELECT_V2.name));
    }
    check_numel("condition", cond.len(), cond_shape)?;
    check_numel("x1", x1.len(), x1_shape)?;
    check_numel("x2", x2.len(), x2_shape)?;

    let xy_shape =
        broadcast_shape(x1_shape, x2_shape).ok_or_else(|| Error::broadcast(x1_shape, x2_shape))?;
    let y_shape = broadcast_shape(cond_shape, &xy_shape)
        .ok_or_else(|| Error::broadcast(cond_shape, &xy_shape))?;

    let params = planner::plan(cond_shape, x1_shape, x2_shape, &y_shape, T::DTYPE, platform)?;

    let mut y = vec![T::zero(); params.total_data_num as usize];
    executor::launch(
        &params,
        cond,
        bytemuck::cast_slice(x1),
        bytemuck::cast_slice(x2),
        bytemuck::cast_slice_mut(&mut y),
    )?;
    Ok((y, y_shape))
}

fn check_numel(arg: &'static str, len: usize, shape: &[usize]) -> Result<()> {
    let numel: usize = shape.iter().product();
    if len != numel {
        return Err(Error::invalid_argument(
            arg,
            format!("buffer holds {len} elements but shape {shape:?} has {numel}"),
        ));
    }
    Ok(())
}
