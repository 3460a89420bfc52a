//! Tile compute strategies
//!
//! `y[i] = cond[i] ? x1[i] : x2[i]` over one tile, nonzero condition = true.
//! Two strategies exist, chosen per dtype for the whole invocation and never
//! mixed within a tile:
//!
//! - **NativeSelect**: direct predicate select, the path used where the
//!   hardware offers a vector select over boolean masks (floats).
//! - **ArithmeticBlend**: emulation for types without a native select
//!   (integers): cast the condition into the working numeric domain, form its
//!   complement, and blend `y = x1*c + x2*(1-c)`, narrowing back with a
//!   truncating conversion.
//!
//! Both strategies produce identical results for every boolean condition
//! value, since `c` is exactly 0 or 1 and every supported dtype round-trips
//! through the working domain losslessly.

use crate::dtype::{DType, Element};

/// Which compute path a dtype takes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SelectStrategy {
    /// Direct predicate select
    NativeSelect,
    /// Arithmetic blend emulation
    ArithmeticBlend,
}

/// Fixed strategy assignment per value dtype
pub(crate) fn strategy_for(dtype: DType) -> SelectStrategy {
    match dtype {
        DType::I8 | DType::I32 => SelectStrategy::ArithmeticBlend,
        _ => SelectStrategy::NativeSelect,
    }
}

/// Temporary buffers for the blend path, sized once per lane to the full
/// tile element count and reused across iterations.
pub(crate) struct BlendScratch {
    cond_cast: Vec<f64>,
    complement: Vec<f64>,
}

impl BlendScratch {
    pub fn new(tile_len: usize) -> Self {
        Self {
            cond_cast: vec![0.0; tile_len],
            complement: vec![0.0; tile_len],
        }
    }
}

/// Compute one tile's select into `y`.
///
/// All slices must have the same length (the tile's process count).
pub(crate) fn select_tile<T: Element>(
    strategy: SelectStrategy,
    cond: &[u8],
    x1: &[T],
    x2: &[T],
    y: &mut [T],
    scratch: &mut BlendScratch,
) {
    match strategy {
        SelectStrategy::NativeSelect => {
            for i in 0..y.len() {
                y[i] = if cond[i] != 0 { x1[i] } else { x2[i] };
            }
        }
        SelectStrategy::ArithmeticBlend => {
            let n = y.len();
            let c = &mut scratch.cond_cast[..n];
            let nc = &mut scratch.complement[..n];
            for i in 0..n {
                c[i] = if cond[i] != 0 { 1.0 } else { 0.0 };
            }
            for i in 0..n {
                nc[i] = 1.0 - c[i];
            }
            for i in 0..n {
                y[i] = T::from_f64(x1[i].to_f64() * c[i] + x2[i].to_f64() * nc[i]);
            }
        }
    }
}
