//! Shape alignment and stride derivation
//!
//! Shapes are right-aligned against the output and stored **reversed**: index
//! 0 is the fastest-varying (rightmost) dimension. A missing leading dimension
//! is treated as extent 1. For every dimension an operand's extent must equal
//! the output's extent or be 1 (a broadcast dimension).
//!
//! Strides are element counts. A stride is recorded as 0 for every extent-1
//! dimension; otherwise it is the running product of the operand's prior
//! non-unit extents, accumulated fastest-to-slowest in a single pass. A zero
//! stride is exactly what makes a broadcast dimension contribute nothing
//! during index translation.

use crate::error::{Error, Result};

/// Maximum supported rank (compact variant)
pub const MAX_DIMS: usize = 8;

/// Largest extent the compact parameter block can carry per dimension
pub const MAX_EXTENT: usize = u16::MAX as usize;

/// Compute the broadcast shape of two shapes, or None if incompatible.
///
/// Standard right-aligned rules: dimensions are matched from the right, and
/// each pair must be equal or contain a 1.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0usize; ndim];
    for i in 0..ndim {
        let ad = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let bd = if i < b.len() { b[b.len() - 1 - i] } else { 1 };
        out[ndim - 1 - i] = if ad == bd || bd == 1 {
            ad
        } else if ad == 1 {
            bd
        } else {
            return None;
        };
    }
    Some(out)
}

/// Right-aligned reversed shapes and strides for one invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastSpec {
    /// Number of meaningful dimensions (the output's rank)
    pub dim_num: usize,
    /// Output extents, reversed (index 0 = fastest-varying)
    pub y_shape: [u16; MAX_DIMS],
    /// Condition extents, reversed and right-aligned
    pub cond_shape: [u16; MAX_DIMS],
    /// x1 extents, reversed and right-aligned
    pub x1_shape: [u16; MAX_DIMS],
    /// x2 extents, reversed and right-aligned
    pub x2_shape: [u16; MAX_DIMS],
    /// Output strides in elements (0 on extent-1 dims)
    pub y_strides: [u32; MAX_DIMS],
    /// Condition strides in elements
    pub cond_strides: [u32; MAX_DIMS],
    /// x1 strides in elements
    pub x1_strides: [u32; MAX_DIMS],
    /// x2 strides in elements
    pub x2_strides: [u32; MAX_DIMS],
    /// True iff any operand has a dimension narrower than the output's
    pub need_broadcast: bool,
}

impl BroadcastSpec {
    /// Derive aligned shapes, strides, and the broadcast flag.
    ///
    /// `y_shape` must already be the broadcast of the three operand shapes;
    /// an operand extent that is neither 1 nor the output extent is rejected.
    pub fn derive(
        cond_shape: &[usize],
        x1_shape: &[usize],
        x2_shape: &[usize],
        y_shape: &[usize],
    ) -> Result<Self> {
        for shape in [cond_shape, x1_shape, x2_shape, y_shape] {
            if shape.len() > MAX_DIMS {
                return Err(Error::ShapeRankExceeded {
                    rank: shape.len(),
                    max: MAX_DIMS,
                });
            }
        }

        let dim_num = y_shape.len();
        let y = align_reversed(y_shape, dim_num)?;
        let cond = align_reversed(cond_shape, dim_num)?;
        let x1 = align_reversed(x1_shape, dim_num)?;
        let x2 = align_reversed(x2_shape, dim_num)?;

        // Every operand extent must be the output extent or 1.
        for d in 0..dim_num {
            for (operand, original) in [(&cond, cond_shape), (&x1, x1_shape), (&x2, x2_shape)] {
                if operand[d] != y[d] && operand[d] != 1 {
                    return Err(Error::broadcast(original, y_shape));
                }
            }
        }

        let need_broadcast =
            (0..dim_num).any(|d| cond[d] != y[d] || x1[d] != y[d] || x2[d] != y[d]);

        Ok(Self {
            dim_num,
            y_strides: derive_strides(&y, dim_num),
            cond_strides: derive_strides(&cond, dim_num),
            x1_strides: derive_strides(&x1, dim_num),
            x2_strides: derive_strides(&x2, dim_num),
            y_shape: y,
            cond_shape: cond,
            x1_shape: x1,
            x2_shape: x2,
            need_broadcast,
        })
    }

    /// Total number of output elements
    pub fn total_elements(&self) -> u64 {
        self.y_shape[..self.dim_num]
            .iter()
            .map(|&e| e as u64)
            .product()
    }

}

/// Right-align `shape` against a rank-`dim_num` output and reverse it so that
/// index 0 is the fastest-varying dimension. Missing leading dims become 1.
fn align_reversed(shape: &[usize], dim_num: usize) -> Result<[u16; MAX_DIMS]> {
    let mut out = [0u16; MAX_DIMS];
    for d in 0..dim_num {
        let extent = if d < shape.len() {
            shape[shape.len() - 1 - d]
        } else {
            1
        };
        if extent > MAX_EXTENT {
            return Err(Error::ExtentOverflow { dim: d, extent });
        }
        out[d] = extent as u16;
    }
    Ok(out)
}

/// Single-pass stride derivation over a reversed shape.
fn derive_strides(shape: &[u16; MAX_DIMS], dim_num: usize) -> [u32; MAX_DIMS] {
    let mut strides = [0u32; MAX_DIMS];
    let mut running: u32 = 1;
    for d in 0..dim_num {
        if shape[d] != 1 {
            strides[d] = running;
            running *= shape[d] as u32;
        }
    }
    strides
}
