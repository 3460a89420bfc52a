//! Broadcast index translation
//!
//! A broadcast operand's tile cannot be bulk-copied: each logical output
//! position maps to a physical source offset through the operand's strides.
//! The translation decomposes the flat logical index into per-dimension
//! coordinates using the output's strides, then re-projects the coordinates
//! through the operand's own strides; broadcast dimensions have stride 0 and
//! contribute nothing.
//!
//! [`translate_index`] recomputes the full decomposition (O(D) per element)
//! and serves as the reference. [`IndexOdometer`] advances one position at a
//! time with digit carries, amortized O(1) per step.

use crate::planner::MAX_DIMS;

/// Translate a flat logical output index to a physical operand offset.
///
/// Extent-1 output dimensions carry stride 0 and are skipped; their
/// coordinate is always 0.
pub(crate) fn translate_index(
    flat: u32,
    dim_num: usize,
    y_strides: &[u32; MAX_DIMS],
    shape: &[u16; MAX_DIMS],
    strides: &[u32; MAX_DIMS],
) -> u32 {
    let mut dst = 0u32;
    for d in 0..dim_num {
        if y_strides[d] == 0 {
            continue;
        }
        dst += flat / y_strides[d] % shape[d] as u32 * strides[d];
    }
    dst
}

/// Incremental odometer over the output index space, tracking one operand's
/// physical offset.
///
/// Coordinates advance over the *output* extents; the operand offset moves by
/// the operand's stride in the incremented dimension. Broadcast dimensions
/// participate in the carry chain (their coordinate still wraps) but their
/// zero stride leaves the offset untouched.
pub(crate) struct IndexOdometer {
    dim_num: usize,
    coords: [u32; MAX_DIMS],
    offset: u32,
    y_shape: [u16; MAX_DIMS],
    strides: [u32; MAX_DIMS],
}

impl IndexOdometer {
    /// Position the cursor at flat logical index `flat`.
    pub fn new(
        flat: u32,
        dim_num: usize,
        y_shape: &[u16; MAX_DIMS],
        y_strides: &[u32; MAX_DIMS],
        shape: &[u16; MAX_DIMS],
        strides: &[u32; MAX_DIMS],
    ) -> Self {
        let mut coords = [0u32; MAX_DIMS];
        for d in 0..dim_num {
            if y_strides[d] != 0 {
                coords[d] = flat / y_strides[d] % y_shape[d] as u32;
            }
        }
        Self {
            dim_num,
            coords,
            offset: translate_index(flat, dim_num, y_strides, shape, strides),
            y_shape: *y_shape,
            strides: *strides,
        }
    }

    /// Physical operand offset of the current position
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Advance one logical position, propagating carries.
    #[inline]
    pub fn step(&mut self) {
        for d in 0..self.dim_num {
            self.coords[d] += 1;
            self.offset += self.strides[d];
            if self.coords[d] < self.y_shape[d] as u32 {
                return;
            }
            self.coords[d] = 0;
            self.offset -= self.strides[d] * self.y_shape[d] as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::BroadcastSpec;

    #[test]
    fn test_translate_matches_modulo() {
        // y [2,3], operand [1,3]: broadcast on the slow dim, offset is k % 3.
        let spec = BroadcastSpec::derive(&[2, 3], &[1, 3], &[2, 3], &[2, 3]).unwrap();
        for k in 0..6u32 {
            let off = translate_index(
                k,
                spec.dim_num,
                &spec.y_strides,
                &spec.x1_shape,
                &spec.x1_strides,
            );
            assert_eq!(off, k % 3);
        }
    }

    #[test]
    fn test_translate_scalar_operand() {
        let spec = BroadcastSpec::derive(&[1], &[4], &[4], &[4]).unwrap();
        for k in 0..4u32 {
            let off = translate_index(
                k,
                spec.dim_num,
                &spec.y_strides,
                &spec.cond_shape,
                &spec.cond_strides,
            );
            assert_eq!(off, 0);
        }
    }

    #[test]
    fn test_odometer_matches_direct_translation() {
        let cases: &[(&[usize], &[usize])] = &[
            (&[2, 3], &[1, 3]),
            (&[2, 3], &[2, 1]),
            (&[2, 3, 4], &[3, 1]),
            (&[2, 1, 4], &[1, 1, 4]),
            (&[5, 4, 3, 2], &[4, 1, 2]),
            (&[6], &[1]),
        ];
        for &(y, op) in cases {
            let spec = BroadcastSpec::derive(op, y, y, y).unwrap();
            let total = spec.total_elements() as u32;
            let mut cursor = IndexOdometer::new(
                0,
                spec.dim_num,
                &spec.y_shape,
                &spec.y_strides,
                &spec.cond_shape,
                &spec.cond_strides,
            );
            for k in 0..total {
                let direct = translate_index(
                    k,
                    spec.dim_num,
                    &spec.y_strides,
                    &spec.cond_shape,
                    &spec.cond_strides,
                );
                assert_eq!(cursor.offset(), direct, "y={y:?} op={op:?} k={k}");
                cursor.step();
            }
        }
    }

    #[test]
    fn test_odometer_mid_tensor_start() {
        let spec = BroadcastSpec::derive(&[3, 1], &[3, 5], &[3, 5], &[3, 5]).unwrap();
        for start in [0u32, 4, 7, 14] {
            let mut cursor = IndexOdometer::new(
                start,
                spec.dim_num,
                &spec.y_shape,
                &spec.y_strides,
                &spec.cond_shape,
                &spec.cond_strides,
            );
            for k in start..15 {
                let direct = translate_index(
                    k,
                    spec.dim_num,
                    &spec.y_strides,
                    &spec.cond_shape,
                    &spec.cond_strides,
                );
                assert_eq!(cursor.offset(), direct);
                cursor.step();
            }
        }
    }
}
