//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of the select operands
///
/// Connects Rust's type system to the runtime dtype system. Implemented for
/// the operator's value types (`f32`, `half::f16`, `i8`, `i32`) and for `u8`
/// (the storage type of the boolean condition).
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `PartialEq` - Nonzero test for condition values
pub trait Element:
    Copy + Clone + Send + Sync + Pod + Zeroable + 'static + PartialEq
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64, the working domain of the arithmetic blend
    fn to_f64(self) -> f64;

    /// Convert from f64 back to this type
    ///
    /// For integer types this truncates toward zero (non-rounding), matching
    /// the narrowing conversion the blend compute path requires.
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        half::f16::ONE
    }
}

impl Element for i8 {
    const DTYPE: DType = DType::I8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }
}

impl Element for u8 {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_dtype_mapping() {
        assert_eq!(<f32 as Element>::DTYPE, DType::F32);
        assert_eq!(<half::f16 as Element>::DTYPE, DType::F16);
        assert_eq!(<i8 as Element>::DTYPE, DType::I8);
        assert_eq!(<i32 as Element>::DTYPE, DType::I32);
        assert_eq!(<u8 as Element>::DTYPE, DType::Bool);
    }

    #[test]
    fn test_from_f64_truncates() {
        assert_eq!(<i8 as Element>::from_f64(3.9), 3);
        assert_eq!(<i32 as Element>::from_f64(-2.7), -2);
    }
}
