//! Data type system for the select operator
//!
//! Provides the `DType` enum for the element types the operator accepts,
//! along with a `DTypeSet` bitset used by the registry for membership tests.

mod element;

pub use element::Element;

use std::fmt;

use crate::error::{Error, Result};

/// Element types supported by the select operator
///
/// The discriminant values are **stable**: they are the type codes carried in
/// the serialized parameter block, so existing values are never changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 32-bit floating point
    F32 = 0,
    /// 16-bit floating point (IEEE 754)
    F16 = 1,
    /// 8-bit signed integer
    I8 = 2,
    /// 32-bit signed integer
    I32 = 3,
    /// Boolean, stored as one byte (nonzero = true)
    Bool = 4,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F32 | Self::I32 => 4,
            Self::F16 => 2,
            Self::I8 | Self::Bool => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F16)
    }

    /// Returns true if this is an integer type
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self, Self::I8 | Self::I32)
    }

    /// Stable type code used in the parameter block
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Decode a parameter-block type code
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::F32),
            1 => Ok(Self::F16),
            2 => Ok(Self::I8),
            3 => Ok(Self::I32),
            4 => Ok(Self::Bool),
            _ => Err(Error::precondition(format!(
                "unknown dtype code {code} in parameter block"
            ))),
        }
    }

    /// Short name for display (e.g., "f32", "i8")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::I8 => "i8",
            Self::I32 => "i32",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DTypeSet {
    bits: u32,
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// The value dtypes the operator accepts for x1/x2/y
    pub const VALUES: Self = Self {
        bits: (1 << DType::F32 as u8)
            | (1 << DType::F16 as u8)
            | (1 << DType::I8 as u8)
            | (1 << DType::I32 as u8),
    };

    /// The condition dtype (always boolean)
    pub const CONDITION: Self = Self::single(DType::Bool);

    /// Create a set containing a single dtype
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self {
            bits: 1 << dtype as u8,
        }
    }

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}
