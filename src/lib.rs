//! # selectv2
//!
//! **Tiled elementwise ternary select with NPU-style lane scheduling.**
//!
//! selectv2 computes `y[i] = cond[i] ? x1[i] : x2[i]` over tensors related by
//! standard broadcasting rules, scheduled the way an AI-core vector operator
//! is: a host-side planner splits the work into bounded-size tiles that fit a
//! fast working-memory budget, deals condition blocks out across independent
//! parallel lanes (uneven remainders go to "big" lanes), and hands every lane
//! a fixed-layout parameter block; each lane then pumps its tiles through a
//! double-buffered load/compute/store pipeline, gathering broadcast operands
//! through an odometer index walk.
//!
//! ## Architecture
//!
//! - **Tile Planner** ([`planner`]): shape/stride derivation, broadcast
//!   detection, tile sizing under the memory budget, big/small lane
//!   partition, parameter-block packing. Runs once, host-side, before any
//!   lane starts.
//! - **Lane Executor** ([`executor`]): one instance per lane, no inter-lane
//!   communication; per-tile CopyIn → Compute → CopyOut with two rotating
//!   tile buffers per queue role and a ragged final tile.
//!
//! ## Supported dtypes
//!
//! Values: `f32`, `f16`, `i32`, `i8`. Condition: 1-byte boolean, nonzero =
//! true. Floats select natively; integers go through an arithmetic blend
//! (`y = x1*c + x2*(1-c)`) that is bit-identical to the native path.
//!
//! ## Quick Start
//!
//! ```rust
//! use selectv2::{select_v2, PlatformInfo};
//!
//! let cond = [1u8, 0, 1, 0, 1, 1];
//! let x1 = [1.0f32; 6];
//! let x2 = [-1.0f32; 6];
//! let (y, shape) = select_v2(&cond, &[2, 3], &x1, &[2, 3], &x2, &[2, 3], &PlatformInfo::host())?;
//! assert_eq!(shape, [2, 3]);
//! assert_eq!(y, [1.0, -1.0, 1.0, -1.0, 1.0, 1.0]);
//! # Ok::<(), selectv2::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): lanes run on the rayon thread pool; without it they
//!   run sequentially on the calling thread.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod executor;
mod op;
pub mod planner;
pub mod platform;
pub mod registry;

pub use dtype::{DType, Element};
pub use error::{Error, Result};
pub use op::select_v2;
pub use planner::{plan, SelectV2Params};
pub use platform::PlatformInfo;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::op::select_v2;
    pub use crate::planner::{plan, SelectV2Params};
    pub use crate::platform::PlatformInfo;
}
