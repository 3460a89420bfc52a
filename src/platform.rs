//! Platform capability queries
//!
//! The planner consumes two read-only scalars from the target platform: how
//! many parallel lanes it offers and how many bytes of fast working memory
//! each lane's pipeline stage-set may occupy. Both are fetched once per
//! invocation and never mutated.

/// Working-memory budget of the reference target, in bytes.
///
/// Matches the 192 KiB unified buffer of the hardware the operator was
/// originally scheduled for.
pub const DEFAULT_WORKING_MEMORY_BYTES: u32 = 192 * 1024;

/// Platform capabilities consumed by the tile planner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Number of independent parallel compute lanes
    pub lane_count: u32,
    /// Fast working-memory byte budget per lane
    pub working_memory_bytes: u32,
}

impl PlatformInfo {
    /// Create a platform description from explicit capabilities
    pub fn new(lane_count: u32, working_memory_bytes: u32) -> Self {
        Self {
            lane_count,
            working_memory_bytes,
        }
    }

    /// Platform description for the host machine
    ///
    /// Lane count comes from the available hardware parallelism; the working
    /// memory budget uses the reference default.
    pub fn host() -> Self {
        let lanes = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1);
        Self::new(lanes, DEFAULT_WORKING_MEMORY_BYTES)
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::host()
    }
}
