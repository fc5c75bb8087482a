//! Hardware capacity constants consumed by the tiler.
//!
//! A `HardwareProfile` is constructed once from platform configuration and
//! read-only afterward. Any number of concurrent operator compiles may share
//! the same profile; it is `Copy` and holds no interior state.

use serde::{Deserialize, Serialize};

use crate::types::DType;

/// Compile-time constants of the target accelerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Number of parallel execution units (AI cores).
    pub core_count: usize,
    /// Minimum contiguous transfer/alignment granularity of the vector unit.
    pub block_size_bytes: usize,
    /// Scratch capacity per core.
    pub buffer_size_bytes: usize,
    /// Size of the operator's element data type.
    pub element_size_bytes: usize,
}

impl HardwareProfile {
    pub fn new(
        core_count: usize,
        block_size_bytes: usize,
        buffer_size_bytes: usize,
        element_size_bytes: usize,
    ) -> Self {
        Self {
            core_count,
            block_size_bytes,
            buffer_size_bytes,
            element_size_bytes,
        }
    }

    /// Profile with the element size taken from a data type.
    pub fn for_dtype(
        core_count: usize,
        block_size_bytes: usize,
        buffer_size_bytes: usize,
        dtype: DType,
    ) -> Self {
        Self::new(core_count, block_size_bytes, buffer_size_bytes, dtype.size_bytes())
    }

    /// Copy of this profile with the element size swapped for another dtype.
    ///
    /// Platform constants are per-device; the element size is per-operator.
    /// The compile pipeline derives an operator's working profile this way.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.element_size_bytes = dtype.size_bytes();
        self
    }

    /// Number of elements that fit one aligned transfer block.
    pub fn block_elements(&self) -> usize {
        self.block_size_bytes / self.element_size_bytes
    }

    /// Reject degenerate profiles before any tiling arithmetic.
    ///
    /// The element size must divide the block size: a block that holds a
    /// fractional element count has no aligned element boundary.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.core_count == 0 {
            return Err("core_count is zero");
        }
        if self.block_size_bytes == 0 {
            return Err("block_size_bytes is zero");
        }
        if self.buffer_size_bytes == 0 {
            return Err("buffer_size_bytes is zero");
        }
        if self.element_size_bytes == 0 {
            return Err("element_size_bytes is zero");
        }
        if self.block_size_bytes % self.element_size_bytes != 0 {
            return Err("element size does not divide block size");
        }
        Ok(())
    }

    /// Look up a named platform preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            // Full-size training part: 32 cores, 32-byte vector blocks,
            // 248 KiB of usable scratch per core.
            "npu32" => Some(Self::for_dtype(32, 32, 248 * 1024, DType::F32)),
            // Edge inference part.
            "npu8" => Some(Self::for_dtype(8, 32, 192 * 1024, DType::F32)),
            // Tiny simulator target used by the smoke tooling.
            "sim" => Some(Self::for_dtype(2, 32, 4 * 1024, DType::F32)),
            _ => None,
        }
    }

    /// Determine the platform profile via env var → default.
    ///
    /// Priority:
    /// 1. `AICC_PROFILE` env var naming a preset (case-insensitive)
    /// 2. the default edge profile
    pub fn resolve() -> Self {
        if let Ok(val) = std::env::var("AICC_PROFILE")
            && let Some(profile) = Self::preset(&val)
        {
            return profile;
        }
        Self::default()
    }
}

impl Default for HardwareProfile {
    fn default() -> Self {
        // Matches the "npu8" preset.
        Self::for_dtype(8, 32, 192 * 1024, DType::F32)
    }
}
