//! Partition of resolved shapes across AI cores.
//!
//! Element-granular tiling (`compute_tiling`) flattens the shape to a total
//! element count and splits it evenly, aligning each core's share to the
//! vector unit's block size — unaligned transfers either fault or crawl on
//! the target hardware. Row-granular tiling (`compute_row_tiling`) keeps
//! rows contiguous and distributes whole rows instead.
//!
//! A workload whose aligned per-core share exceeds the scratch buffer is
//! reported as an error; multi-pass looping is the downstream strategy's
//! call, not this layer's.

use aicc_core::HardwareProfile;
use aicc_ops::ResolvedShape;
use tracing::debug;

use crate::plan::{RowTilingPlan, TilingPlan};

/// Error returned when a shape cannot be tiled on a hardware profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TilingError {
    /// A zero-element tensor reached the tiler. Callers special-case empty
    /// tensors before asking for a tiling.
    #[error("cannot tile an empty shape")]
    EmptyShape,

    /// The aligned per-core workload does not fit scratch memory in one pass.
    #[error("per-core workload of {required_bytes} B exceeds the {buffer_bytes} B scratch buffer")]
    BufferOverflow {
        required_bytes: u64,
        buffer_bytes: u64,
    },

    /// Degenerate hardware constants (zero counts, element size not dividing
    /// the block size).
    #[error("invalid hardware profile: {0}")]
    InvalidProfile(&'static str),

    /// Row tiling asked of a rank-0 shape.
    #[error("row tiling requires at least one axis")]
    ScalarRows,
}

/// Round `value` up to the next multiple of `step`.
fn round_up(value: u64, step: u64) -> u64 {
    value.div_ceil(step) * step
}

/// Partition a shape's total element count across cores.
///
/// For identical `(shape, hw)` inputs the result is bit-identical; every
/// step is closed-form arithmetic.
pub fn compute_tiling(
    shape: &ResolvedShape,
    hw: &HardwareProfile,
) -> Result<TilingPlan, TilingError> {
    hw.validate().map_err(TilingError::InvalidProfile)?;

    let total = shape.numel() as u64;
    if total == 0 {
        return Err(TilingError::EmptyShape);
    }

    let cores = hw.core_count as u64;
    let block_elements = hw.block_elements() as u64;

    let per_core_elements = total.div_ceil(cores);
    let aligned = round_up(per_core_elements, block_elements);

    // The aligned share may over-provision; fewer cores may cover the total.
    let active_core_count = total.div_ceil(aligned).min(cores) as usize;

    let tail_elements = total - aligned * (active_core_count as u64 - 1);
    let has_tail_core = tail_elements != aligned;

    let required_bytes = aligned * hw.element_size_bytes as u64;
    if required_bytes > hw.buffer_size_bytes as u64 {
        return Err(TilingError::BufferOverflow {
            required_bytes,
            buffer_bytes: hw.buffer_size_bytes as u64,
        });
    }

    debug!(
        total,
        active_core_count, aligned, tail_elements, "elementwise tiling"
    );

    Ok(TilingPlan {
        active_core_count,
        per_core_elements,
        aligned_per_core_elements: aligned,
        tail_elements,
        has_tail_core,
        total_elements: total,
        block_elements,
    })
}

/// Partition a shape's outer rows across cores, keeping rows contiguous.
///
/// The row payload (all axes past the first, flattened) is block-aligned in
/// scratch memory and must fit the buffer one row at a time.
pub fn compute_row_tiling(
    shape: &ResolvedShape,
    hw: &HardwareProfile,
) -> Result<RowTilingPlan, TilingError> {
    hw.validate().map_err(TilingError::InvalidProfile)?;

    if shape.ndim() == 0 {
        return Err(TilingError::ScalarRows);
    }

    let total = shape.numel() as u64;
    if total == 0 {
        return Err(TilingError::EmptyShape);
    }

    let total_rows = shape.shape().0[0] as u64;
    let row_elements = total / total_rows;

    let cores = hw.core_count as u64;
    let block_elements = hw.block_elements() as u64;

    let rows_per_core = total_rows.div_ceil(cores);
    let active_core_count = total_rows.div_ceil(rows_per_core).min(cores) as usize;

    let tail_rows = total_rows - rows_per_core * (active_core_count as u64 - 1);
    let has_tail_core = tail_rows != rows_per_core;

    let aligned_row_elements = round_up(row_elements, block_elements);
    let required_bytes = aligned_row_elements * hw.element_size_bytes as u64;
    if required_bytes > hw.buffer_size_bytes as u64 {
        return Err(TilingError::BufferOverflow {
            required_bytes,
            buffer_bytes: hw.buffer_size_bytes as u64,
        });
    }

    debug!(
        total_rows,
        active_core_count, rows_per_core, tail_rows, "row tiling"
    );

    Ok(RowTilingPlan {
        active_core_count,
        rows_per_core,
        tail_rows,
        has_tail_core,
        total_rows,
        row_elements,
        aligned_row_elements,
    })
}
