//! Core-parallel tiling of resolved operator shapes.
//!
//! Given a fully static output shape (a `ResolvedShape` from `aicc-ops`) and
//! the target's `HardwareProfile`, the tiler partitions the work across AI
//! cores: how many cores are active, how many elements (or rows) each core
//! processes, the block-aligned per-core share, and whether a tail core takes
//! a smaller residual. The resulting plan is pure data, serialized into the
//! parameter words the kernel-launch convention consumes downstream.
//!
//! Both entry points are single-shot closed-form computations: no state, no
//! I/O, bit-identical output for identical input.

pub mod plan;
pub mod tiler;

pub use plan::{RowTilingPlan, TilingPlan};
pub use tiler::{TilingError, compute_row_tiling, compute_tiling};
