//! Broadcast-shape resolution for operator compilation.
//!
//! Given the input shapes of an elementwise operator, [`resolve`] computes
//! the broadcast-compatible output shape following NumPy-style right-aligned
//! rules, or reports the exact axis at which the shapes are incompatible.
//! The successful result is a [`ResolvedShape`] — a fully static shape that
//! is the only legal input to the tiler in `aicc-tiling`.

pub mod broadcast;

pub use broadcast::{ResolvedShape, ShapeError, resolve, resolve_many};
