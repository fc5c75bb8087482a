//! Core types for the aicc operator-compilation stack.
//!
//! `aicc-core` provides the foundational types shared by every compile stage:
//! tensor shapes with dynamic-extent sentinels (`Shape`), element data types
//! (`DType`), and the immutable hardware capacity constants the tiler
//! consumes (`HardwareProfile`).
//!
//! Everything here is plain data. Shape resolution lives in `aicc-ops` and
//! tiling arithmetic in `aicc-tiling`.

pub mod profile;
pub mod types;

pub use profile::HardwareProfile;
pub use types::{DType, Shape, UNKNOWN_DIM, UNKNOWN_RANK};
