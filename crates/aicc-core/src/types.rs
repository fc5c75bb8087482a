//! Core type definitions: DType, Shape, dynamic-extent sentinels.

use serde::{Deserialize, Serialize};

/// Extent value marking a dimension whose size is unknown at compile time.
pub const UNKNOWN_DIM: i64 = -1;

/// Extent value marking a shape whose rank itself is unknown.
///
/// A shape of unknown rank is written as the single extent `[UNKNOWN_RANK]`.
pub const UNKNOWN_RANK: i64 = -2;

/// Supported element data types for operator compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    F32,
    F16,
    BF16,
    I32,
    I64,
    U8,
}

impl DType {
    /// Size in bytes of a single element.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F16 | DType::BF16 => 2,
            DType::I32 => 4,
            DType::I64 => 8,
            DType::U8 => 1,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F16 => write!(f, "f16"),
            DType::BF16 => write!(f, "bf16"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::U8 => write!(f, "u8"),
        }
    }
}

/// Tensor shape: ordered dimension extents, most-significant axis first.
///
/// Non-negative extents are static sizes. [`UNKNOWN_DIM`] marks a dynamic
/// extent and `[UNKNOWN_RANK]` an unknown-rank shape; both come from the IR
/// operator descriptors of dynamic-shape graphs and are rejected before any
/// tiling arithmetic runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape(pub Vec<i64>);

impl Shape {
    pub fn new(dims: impl Into<Vec<i64>>) -> Self {
        Self(dims.into())
    }

    /// Scalar (rank-0) shape.
    pub fn scalar() -> Self {
        Self(vec![])
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements. Meaningful only for static shapes.
    pub fn numel(&self) -> i64 {
        self.0.iter().product()
    }

    /// Get dimension at axis (supports negative indexing).
    pub fn dim(&self, axis: i32) -> Option<i64> {
        let ndim = self.0.len() as i32;
        let idx = if axis < 0 { ndim + axis } else { axis };
        if idx >= 0 && idx < ndim {
            Some(self.0[idx as usize])
        } else {
            None
        }
    }

    /// Whether every extent is known at compile time.
    pub fn is_static(&self) -> bool {
        self.0.iter().all(|&d| d >= 0)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
