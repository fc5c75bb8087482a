//! Broadcasting rules following NumPy-style right-aligned semantics.
//!
//! Rules:
//! 1. Align shapes from the trailing dimension.
//! 2. For each dimension pair: must be equal, or one must be 1.
//! 3. The output dimension is the max of the two.
//!
//! Shapes with dynamic extents are rejected up front — broadcast resolution
//! runs at operator-compile time and its output feeds tiling arithmetic that
//! must never see an unknown extent.

use aicc_core::Shape;

/// Error returned when shapes cannot be resolved for compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A dynamic extent reached a stage that requires fully static shapes.
    #[error("dynamic shape {0} not supported at compile time")]
    DynamicNotSupported(Shape),

    /// Broadcast rule violated at a specific axis, counted from the trailing
    /// end of the alignment.
    #[error("cannot broadcast: trailing axis {axis} has {lhs} vs {rhs}")]
    IncompatibleAxis { axis: usize, lhs: i64, rhs: i64 },
}

/// A fully static shape produced by broadcast resolution.
///
/// The tiler accepts only `ResolvedShape`, so dynamic extents are rejected
/// by construction before any tiling arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedShape(Shape);

impl ResolvedShape {
    /// Checked entry for shapes that need no broadcasting (single-input ops).
    pub fn from_static(shape: Shape) -> Result<Self, ShapeError> {
        if shape.is_static() {
            Ok(Self(shape))
        } else {
            Err(ShapeError::DynamicNotSupported(shape))
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.0
    }

    pub fn into_shape(self) -> Shape {
        self.0
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.0.ndim()
    }

    /// Total number of elements. Always well-defined: the shape is static.
    pub fn numel(&self) -> i64 {
        self.0.numel()
    }
}

impl AsRef<Shape> for ResolvedShape {
    fn as_ref(&self) -> &Shape {
        &self.0
    }
}

impl std::fmt::Display for ResolvedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Compute the broadcast shape of two static shapes.
///
/// A zero-rank (scalar) shape broadcasts against anything: every axis falls
/// through to the implicit extent 1. The resolved extents are commutative in
/// the arguments; the axis reported on failure is relative to the trailing
/// alignment of the argument order given.
pub fn resolve(a: &Shape, b: &Shape) -> Result<ResolvedShape, ShapeError> {
    if !a.is_static() {
        return Err(ShapeError::DynamicNotSupported(a.clone()));
    }
    if !b.is_static() {
        return Err(ShapeError::DynamicNotSupported(b.clone()));
    }

    let a_dims = &a.0;
    let b_dims = &b.0;
    let max_ndim = a_dims.len().max(b_dims.len());

    let mut result = Vec::with_capacity(max_ndim);

    for i in 0..max_ndim {
        let da = if i < a_dims.len() {
            a_dims[a_dims.len() - 1 - i]
        } else {
            1
        };
        let db = if i < b_dims.len() {
            b_dims[b_dims.len() - 1 - i]
        } else {
            1
        };

        if da == db {
            result.push(da);
        } else if da == 1 {
            result.push(db);
        } else if db == 1 {
            result.push(da);
        } else {
            return Err(ShapeError::IncompatibleAxis {
                axis: i,
                lhs: da,
                rhs: db,
            });
        }
    }

    result.reverse();
    Ok(ResolvedShape(Shape::new(result)))
}

/// Resolve any number of shapes, pairwise left to right.
///
/// An empty slice yields the scalar shape, the fold identity.
pub fn resolve_many(shapes: &[Shape]) -> Result<ResolvedShape, ShapeError> {
    let mut acc = Shape::scalar();
    for shape in shapes {
        acc = resolve(&acc, shape)?.into_shape();
    }
    Ok(ResolvedShape(acc))
}
