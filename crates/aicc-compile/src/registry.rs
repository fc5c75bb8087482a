//! Init-once operator registry and the compile pipeline.

use std::collections::HashMap;
use std::sync::LazyLock;

use aicc_core::{HardwareProfile, Shape};
use aicc_ops::{ResolvedShape, ShapeError, resolve};
use aicc_tiling::{
    RowTilingPlan, TilingError, TilingPlan, compute_row_tiling, compute_tiling,
};
use tracing::debug;

use crate::descriptor::OpDescriptor;

/// Error returned when an operator instance cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unknown operator type `{0}`")]
    UnknownOp(String),

    #[error("operator expects {expected} inputs, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("missing input {0}")]
    MissingInput(usize),

    #[error("missing required attribute `{0}`")]
    MissingAttr(&'static str),

    #[error("invalid value for attribute `{0}`")]
    InvalidAttr(&'static str),

    #[error("operator verification failed: {0}")]
    Verify(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Tiling(#[from] TilingError),
}

/// Strategy tag leading the parameter words of a compiled operator.
pub const STRATEGY_ELEMENTWISE: i64 = 0;
pub const STRATEGY_ROW: i64 = 1;

/// Tiling record selected by an operator's registry entry.
///
/// Operator-specific tiling layers on by composition: an entry picks a
/// strategy and the downstream launch convention reads the leading tag word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilingParams {
    Elementwise(TilingPlan),
    RowBased(RowTilingPlan),
}

impl TilingParams {
    /// Flatten into tagged parameter words.
    pub fn to_words(&self) -> Vec<i64> {
        match self {
            TilingParams::Elementwise(plan) => {
                let mut words = vec![STRATEGY_ELEMENTWISE];
                words.extend(plan.to_words());
                words
            }
            TilingParams::RowBased(plan) => {
                let mut words = vec![STRATEGY_ROW];
                words.extend(plan.to_words());
                words
            }
        }
    }

    /// Cores that receive work under either strategy.
    pub fn active_core_count(&self) -> usize {
        match self {
            TilingParams::Elementwise(plan) => plan.active_core_count,
            TilingParams::RowBased(plan) => plan.active_core_count,
        }
    }
}

type VerifyFn = fn(&dyn OpDescriptor) -> Result<(), CompileError>;
type InferFn = fn(&dyn OpDescriptor) -> Result<Shape, CompileError>;
type TilingFn = fn(&ResolvedShape, &HardwareProfile) -> Result<TilingParams, TilingError>;

/// One registered operator: its compile-time capability set.
pub struct OpSpec {
    pub name: &'static str,
    pub arity: usize,
    pub verify: VerifyFn,
    pub infer_shape: InferFn,
    pub tiling: TilingFn,
}

/// Result of compiling a single operator instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledOp {
    pub op_type: &'static str,
    pub output_shape: Shape,
    pub params: TilingParams,
    /// Tagged scalar serialization of `params` for the launch convention.
    pub words: Vec<i64>,
}

// ── Registry entries ─────────────────────────────────────────────────────

fn input<'a>(desc: &'a dyn OpDescriptor, index: usize) -> Result<&'a Shape, CompileError> {
    desc.input_shape(index)
        .ok_or(CompileError::MissingInput(index))
}

fn verify_broadcast_binary(desc: &dyn OpDescriptor) -> Result<(), CompileError> {
    resolve(input(desc, 0)?, input(desc, 1)?)?;
    Ok(())
}

fn verify_static_unary(desc: &dyn OpDescriptor) -> Result<(), CompileError> {
    ResolvedShape::from_static(input(desc, 0)?.clone())?;
    Ok(())
}

fn infer_broadcast(desc: &dyn OpDescriptor) -> Result<Shape, CompileError> {
    Ok(resolve(input(desc, 0)?, input(desc, 1)?)?.into_shape())
}

fn infer_passthrough(desc: &dyn OpDescriptor) -> Result<Shape, CompileError> {
    Ok(input(desc, 0)?.clone())
}

/// Inputs: logits `[batch, classes]`, target `[batch]`, weight `[classes]`.
/// The gradient has the logits' shape; its kernel walks one sample row per
/// step, so the tiling is row-granular.
fn verify_nll_loss_grad(desc: &dyn OpDescriptor) -> Result<(), CompileError> {
    let x = input(desc, 0)?;
    let target = input(desc, 1)?;
    let weight = input(desc, 2)?;

    for shape in [x, target, weight] {
        if !shape.is_static() {
            return Err(ShapeError::DynamicNotSupported(shape.clone()).into());
        }
    }
    if x.ndim() != 2 {
        return Err(CompileError::Verify(format!(
            "logits must be rank 2, got {x}"
        )));
    }
    if target.ndim() != 1 || target.0[0] != x.0[0] {
        return Err(CompileError::Verify(format!(
            "target must be [batch], got {target} for logits {x}"
        )));
    }
    if weight.ndim() != 1 || weight.0[0] != x.0[1] {
        return Err(CompileError::Verify(format!(
            "weight must be [classes], got {weight} for logits {x}"
        )));
    }
    match desc.attr("reduction") {
        None => Err(CompileError::MissingAttr("reduction")),
        Some(value) => match value.as_str() {
            Some("none" | "mean" | "sum") => Ok(()),
            _ => Err(CompileError::InvalidAttr("reduction")),
        },
    }
}

fn infer_nll_loss_grad(desc: &dyn OpDescriptor) -> Result<Shape, CompileError> {
    Ok(input(desc, 0)?.clone())
}

fn elementwise_tiling(
    shape: &ResolvedShape,
    hw: &HardwareProfile,
) -> Result<TilingParams, TilingError> {
    Ok(TilingParams::Elementwise(compute_tiling(shape, hw)?))
}

fn row_tiling(
    shape: &ResolvedShape,
    hw: &HardwareProfile,
) -> Result<TilingParams, TilingError> {
    Ok(TilingParams::RowBased(compute_row_tiling(shape, hw)?))
}

static REGISTRY: LazyLock<HashMap<&'static str, OpSpec>> = LazyLock::new(|| {
    let mut ops = HashMap::new();

    for name in ["Add", "Sub", "Mul", "Div", "Maximum", "Minimum"] {
        ops.insert(
            name,
            OpSpec {
                name,
                arity: 2,
                verify: verify_broadcast_binary,
                infer_shape: infer_broadcast,
                tiling: elementwise_tiling,
            },
        );
    }

    for name in ["Relu", "Abs", "Neg"] {
        ops.insert(
            name,
            OpSpec {
                name,
                arity: 1,
                verify: verify_static_unary,
                infer_shape: infer_passthrough,
                tiling: elementwise_tiling,
            },
        );
    }

    ops.insert(
        "NllLossGrad",
        OpSpec {
            name: "NllLossGrad",
            arity: 3,
            verify: verify_nll_loss_grad,
            infer_shape: infer_nll_loss_grad,
            tiling: row_tiling,
        },
    );

    ops
});

/// Look up a registered operator type.
pub fn lookup(op_type: &str) -> Option<&'static OpSpec> {
    REGISTRY.get(op_type)
}

/// Names of all registered operator types, sorted.
pub fn registered_ops() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Compile one operator instance against a platform profile.
///
/// The platform profile's element size is replaced by the descriptor's
/// dtype before tiling; platform constants are per-device, the element size
/// is per-operator.
pub fn compile_op(
    op_type: &str,
    desc: &dyn OpDescriptor,
    hw: &HardwareProfile,
) -> Result<CompiledOp, CompileError> {
    let spec = lookup(op_type).ok_or_else(|| CompileError::UnknownOp(op_type.to_string()))?;

    if desc.input_count() != spec.arity {
        return Err(CompileError::Arity {
            expected: spec.arity,
            got: desc.input_count(),
        });
    }

    (spec.verify)(desc)?;
    let output_shape = (spec.infer_shape)(desc)?;
    let resolved = ResolvedShape::from_static(output_shape.clone())?;

    let hw_op = hw.with_dtype(desc.dtype());
    let params = (spec.tiling)(&resolved, &hw_op)?;
    let words = params.to_words();

    debug!(op_type, output = %output_shape, cores = params.active_core_count(), "compiled operator");

    Ok(CompiledOp {
        op_type: spec.name,
        output_shape,
        params,
        words,
    })
}
