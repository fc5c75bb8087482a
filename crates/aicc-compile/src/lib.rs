//! Operator registry and the compile pipeline.
//!
//! Each supported operator type has one registry entry: a verify function, a
//! shape-inference function, and a tiling-selection function. The registry is
//! built once at first use and never mutated afterward — the explicit-table
//! replacement for macro-based static registration.
//!
//! [`compile_op`] runs the full pipeline for one operator instance: registry
//! lookup, arity and attribute verification, broadcast/shape inference,
//! core tiling, and parameter-word serialization.

pub mod descriptor;
pub mod registry;

pub use descriptor::{AttrValue, OpDescriptor, StaticOpDescriptor};
pub use registry::{
    CompileError, CompiledOp, OpSpec, TilingParams, compile_op, lookup, registered_ops,
};
