//! Operator descriptor capability surface.
//!
//! Registry functions see operators through the [`OpDescriptor`] trait —
//! input shapes, attributes, element type — rather than any concrete IR node
//! type. [`StaticOpDescriptor`] is the by-value implementation used when the
//! shapes have already been parsed out of the graph.

use std::collections::HashMap;

use aicc_core::{DType, Shape};
use smallvec::SmallVec;

/// Attribute value attached to an operator descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(String),
    Ints(Vec<i64>),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// Read-only view of an operator instance during compilation.
pub trait OpDescriptor {
    fn input_count(&self) -> usize;
    fn input_shape(&self, index: usize) -> Option<&Shape>;
    fn attr(&self, name: &str) -> Option<&AttrValue>;
    /// Element type of the operator's data inputs.
    fn dtype(&self) -> DType;
}

/// By-value descriptor for operators whose shapes are already parsed.
#[derive(Debug, Clone)]
pub struct StaticOpDescriptor {
    inputs: SmallVec<[Shape; 2]>,
    attrs: HashMap<String, AttrValue>,
    dtype: DType,
}

impl StaticOpDescriptor {
    pub fn new(dtype: DType) -> Self {
        Self {
            inputs: SmallVec::new(),
            attrs: HashMap::new(),
            dtype,
        }
    }

    pub fn with_input(mut self, shape: Shape) -> Self {
        self.inputs.push(shape);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }
}

impl OpDescriptor for StaticOpDescriptor {
    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn input_shape(&self, index: usize) -> Option<&Shape> {
        self.inputs.get(index)
    }

    fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    fn dtype(&self) -> DType {
        self.dtype
    }
}
