//! End-to-end compile tests: registry lookup, verification, broadcast
//! resolution, tiling, and parameter-word serialization.

use aicc_compile::{
    AttrValue, CompileError, StaticOpDescriptor, TilingParams, compile_op, registered_ops,
};
use aicc_core::{DType, HardwareProfile, Shape, UNKNOWN_DIM};
use aicc_ops::ShapeError;

fn npu32() -> HardwareProfile {
    let _ = tracing_subscriber::fmt::try_init();
    HardwareProfile::for_dtype(32, 32, 256 * 1024, DType::F32)
}

#[test]
fn compile_add_with_broadcast() {
    let desc = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![1, 3, 4]))
        .with_input(Shape::new(vec![4, 3, 4]));

    let compiled = compile_op("Add", &desc, &npu32()).unwrap();
    assert_eq!(compiled.op_type, "Add");
    assert_eq!(compiled.output_shape, Shape::new(vec![4, 3, 4]));

    let TilingParams::Elementwise(plan) = compiled.params else {
        panic!("expected elementwise tiling");
    };
    assert_eq!(plan.total_elements, 48);
    // 48 elements over 32 cores: ceil share 2, aligned to the 8-element
    // block, 6 active cores
    assert_eq!(plan.aligned_per_core_elements, 8);
    assert_eq!(plan.active_core_count, 6);
    assert_eq!(plan.tail_elements, 8);
    assert!(!plan.has_tail_core);

    // Tagged words: strategy tag then the plan fields.
    assert_eq!(compiled.words[0], 0);
    assert_eq!(compiled.words.len(), 8);
}

#[test]
fn compile_unknown_op() {
    let desc = StaticOpDescriptor::new(DType::F32).with_input(Shape::new(vec![4]));
    assert_eq!(
        compile_op("Conv2D", &desc, &npu32()),
        Err(CompileError::UnknownOp("Conv2D".into()))
    );
}

#[test]
fn compile_arity_mismatch() {
    let desc = StaticOpDescriptor::new(DType::F32).with_input(Shape::new(vec![4]));
    assert_eq!(
        compile_op("Add", &desc, &npu32()),
        Err(CompileError::Arity {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn compile_incompatible_broadcast() {
    let desc = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![2, 3]))
        .with_input(Shape::new(vec![4, 3]));
    assert_eq!(
        compile_op("Mul", &desc, &npu32()),
        Err(CompileError::Shape(ShapeError::IncompatibleAxis {
            axis: 1,
            lhs: 2,
            rhs: 4
        }))
    );
}

#[test]
fn compile_unary_passthrough() {
    let desc = StaticOpDescriptor::new(DType::F32).with_input(Shape::new(vec![16, 16]));
    let compiled = compile_op("Relu", &desc, &npu32()).unwrap();
    assert_eq!(compiled.output_shape, Shape::new(vec![16, 16]));
}

#[test]
fn compile_unary_rejects_dynamic() {
    let desc = StaticOpDescriptor::new(DType::F32).with_input(Shape::new(vec![UNKNOWN_DIM, 16]));
    assert!(matches!(
        compile_op("Neg", &desc, &npu32()),
        Err(CompileError::Shape(ShapeError::DynamicNotSupported(_)))
    ));
}

#[test]
fn compile_dtype_drives_alignment() {
    // One 32-byte block holds 8 f32 elements but 16 f16 elements, so the
    // same shape aligns differently per dtype.
    let shape = Shape::new(vec![100]);

    let f32_desc = StaticOpDescriptor::new(DType::F32).with_input(shape.clone());
    let f16_desc = StaticOpDescriptor::new(DType::F16).with_input(shape);

    let f32_plan = match compile_op("Relu", &f32_desc, &npu32()).unwrap().params {
        TilingParams::Elementwise(plan) => plan,
        other => panic!("unexpected params {other:?}"),
    };
    let f16_plan = match compile_op("Relu", &f16_desc, &npu32()).unwrap().params {
        TilingParams::Elementwise(plan) => plan,
        other => panic!("unexpected params {other:?}"),
    };

    assert_eq!(f32_plan.block_elements, 8);
    assert_eq!(f16_plan.block_elements, 16);
    assert_eq!(f32_plan.aligned_per_core_elements, 8);
    assert_eq!(f16_plan.aligned_per_core_elements, 16);
}

#[test]
fn compile_nll_loss_grad_row_tiling() {
    let desc = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![64, 10]))
        .with_input(Shape::new(vec![64]))
        .with_input(Shape::new(vec![10]))
        .with_attr("reduction", AttrValue::Str("mean".into()));

    let compiled = compile_op("NllLossGrad", &desc, &npu32()).unwrap();
    assert_eq!(compiled.output_shape, Shape::new(vec![64, 10]));

    let TilingParams::RowBased(plan) = compiled.params else {
        panic!("expected row tiling");
    };
    assert_eq!(plan.total_rows, 64);
    assert_eq!(plan.rows_per_core, 2);
    assert_eq!(plan.active_core_count, 32);
    assert!(!plan.has_tail_core);
    assert_eq!(plan.row_elements, 10);
    assert_eq!(plan.aligned_row_elements, 16);

    assert_eq!(compiled.words[0], 1);
}

#[test]
fn compile_nll_loss_grad_attr_errors() {
    let base = || {
        StaticOpDescriptor::new(DType::F32)
            .with_input(Shape::new(vec![64, 10]))
            .with_input(Shape::new(vec![64]))
            .with_input(Shape::new(vec![10]))
    };

    assert_eq!(
        compile_op("NllLossGrad", &base(), &npu32()),
        Err(CompileError::MissingAttr("reduction"))
    );

    let bad = base().with_attr("reduction", AttrValue::Str("median".into()));
    assert_eq!(
        compile_op("NllLossGrad", &bad, &npu32()),
        Err(CompileError::InvalidAttr("reduction"))
    );

    let wrong_kind = base().with_attr("reduction", AttrValue::Int(1));
    assert_eq!(
        compile_op("NllLossGrad", &wrong_kind, &npu32()),
        Err(CompileError::InvalidAttr("reduction"))
    );
}

#[test]
fn compile_nll_loss_grad_shape_errors() {
    let mismatched_target = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![64, 10]))
        .with_input(Shape::new(vec![32]))
        .with_input(Shape::new(vec![10]))
        .with_attr("reduction", AttrValue::Str("sum".into()));
    assert!(matches!(
        compile_op("NllLossGrad", &mismatched_target, &npu32()),
        Err(CompileError::Verify(_))
    ));

    let rank_three = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![2, 64, 10]))
        .with_input(Shape::new(vec![64]))
        .with_input(Shape::new(vec![10]))
        .with_attr("reduction", AttrValue::Str("none".into()));
    assert!(matches!(
        compile_op("NllLossGrad", &rank_three, &npu32()),
        Err(CompileError::Verify(_))
    ));
}

#[test]
fn compile_empty_tensor_is_rejected() {
    let desc = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![0, 4]))
        .with_input(Shape::new(vec![0, 4]));
    assert!(matches!(
        compile_op("Add", &desc, &npu32()),
        Err(CompileError::Tiling(aicc_tiling::TilingError::EmptyShape))
    ));
}

#[test]
fn registered_ops_listing() {
    let names = registered_ops();
    assert!(names.contains(&"Add"));
    assert!(names.contains(&"NllLossGrad"));
    assert!(names.is_sorted());
}
