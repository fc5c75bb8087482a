use clap::{Parser, Subcommand};

use aicc_compile::{AttrValue, StaticOpDescriptor, compile_op, registered_ops};
use aicc_core::{DType, HardwareProfile, Shape};

#[derive(Parser)]
#[command(name = "aicc")]
#[command(about = "AI-core operator compiler development CLI")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compile a demonstration operator set and print the tiling plans.
    Smoke {
        /// Hardware profile preset (npu32, npu8, sim); defaults to the
        /// AICC_PROFILE env var, then the edge profile.
        #[arg(long)]
        profile: Option<String>,
    },
    /// List registered operator types.
    Ops,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.cmd {
        Cmd::Smoke { profile } => smoke(profile),
        Cmd::Ops => {
            for name in registered_ops() {
                println!("{name}");
            }
        }
    }
}

fn smoke(profile: Option<String>) {
    let hw = match profile {
        Some(name) => match HardwareProfile::preset(&name) {
            Some(hw) => hw,
            None => {
                eprintln!("unknown profile preset `{name}`");
                std::process::exit(1);
            }
        },
        None => HardwareProfile::resolve(),
    };
    println!("Profile: {hw:?}\n");

    // Binary elementwise with broadcast
    let add = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![1, 3, 4]))
        .with_input(Shape::new(vec![4, 3, 4]));
    let compiled = compile_op("Add", &add, &hw).unwrap();
    println!(
        "Add [1,3,4] + [4,3,4] -> {} words={:?}",
        compiled.output_shape, compiled.words
    );

    // Unary, f16 elements pack the transfer blocks twice as densely
    let relu = StaticOpDescriptor::new(DType::F16).with_input(Shape::new(vec![64, 32]));
    let compiled = compile_op("Relu", &relu, &hw).unwrap();
    println!(
        "Relu [64,32] f16 -> {} words={:?}",
        compiled.output_shape, compiled.words
    );

    // Row-tiled loss gradient
    let grad = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![64, 10]))
        .with_input(Shape::new(vec![64]))
        .with_input(Shape::new(vec![10]))
        .with_attr("reduction", AttrValue::Str("mean".into()));
    let compiled = compile_op("NllLossGrad", &grad, &hw).unwrap();
    println!(
        "NllLossGrad [64,10] -> {} words={:?}",
        compiled.output_shape, compiled.words
    );

    // Shape mismatch surfaces as a compile error
    let bad = StaticOpDescriptor::new(DType::F32)
        .with_input(Shape::new(vec![2, 3]))
        .with_input(Shape::new(vec![4, 3]));
    match compile_op("Mul", &bad, &hw) {
        Ok(_) => println!("Mul [2,3] * [4,3] unexpectedly compiled"),
        Err(err) => println!("Mul [2,3] * [4,3] rejected: {err}"),
    }
}
