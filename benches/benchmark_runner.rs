/// Benchmark runner for the binding layer.
///
/// Times prototype building, instantiation and the first (promoting) versus
/// cached property reads.

extern crate just_bind;

use just_bind::runner::binding::{build, instantiate, DefinitionEntry, HostPtr, ObjectDefinition, PropertyHandler};
use just_bind::runner::ds::error::JErrorType;
use just_bind::runner::ds::object_property::PropertyKey;
use just_bind::runner::ds::operations::object::{get_path, get_v};
use just_bind::runner::ds::value::JsValue;
use just_bind::runner::plugin::types::EvalContext;
use std::time::{Duration, Instant};

fn host_size(_ctx: &mut EvalContext, host: HostPtr, magic32: i32, _write: Option<JsValue>) -> Result<JsValue, JErrorType> {
    Ok(JsValue::from((host.addr() as i64) + magic32 as i64))
}

/// A table of `width` literal properties per level, `depth` levels deep.
fn wide_table(width: usize, depth: usize) -> ObjectDefinition {
    let mut entries: Vec<DefinitionEntry> = (0..width)
        .map(|i| DefinitionEntry::property(format!("p{}", i), format!("v{}", i)))
        .collect();
    entries.push(DefinitionEntry::dynamic("size", PropertyHandler::Native(host_size), 1));
    if depth > 0 {
        entries.push(DefinitionEntry::object("child", wide_table(width, depth - 1)));
    }
    ObjectDefinition::new(entries)
}

fn time<F: FnMut()>(iterations: u32, mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    start.elapsed()
}

fn main() {
    println!("=======================================================");
    println!("  just-bind - Binding Benchmarks");
    println!("=======================================================\n");

    let table = wide_table(32, 4);
    let mut ctx = EvalContext::new();
    let proto = match build(&mut ctx.heap, &table) {
        Ok(proto) => proto,
        Err(e) => {
            eprintln!("build failed: {}", e);
            return;
        }
    };

    println!("{:<36} {:>12} {:>12}", "Benchmark", "Total", "Per iter");
    println!("{}", "-".repeat(62));

    let benchmarks: Vec<(&str, u32, Box<dyn FnMut(&mut EvalContext) + '_>)> = vec![
        (
            "Build (32 x 5 levels)",
            1_000,
            Box::new(|ctx: &mut EvalContext| {
                let _ = build(&mut ctx.heap, &table);
            }),
        ),
        (
            "Instantiate",
            100_000,
            Box::new(|ctx: &mut EvalContext| {
                let _ = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x1000), false);
            }),
        ),
        (
            "Fresh instance + child.child.size",
            10_000,
            Box::new(|ctx: &mut EvalContext| {
                if let Ok(obj) = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x1000), false) {
                    let _ = get_path(ctx, &obj, "child.child.size");
                }
            }),
        ),
    ];

    for (name, iterations, mut f) in benchmarks {
        let mut bench_ctx = EvalContext::new();
        let total = time(iterations, || f(&mut bench_ctx));
        println!("{:<36} {:>10.2?} {:>10.2?}", name, total, total / iterations);
    }

    let obj = match instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x1000), false) {
        Ok(obj) => obj,
        Err(e) => {
            eprintln!("instantiate failed: {}", e);
            return;
        }
    };
    let key = PropertyKey::from("size");
    let _ = get_v(&mut ctx, &obj, &key);
    let iterations = 1_000_000;
    let total = time(iterations, || {
        let _ = get_v(&mut ctx, &obj, &key);
    });
    println!("{:<36} {:>10.2?} {:>10.2?}", "Cached dynamic read", total, total / iterations);
}
