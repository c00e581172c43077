//! Benchmarks for the nz compile pipeline.
//!
//! Measures loading, checking and monomorphizing:
//! - Generated single modules of growing size
//! - Overload-heavy and generic-heavy programs
//! - The multi-module tree under `test_scripts`
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nz::{CompileOptions, FileSystemDocumentProvider, MemoryDocumentProvider, ModulePath, compile};
use std::fmt::Write;
use std::hint::black_box;
use std::path::PathBuf;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

const PRELUDE: &str = include_str!("../test_scripts/prelude.nz");

/// `count` structs, each with an accessor and a generic wrapper call.
fn generated_module(count: usize) -> String {
    let mut source = String::from("import prelude\n\nfun<T> T id(T x)\n\tx\n");
    for i in 0..count {
        let _ = write!(
            source,
            "\nstruct Item{i}\n\tNat value\n\tBool flag\n\nfun Nat read{i}(Item{i} item)\n\tid(item.value)\n\nfun Nat make{i}()\n\tread{i}(Item{i}(1, eq(2, 3)))\n"
        );
    }
    source
}

/// `count` overloads of `pick` with distinct arities, all called once.
fn overload_module(count: usize) -> String {
    let mut source = String::from("import prelude\n");
    for arity in 1..=count {
        let params: Vec<String> = (0..arity).map(|i| format!("Nat p{i}")).collect();
        let _ = write!(source, "\nfun Nat pick({})\n\tp0\n", params.join(", "));
    }
    for arity in 1..=count {
        let args: Vec<String> = (0..arity).map(|i| i.to_string()).collect();
        let _ = write!(source, "\nfun Nat call{arity}()\n\tpick({})\n", args.join(", "));
    }
    source
}

fn run(provider: &MemoryDocumentProvider) -> usize {
    let output = compile(provider, &ModulePath::parse("main"), &CompileOptions::default())
        .expect("benchmark program should monomorphize");
    assert!(output.is_clean(), "{}", output.diagnostics);
    end_profiling_frame();
    output.every_concrete_fun.map_or(0, |every| every.len())
}

fn size_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("compile/size");

    for count in [10, 100, 500] {
        let main = generated_module(count);
        group.throughput(Throughput::Bytes(main.len() as u64));
        let provider = MemoryDocumentProvider::new()
            .with("prelude.nz", PRELUDE)
            .with("main.nz", main);
        group.bench_with_input(BenchmarkId::new("structs", count), &provider, |b, provider| {
            b.iter(|| black_box(run(provider)));
        });
    }

    group.finish();
}

fn overload_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/overloads");

    for count in [4, 16, 32] {
        let provider = MemoryDocumentProvider::new()
            .with("prelude.nz", PRELUDE)
            .with("main.nz", overload_module(count));
        group.bench_with_input(BenchmarkId::new("arity", count), &provider, |b, provider| {
            b.iter(|| black_box(run(provider)));
        });
    }

    group.finish();
}

fn script_tree_benchmark(c: &mut Criterion) {
    let provider =
        FileSystemDocumentProvider::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts"));

    c.bench_function("compile/test_scripts", |b| {
        b.iter(|| {
            let output = compile(
                black_box(&provider),
                &ModulePath::parse("main"),
                &CompileOptions::default(),
            )
            .unwrap();
            end_profiling_frame();
            black_box(output.program.modules().len())
        });
    });
}

criterion_group!(benches, size_benchmarks, overload_benchmarks, script_tree_benchmark);
criterion_main!(benches);
