//! Performance benchmarks for conversion resolution and execution.
//!
//! - Resolution: cached, exact, widened and id-scoped lookups
//! - Execution: text parsing, numeric conversion and array composition
//! - Registration: snapshot publication cost
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin
//! ```

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use morphic::converters::TextToDate;
use morphic::{ClassEntry, ConversionExecutor, ConversionService, TypeHash, Value, objects};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// A service with a five-level class chain below `Number`.
fn deep_service() -> (ConversionService, TypeHash) {
    let service = ConversionService::new();
    let mut base = objects::NUMBER;
    for depth in 0..5 {
        base = service
            .add_type(ClassEntry::new(format!("Level{depth}")).with_base(base))
            .unwrap();
    }
    (service, base)
}

fn resolution_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("resolution");

    let service = ConversionService::new();
    group.bench_function("cached_exact", |b| {
        b.iter(|| {
            black_box(
                service
                    .conversion_executor(black_box(objects::STRING), black_box(objects::LONG))
                    .unwrap(),
            )
        });
    });

    let (deep, leaf) = deep_service();
    group.bench_function("cached_widened", |b| {
        b.iter(|| black_box(deep.conversion_executor(leaf, objects::STRING).unwrap()));
    });

    // A fresh service per batch so every lookup misses the cache
    group.bench_function("uncached_widened", |b| {
        b.iter_batched(
            deep_service,
            |(service, leaf)| {
                let executor = service.conversion_executor(leaf, objects::STRING).unwrap();
                end_profiling_frame();
                black_box(executor)
            },
            BatchSize::SmallInput,
        );
    });

    let scoped = ConversionService::new();
    scoped
        .add_converter(
            ConversionExecutor::new(objects::STRING, objects::DATE, TextToDate::with_pattern("%m/%d/%Y"))
                .with_id("us"),
        )
        .unwrap();
    group.bench_function("by_id", |b| {
        b.iter(|| {
            black_box(
                scoped
                    .conversion_executor_by_id("us", objects::STRING, objects::DATE)
                    .unwrap(),
            )
        });
    });

    group.finish();
}

fn execution_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("execution");
    let service = ConversionService::new();

    let text = Value::from("123456789");
    group.bench_function("text_to_long", |b| {
        b.iter(|| black_box(service.execute_conversion(black_box(&text), objects::LONG).unwrap()));
    });

    let date = Value::from("2024-02-29");
    group.bench_function("text_to_date", |b| {
        b.iter(|| black_box(service.execute_conversion(black_box(&date), objects::DATE).unwrap()));
    });

    let number = Value::Int64(1_000);
    group.bench_function("long_to_short", |b| {
        b.iter(|| {
            black_box(
                service
                    .execute_conversion(black_box(&number), objects::SHORT)
                    .unwrap(),
            )
        });
    });

    for size in [16usize, 256, 4096] {
        let items = Value::array(
            objects::STRING,
            (0..size).map(|i| Value::String(i.to_string())),
        );
        let target = TypeHash::from_array(objects::INTEGER);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("string_array_to_int_array_{size}"), |b| {
            b.iter(|| {
                let result = service.execute_conversion(black_box(&items), target).unwrap();
                end_profiling_frame();
                black_box(result)
            });
        });
    }

    group.finish();
}

fn registration_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("registration");

    group.bench_function("build_default_service", |b| {
        b.iter(|| black_box(ConversionService::new()));
    });

    group.bench_function("add_type", |b| {
        b.iter_batched(
            ConversionService::new,
            |service| {
                service
                    .add_type(ClassEntry::new("Invoice").with_base(objects::OBJECT))
                    .unwrap();
                black_box(service.generation())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    resolution_benchmarks,
    execution_benchmarks,
    registration_benchmarks
);

criterion_main!(benches);
