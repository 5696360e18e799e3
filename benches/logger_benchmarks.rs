//! Criterion benchmarks for fanout_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanout_logger::core::formatter::RecordFormatter;
use fanout_logger::core::FilterEngine;
use fanout_logger::prelude::*;
use fanout_logger::{debug, info};
use std::sync::Arc;
use std::thread;

struct NullSink;

impl Sink for NullSink {
    fn write(&self, text: &str) -> Result<()> {
        black_box(text);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn quiet_logger(dir: &std::path::Path) -> Logger {
    Logger::builder()
        .base_dir(dir)
        .outputs(OutputSet::none().with(OutputType::UserSink))
        .user_sink(Arc::new(NullSink))
        .build()
}

// ============================================================================
// Submission Benchmarks
// ============================================================================

fn bench_submit(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(1));

    let logger = quiet_logger(dir.path());
    logger.add_module(1, "bench");

    group.bench_function("plain", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("macro_formatted", |b| {
        b.iter(|| info!(logger, module = 1, "value = {}", black_box(42)));
    });

    logger.set_detail_mode(true);
    group.bench_function("detail", |b| {
        b.iter(|| info!(logger, "with call site"));
    });

    group.bench_function("disabled_level", |b| {
        b.iter(|| debug!(logger, "never formatted {}", black_box(1)));
    });

    group.finish();
    logger.close();
}

fn bench_concurrent_submit(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut group = c.benchmark_group("concurrent_submit");
    let logger = Arc::new(quiet_logger(dir.path()));

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..100 {
                                logger.write_line(LogLevel::Info, t as i32, format!("msg {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
    logger.close();
}

// ============================================================================
// Filter and Formatting Benchmarks
// ============================================================================

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    group.throughput(Throughput::Elements(1));

    let engine = FilterEngine::new();
    group.bench_function("empty", |b| {
        b.iter(|| engine.should_suppress(black_box(3), black_box("user login from 10.0.0.1")));
    });

    engine.add_and_filters(["user", "login"]);
    engine.add_or_filters(["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    engine.add_module_filters([7, 8, 9]);
    group.bench_function("and_or_module", |b| {
        b.iter(|| engine.should_suppress(black_box(3), black_box("user login from 10.0.0.1")));
    });

    engine.set_reverse(true);
    group.bench_function("reversed", |b| {
        b.iter(|| engine.should_suppress(black_box(3), black_box("user login from 10.0.0.1")));
    });

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let formatter = RecordFormatter::new(TimestampZone::Utc, "\r\n");
    let record = LogRecord::new(LogLevel::Warn, 2, "disk usage at 91%").with_location(
        "src/storage/volume.rs",
        120,
        "check_usage",
    );

    group.bench_function("compact", |b| {
        b.iter(|| formatter.format_at("2024-01-01 00:00:00.000", black_box(&record), "storage", false));
    });

    group.bench_function("detail", |b| {
        b.iter(|| formatter.format_at("2024-01-01 00:00:00.000", black_box(&record), "storage", true));
    });

    group.bench_function("with_clock", |b| {
        b.iter(|| formatter.format(black_box(&record), "storage", false));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_submit,
    bench_concurrent_submit,
    bench_filters,
    bench_formatting
);
criterion_main!(benches);
