//! Criterion benchmarks for rosetta_logger

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rosetta_logger::prelude::*;
use std::sync::Arc;

/// Formats every entry like a real sink would, then discards it
struct DiscardAppender {
    format: OutputFormat,
}

impl Appender for DiscardAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        black_box(self.format.format(entry, false));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

fn bench_logger(environment: Environment, level: LogLevel) -> Logger {
    Logger::builder()
        .environment(environment)
        .min_level(level)
        .global_tags(GlobalTags::new("astra", "bench"))
        .stack_trace(None)
        .appender(DiscardAppender {
            format: environment.output_format(),
        })
        .build()
}

fn request_record() -> LogRecord {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let end = start + chrono::Duration::microseconds(1500);

    let mut record = LogRecord::with_message("request served")
        .with_field("user_id", 12345)
        .with_field("region", "eu-west-1")
        .with_field("cache_hit", true)
        .with_timing(start, end);
    record.correlation_id = "c-42".to_string();
    record.status_code = 200;
    record.method = "GET".to_string();
    record.path = "/users".to_string();
    record
}

// ============================================================================
// Serialization Benchmarks
// ============================================================================

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Elements(1));

    let record = request_record();
    let tags = GlobalTags::new("astra", "bench");

    group.bench_function("serialize_fields", |b| {
        b.iter(|| black_box(record.serialize_fields(black_box(Some(&tags)))));
    });

    group.bench_function("to_structured_fields", |b| {
        b.iter(|| black_box(record.to_structured_fields(black_box(Some(&tags)))));
    });

    let entry = LogEntry::new(LogLevel::Info, "request served")
        .with_fields(record.to_structured_fields(Some(&tags)));

    group.bench_function("json_line", |b| {
        b.iter(|| {
            black_box(OutputFormat::Json.format(black_box(&entry), false))
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let record = request_record();

    let development = bench_logger(Environment::Development, LogLevel::Debug);
    group.bench_function("development_record", |b| {
        b.iter(|| development.info_message(black_box(Some(&record))));
    });

    let production = bench_logger(Environment::Production, LogLevel::Debug);
    group.bench_function("production_record", |b| {
        b.iter(|| production.info_message(black_box(Some(&record))));
    });

    group.bench_function("builder_two_fields", |b| {
        b.iter(|| {
            production
                .with_field("user_id", black_box(12345))
                .with_field("region", black_box("eu-west-1"))
                .info("request served")
        });
    });

    group.finish();
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = bench_logger(Environment::Production, LogLevel::Warn);

    group.bench_function("below_threshold", |b| {
        b.iter(|| logger.debug(black_box("This should be filtered")));
    });

    group.bench_function("below_threshold_with_fields", |b| {
        b.iter(|| {
            logger
                .with_field("user_id", black_box(12345))
                .debug("This should be filtered")
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| logger.error(black_box("This should be logged")));
    });

    group.finish();
}

// ============================================================================
// Concurrent Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(bench_logger(Environment::Production, LogLevel::Info));

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        logger.info(black_box("Concurrent message"));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.bench_function("set_level", |b| {
        b.iter(|| logger.set_level(black_box("INFO")));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_serialization,
    bench_dispatch,
    bench_level_filtering,
    bench_concurrent_logging
);

criterion_main!(benches);
