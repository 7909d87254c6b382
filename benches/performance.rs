//! Performance benchmarks for RegexKit
//!
//! These benchmarks measure the performance of key operations:
//! - Safety scoring of pattern sources
//! - Type-spec resolution against the built-in registry
//! - Text extraction on inputs of different sizes
//! - Batch extraction across several types
//!
//! ## Running Benchmarks
//!
//! To run all benchmarks:
//! ```bash
//! cargo bench
//! ```
//!
//! To run specific benchmarks:
//! ```bash
//! cargo bench safety_scoring
//! cargo bench extraction
//! ```
//!
//! ## Expected Performance Characteristics
//!
//! ### Resolution
//! - Lookups take a read lock and clone a compiled `Regex` (reference counted)
//! - Search variants are compiled once, when a matcher is registered
//!
//! ### Extraction
//! - Scales linearly with input size (the regex engine has no backtracking)
//! - Batch extraction spreads types across the rayon pool

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use regex_kit::RegexKit;
use regex_kit::safety::check_safety;

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds a text of roughly `size` bytes sprinkled with emails and phones
fn create_test_text(size: usize) -> String {
    let line = "contact a.user@example.com or 13800138000 for details\n";
    line.repeat(size / line.len() + 1)
}

fn builtin_kit() -> RegexKit {
    RegexKit::with_builtins().unwrap()
}

// ============================================================================
// Safety Benchmarks
// ============================================================================

fn bench_safety_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("safety_scoring");

    let sources = [
        ("simple", r"^\d{5}$"),
        ("email", r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"),
        ("nested", r"^(a+)+$"),
    ];

    for (name, source) in sources {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| black_box(check_safety(source)));
        });
    }

    group.finish();
}

// ============================================================================
// Resolution Benchmarks
// ============================================================================

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let kit = builtin_kit();

    for spec in ["email", "phone:US", "creditCard"] {
        group.bench_with_input(BenchmarkId::from_parameter(spec), spec, |b, spec| {
            b.iter(|| black_box(kit.get(spec).unwrap()));
        });
    }

    group.bench_function("test_email", |b| {
        b.iter(|| black_box(kit.test("email", "user@example.com").unwrap()));
    });

    group.finish();
}

// ============================================================================
// Extraction Benchmarks
// ============================================================================

/// Benchmark extraction on different text sizes
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let kit = builtin_kit();

    for size in [1_000, 10_000, 100_000] {
        let text = create_test_text(size);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("extract_all", size), &text, |b, text| {
            b.iter(|| black_box(kit.extract_all("email", text)));
        });

        group.bench_with_input(BenchmarkId::new("extract_batch", size), &text, |b, text| {
            b.iter(|| black_box(kit.extract_batch(text, &["email", "phone", "url", "ip"])));
        });
    }

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let kit = builtin_kit();
    let text = create_test_text(10_000);

    c.bench_function("chain_redact", |b| {
        b.iter(|| {
            let chain = kit
                .chain(text.as_str())
                .replace_all("email", "[email]")
                .and_then(|chain| chain.replace_all("phone", "[phone]"))
                .unwrap();
            black_box(chain.into_text())
        });
    });
}

criterion_group!(safety_benches, bench_safety_scoring,);
criterion_group!(lookup_benches, bench_resolution,);
criterion_group!(text_benches, bench_extraction, bench_chain,);

criterion_main!(safety_benches, lookup_benches, text_benches);
