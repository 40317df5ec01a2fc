use chisel_dom::{JsonValue, Parser};
use criterion::{criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use std::fs;

macro_rules! build_parse_benchmark {
    ($func : tt, $filename : expr) => {
        fn $func(c: &mut Criterion) {
            let text = fs::read_to_string(format!("fixtures/json/valid/{}.json", $filename)).unwrap();
            c.bench_function(&format!("parse of {}", $filename), |b| {
                b.iter(|| JsonValue::parse(&text))
            });
        }
    };
}

build_parse_benchmark!(benchmark_blog_entries, "blog_entries");
build_parse_benchmark!(benchmark_simple_structure, "simple_structure");
build_parse_benchmark!(benchmark_numbers, "numbers");
build_parse_benchmark!(benchmark_unicode_strings, "unicode_strings");
build_parse_benchmark!(benchmark_commented, "commented");

fn benchmark_bytes(c: &mut Criterion) {
    let bytes = fs::read("fixtures/json/valid/blog_entries.json").unwrap();
    let parser = Parser::default();
    c.bench_function("parse of blog_entries bytes", |b| {
        b.iter(|| parser.parse_bytes(&bytes))
    });
}

fn benchmark_deep_nesting(c: &mut Criterion) {
    let text = format!("{}{}", "[".repeat(256), "]".repeat(256));
    c.bench_function("parse of 256 nested arrays", |b| {
        b.iter(|| JsonValue::parse(&text))
    });
}

fn benchmark_minified(c: &mut Criterion) {
    let text = format!("[{}]", vec!["1"; 100_000].join(","));
    c.bench_function("parse of minified array", |b| {
        b.iter(|| JsonValue::parse(&text))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = benchmark_blog_entries, benchmark_simple_structure, benchmark_numbers,
        benchmark_unicode_strings, benchmark_commented, benchmark_bytes, benchmark_deep_nesting,
        benchmark_minified
}
criterion_main!(benches);
