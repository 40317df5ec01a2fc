use chisel_dom::{JsonValue, Pointer};
use criterion::{criterion_group, criterion_main, Criterion};
use std::fs;

fn load(filename: &str) -> JsonValue {
    let text = fs::read_to_string(format!("fixtures/json/valid/{}.json", filename)).unwrap();
    JsonValue::parse(&text).unwrap()
}

fn benchmark_stringify(c: &mut Criterion) {
    let value = load("blog_entries");
    c.bench_function("stringify of blog_entries", |b| b.iter(|| value.stringify()));
}

fn benchmark_wide_array(c: &mut Criterion) {
    let value: JsonValue = (0..10_000).map(|i| JsonValue::from(i as i64)).collect();
    c.bench_function("stringify of 10k integers", |b| b.iter(|| value.stringify()));
}

fn benchmark_pointer_resolution(c: &mut Criterion) {
    let value = load("simple_structure");
    let pointer = Pointer::new("/owner/roles/1/since");
    c.bench_function("resolve of /owner/roles/1/since", |b| {
        b.iter(|| value.at(&pointer).is_ok())
    });
}

criterion_group!(
    benches,
    benchmark_stringify,
    benchmark_wide_array,
    benchmark_pointer_resolution
);
criterion_main!(benches);
