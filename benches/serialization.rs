use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use serde_hocon::{
    emit_value, from_value, to_string, to_string_with_options, ConfigObject, ConfigValue,
    EmitOptions, Token, TreeCursor,
};

#[derive(Serialize, Clone)]
struct Service {
    name: String,
    host: String,
    port: u16,
    weight: f64,
    enabled: bool,
}

fn sample_service(i: usize) -> Service {
    Service {
        name: format!("service-{i}"),
        host: format!("10.0.0.{}", i % 255),
        port: 8000 + (i % 1000) as u16,
        weight: i as f64 / 7.0,
        enabled: i % 3 != 0,
    }
}

fn sparse_tree(size: usize) -> ConfigValue {
    let mut obj = ConfigObject::new();
    // Reverse insertion order so reconciliation actually reorders.
    for i in (0..size).rev() {
        obj.insert(i.to_string(), ConfigValue::from(i as i64));
    }
    obj.into()
}

fn deep_tree(depth: usize, fanout: usize) -> ConfigValue {
    if depth == 0 {
        return ConfigValue::from("leaf");
    }
    let mut obj = ConfigObject::new();
    for i in 0..fanout {
        obj.insert(format!("child-{i}"), deep_tree(depth - 1, fanout));
    }
    obj.into()
}

fn benchmark_serialize_struct(c: &mut Criterion) {
    let service = sample_service(1);
    c.bench_function("serialize_struct", |b| {
        b.iter(|| to_string(black_box(&service)))
    });
    c.bench_function("serialize_struct_hocon", |b| {
        b.iter(|| to_string_with_options(black_box(&service), EmitOptions::hocon()))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");
    for size in [10, 100, 500] {
        let services: Vec<Service> = (0..size).map(sample_service).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &services, |b, s| {
            b.iter(|| to_string(black_box(s)))
        });
    }
    group.finish();
}

fn benchmark_cursor_traversal(c: &mut Criterion) {
    let tree = deep_tree(4, 5);
    c.bench_function("cursor_full_traversal", |b| {
        b.iter(|| {
            let cursor = TreeCursor::new(black_box(&tree));
            cursor.count()
        })
    });
    c.bench_function("cursor_skip_children", |b| {
        b.iter(|| {
            let mut cursor = TreeCursor::new(black_box(&tree));
            let mut skipped = 0usize;
            while let Some(token) = cursor.next_token() {
                // Skip every subtree below the first level.
                if token == Token::StartObject && cursor.depth() > 2 {
                    cursor.skip_children();
                    skipped += 1;
                }
            }
            skipped
        })
    });
}

fn benchmark_emit_value(c: &mut Criterion) {
    let tree = deep_tree(4, 5);
    c.bench_function("emit_value_compact", |b| {
        b.iter(|| emit_value(black_box(&tree), &EmitOptions::default()))
    });
    c.bench_function("emit_value_hocon", |b| {
        b.iter(|| emit_value(black_box(&tree), &EmitOptions::hocon()))
    });
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_sparse_object");
    for size in [10, 100, 1000] {
        let tree = sparse_tree(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, t| {
            b.iter(|| from_value::<Vec<i64>>(black_box(t)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_struct,
    benchmark_serialize_array,
    benchmark_cursor_traversal,
    benchmark_emit_value,
    benchmark_reconcile,
);
criterion_main!(benches);
