use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formwire_model::{select_deep, update_deep, Path, Strictness, Update, Value};
use serde_json::json;

fn wide_model(rows: usize) -> Value {
    let children: Vec<serde_json::Value> = (0..rows)
        .map(|i| {
            json!({
                "name": format!("child-{}", i),
                "address": { "street": "Main", "zip": "12345" },
                "tags": ["a", "b", "c"]
            })
        })
        .collect();

    Value::from(json!({
        "name": "root",
        "children": children,
    }))
}

fn update_leaf(c: &mut Criterion) {
    let model = wide_model(100);
    let path = Path::parse("children.50.address.street");

    c.bench_function("update_deep_leaf_100_rows", |b| {
        b.iter(|| {
            update_deep(
                black_box(&model),
                black_box(&path),
                Update::set("Elm"),
                Strictness::Strict,
            )
        })
    });
}

fn delete_item(c: &mut Criterion) {
    let model = wide_model(1_000);
    let path = Path::parse("children.0");

    c.bench_function("update_deep_delete_first_of_1000", |b| {
        b.iter(|| update_deep(black_box(&model), black_box(&path), Update::Delete, Strictness::Strict))
    });
}

fn select_leaf(c: &mut Criterion) {
    let model = wide_model(100);
    let path = Path::parse("children.99.tags.2");

    c.bench_function("select_deep_leaf", |b| {
        b.iter(|| select_deep(black_box(&model), black_box(&path)))
    });
}

criterion_group!(benches, update_leaf, delete_item, select_leaf);
criterion_main!(benches);
