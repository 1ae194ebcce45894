use std::error::Error;

use criterion::{criterion_group, criterion_main, Criterion};
use pathwise::{
    path::{path_pattern, PathPattern},
    reader::PathAwareArrayReader,
};
use serde::Deserialize;

fn call_unwrap<F: FnOnce() -> Result<(), Box<dyn Error>>>(f: F) {
    f().unwrap();
}

#[derive(Deserialize)]
#[allow(dead_code)] // Fields are only read by the deserializer
struct Row {
    id: u64,
    name: String,
    score: f64,
    active: bool,
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct Data {
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct Document {
    data: Data,
}

fn bench_compare(c: &mut Criterion, name: &str, json: &str) {
    let pattern: PathPattern = path_pattern!["data", "rows"];
    let mut group = c.benchmark_group(name);

    group.bench_with_input("pathwise-read-values", json, |b, json| {
        b.iter(|| {
            call_unwrap(|| {
                let mut reader = PathAwareArrayReader::new(json.as_bytes());
                let mut count = 0_u64;
                for row in reader.read_values_as::<Row, _>(&pattern)? {
                    count += row?.id;
                }
                assert!(count > 0);
                Ok(())
            });
        })
    });

    group.bench_with_input("serde-deserialize (reader)", json, |b, json| {
        b.iter(|| {
            call_unwrap(|| {
                let document: Document = serde_json::from_reader(json.as_bytes())?;
                assert!(!document.data.rows.is_empty());
                Ok(())
            });
        })
    });

    group.bench_with_input("serde-deserialize (string)", json, |b, json| {
        b.iter(|| {
            call_unwrap(|| {
                let document: Document = serde_json::from_str(json)?;
                assert!(!document.data.rows.is_empty());
                Ok(())
            });
        })
    });

    group.finish();
}

fn create_rows(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "name": "row {i}", "score": {i}.5e-1, "active": true, "tags": ["a", "b"], "extra": {{"ignored": [1, 2, 3]}}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn benchmark_rows(c: &mut Criterion) {
    let json = format!(r#"{{"data": {{"rows": [{}]}}}}"#, create_rows(1000));
    bench_compare(c, "read-rows", &json);
}

fn benchmark_rows_after_skipped_data(c: &mut Criterion) {
    let skipped = r#"{"nested": [true, false, null, "abcdabcdabcdabcd"]},"#.repeat(1000);
    let json = format!(
        r#"{{"meta": [{skipped}null], "data": {{"rows": [{}]}}}}"#,
        create_rows(100)
    );
    bench_compare(c, "read-rows-after-skipped-data", &json);
}

criterion_group!(benches, benchmark_rows, benchmark_rows_after_skipped_data);
criterion_main!(benches);
