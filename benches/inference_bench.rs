//! Benchmarks for schema inference
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use data_modeller::inference::{KeyInferencer, TableProfile, TypeInferencer};
use data_modeller::{ModellerConfig, MultiTableImporter};

/// `tables` blocks of `rows` rows; each block references the previous one
fn generate_input(tables: usize, rows: usize) -> String {
    let mut blocks = Vec::with_capacity(tables);
    for t in 0..tables {
        let mut block = if t == 0 {
            format!("T{t}ID,Label\n")
        } else {
            format!("T{t}ID,T{}RefID,Label\n", t - 1)
        };
        for r in 0..rows {
            if t == 0 {
                block.push_str(&format!("{r},label-{r}\n"));
            } else {
                block.push_str(&format!("{r},{},label-{r}\n", r % (rows / 2 + 1)));
            }
        }
        blocks.push(block);
    }
    blocks.join("\n")
}

fn bench_parse(c: &mut Criterion) {
    let config = ModellerConfig::default();
    let input = generate_input(8, 1_000);

    let mut group = c.benchmark_group("segmenter");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("parse_8x1000", |b| {
        b.iter(|| {
            MultiTableImporter::new(&config)
                .parse(black_box(&input))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_relationship_scan(c: &mut Criterion) {
    let config = ModellerConfig::default();
    let mut group = c.benchmark_group("relationship_scan");

    for tables in [4, 8, 16] {
        let input = generate_input(tables, 500);
        let loaded = MultiTableImporter::new(&config).parse(&input).unwrap();
        let types = TypeInferencer::new(&config);
        let profiles: Vec<TableProfile> = loaded
            .values()
            .map(|t| TableProfile::new(t, types.infer_table(t)))
            .collect();
        let keys = KeyInferencer::new(&config);

        group.bench_with_input(BenchmarkId::from_parameter(tables), &profiles, |b, profiles| {
            b.iter(|| keys.discover_relationships(black_box(profiles)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_relationship_scan);
criterion_main!(benches);
