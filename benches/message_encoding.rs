//! Benchmarks for record encoding and CSV loading
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sensor_replay::dataset::Dataset;
use sensor_replay::session::Message;
use sensor_replay::types::Record;

fn sensor_csv(rows: usize) -> String {
    let mut out = String::from("timestamp,dht_temp,dht_hum,soil,ds18_1\n");
    for i in 0..rows {
        out.push_str(&format!(
            "2024-05-01 {:02}:{:02}:{:02},{:.2},{},{},{:.2}\n",
            (i / 3600) % 24,
            (i / 60) % 60,
            i % 60,
            20.0 + (i % 50) as f64 * 0.1,
            50 + i % 20,
            300 + i % 100,
            18.0 + (i % 40) as f64 * 0.05,
        ));
    }
    out
}

fn sample_record(width: usize) -> Record {
    (0..width).fold(Record::default(), |record, i| {
        if i % 2 == 0 {
            record.with(format!("int_{}", i), i as i64 * 7)
        } else {
            record.with(format!("float_{}", i), i as f64 * 0.125)
        }
    })
}

fn bench_message_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_encode");

    for width in [5, 20, 100] {
        let record = sample_record(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &record, |b, record| {
            b.iter(|| Message::encode(black_box(record)))
        });
    }

    group.finish();
}

fn bench_csv_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_load");

    for rows in [100, 1_000, 10_000] {
        let csv = sensor_csv(rows);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| Dataset::from_reader(black_box(csv.as_bytes())))
        });
    }

    group.finish();
}

fn bench_full_replay_encoding(c: &mut Criterion) {
    let dataset = match Dataset::from_reader(sensor_csv(1_000).as_bytes()) {
        Ok(ds) => ds,
        Err(e) => panic!("bench fixture failed to load: {}", e),
    };

    c.bench_function("encode_1000_rows", |b| {
        b.iter(|| {
            dataset
                .records()
                .iter()
                .map(|r| Message::encode(r).len())
                .sum::<usize>()
        })
    });
}

criterion_group!(
    benches,
    bench_message_encode,
    bench_csv_load,
    bench_full_replay_encoding
);
criterion_main!(benches);
