use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use psp_blob_codec::{BlobCodec, BlobData};

const DAY_COUNT: usize = 7;

/// A full week at 15-minute resolution (96 bins/day), slowly varying speeds.
fn generate_full_week(resolution: u16) -> BlobData {
    let bins_per_day = (1440 / resolution) as usize;
    let mut days: [Option<Vec<f64>>; DAY_COUNT] = Default::default();
    for (d, day) in days.iter_mut().enumerate() {
        let speeds: Vec<f64> = (0..bins_per_day)
            .map(|b| 30.0 + 25.0 * ((d * bins_per_day + b) as f64 * 0.05).sin().abs())
            .collect();
        *day = Some(speeds);
    }
    BlobData::with_profiles(81, 87, resolution, days).unwrap()
}

/// A single present day, the rest absent (best case for the days-bitset).
fn generate_sparse_week(resolution: u16) -> BlobData {
    let bins_per_day = (1440 / resolution) as usize;
    let mut days: [Option<Vec<f64>>; DAY_COUNT] = Default::default();
    days[0] = Some(vec![60.0; bins_per_day]);
    BlobData::with_profiles(81, 87, resolution, days).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for resolution in [60u16, 15, 5] {
        let bins_per_day = (1440 / resolution) as usize;
        let data = generate_full_week(resolution);
        group.throughput(Throughput::Elements((bins_per_day * DAY_COUNT) as u64));

        group.bench_with_input(
            BenchmarkId::new("full_week", resolution),
            &data,
            |b, data| {
                b.iter(|| black_box(BlobCodec::encode(black_box(data)).unwrap()));
            },
        );
    }

    for resolution in [60u16, 15, 5] {
        let data = generate_sparse_week(resolution);
        group.throughput(Throughput::Elements((1440 / resolution) as u64));

        group.bench_with_input(
            BenchmarkId::new("sparse_week", resolution),
            &data,
            |b, data| {
                b.iter(|| black_box(BlobCodec::encode(black_box(data)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for resolution in [60u16, 15, 5] {
        let bins_per_day = (1440 / resolution) as usize;
        let data = generate_full_week(resolution);
        let bytes = BlobCodec::encode(&data).unwrap();
        group.throughput(Throughput::Elements((bins_per_day * DAY_COUNT) as u64));

        group.bench_with_input(
            BenchmarkId::new("full_week", resolution),
            &bytes,
            |b, bytes| {
                b.iter(|| black_box(BlobCodec::decode(black_box(bytes)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_means_only_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("means_only_roundtrip");
    let data = BlobData::means_only(81, 87);
    group.throughput(Throughput::Elements(1));

    group.bench_function("roundtrip", |b| {
        b.iter(|| {
            let bytes = BlobCodec::encode(black_box(&data)).unwrap();
            black_box(BlobCodec::decode(black_box(&bytes)).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_means_only_roundtrip);
criterion_main!(benches);
