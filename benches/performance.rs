use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tinypool_mem::{BucketDefinition, ObjectPool, SegmentedPool};

fn bench_object_pool(c: &mut Criterion) {
    let pool = ObjectPool::new(|| vec![0u8; 4096]);
    c.bench_function("object_pool_checkout_release", |b| {
        b.iter(|| {
            let lease = pool.get_object();
            black_box(lease.value().unwrap().len());
        })
    });

    c.bench_function("fresh_allocation_baseline", |b| {
        b.iter(|| {
            let buf = vec![0u8; 4096];
            black_box(buf.len());
        })
    });
}

fn bench_segmented_pool(c: &mut Criterion) {
    let pool: SegmentedPool<u8> = SegmentedPool::new(
        [64, 256, 1024, 4096, 16384]
            .into_iter()
            .map(|size| BucketDefinition::with_capacity(size, 16).unwrap()),
    )
    .unwrap();

    c.bench_function("segmented_pool_mixed_sizes", |b| {
        let mut requested = 1usize;
        b.iter(|| {
            requested = (requested * 31 + 7) % pool.max_size() + 1;
            let lease = pool.get_buffer(requested).unwrap();
            black_box(lease.value().unwrap().len());
        })
    });
}

criterion_group!(benches, bench_object_pool, bench_segmented_pool);
criterion_main!(benches);
