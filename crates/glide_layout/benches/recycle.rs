use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glide_layout::{RingGeometry, SlotRing};

fn bench_recycle(c: &mut Criterion) {
    let items: Vec<u32> = (0..100_000).collect();
    let geometry = RingGeometry::list(items.len());

    c.bench_function("recycle_sweep_1px", |b| {
        let mut ring = SlotRing::new(12, 40.0);
        let mut offset = 0.0f32;
        b.iter(|| {
            offset -= 1.0;
            if offset < -3_000_000.0 {
                offset = 0.0;
            }
            black_box(ring.recycle(black_box(offset), geometry, &items))
        })
    });

    c.bench_function("recycle_jump", |b| {
        let mut ring = SlotRing::new(12, 40.0);
        let mut row = 0u32;
        b.iter(|| {
            row = (row + 997) % 99_000;
            black_box(ring.recycle(-(row as f32) * 40.0, geometry, &items))
        })
    });
}

criterion_group!(benches, bench_recycle);
criterion_main!(benches);
