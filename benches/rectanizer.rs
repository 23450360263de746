use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rastkit::rectanizer::{self, RectanizerKind};

/// Glyph-like sizes, repeated until the atlas fills.
fn sizes() -> Vec<(i32, i32)> {
    (0..2_000)
        .map(|i| (4 + (i * 7) % 29, 6 + (i * 13) % 23))
        .collect()
}

fn bench_fill(c: &mut Criterion) {
    let sizes = sizes();
    for (kind, name) in [
        (RectanizerKind::Pow2, "rectanizer_fill_pow2"),
        (RectanizerKind::Skyline, "rectanizer_fill_skyline"),
        (RectanizerKind::Optimized, "rectanizer_fill_optimized"),
    ] {
        let mut atlas = rectanizer::with_kind(kind, 512, 512);
        c.bench_function(name, |b| {
            b.iter(|| {
                atlas.reset();
                for &(w, h) in &sizes {
                    black_box(atlas.add_rect(w, h));
                }
                black_box(atlas.percent_full())
            })
        });
    }
}

criterion_group!(rectanizer_benches, bench_fill);
criterion_main!(rectanizer_benches);
