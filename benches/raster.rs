use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paladin::present::expand_rgba8888;
use paladin::util::Rng;
use paladin::{Fixed16, Palette, RasterContext, Rect};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 160;

fn context() -> RasterContext {
    RasterContext::new(WIDTH, HEIGHT, Palette::pico8()).unwrap()
}

/// Benchmark: full-canvas clear
fn bench_clear(c: &mut Criterion) {
    let mut ctx = context();
    c.bench_function("clear_320x160", |b| b.iter(|| ctx.clear(black_box(3))));
}

/// Benchmark: random lines, some crossing the canvas edges
fn bench_lines(c: &mut Criterion) {
    let mut ctx = context();
    let mut rng = Rng::new(42);
    let lines: Vec<(i32, i32, i32, i32)> = (0..256)
        .map(|_| {
            (
                rng.range_i32(-40, 360),
                rng.range_i32(-40, 200),
                rng.range_i32(-40, 360),
                rng.range_i32(-40, 200),
            )
        })
        .collect();

    c.bench_function("line_x256", |b| {
        b.iter(|| {
            for &(x0, y0, x1, y1) in &lines {
                ctx.line(x0, y0, x1, y1, 7);
            }
        })
    });
}

/// Benchmark: filled triangles at increasing size
fn bench_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangle");
    for size in [8, 32, 128] {
        let mut ctx = context();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &s| {
            b.iter(|| ctx.triangle(black_box(10), 5, 10 + s, 5 + s / 3, 10 + s / 2, 5 + s, 9))
        });
    }
    group.finish();
}

/// Benchmark: filled circles with and without clipping
fn bench_circles(c: &mut Criterion) {
    let mut ctx = context();
    c.bench_function("circle_fill_r40", |b| b.iter(|| ctx.circle_fill(160, 80, black_box(40), 11)));

    let mut ctx = context();
    ctx.set_clip(Rect::new(100, 40, 220, 120));
    c.bench_function("circle_fill_r40_clipped", |b| {
        b.iter(|| ctx.circle_fill(100, 40, black_box(40), 11))
    });
}

/// Benchmark: fixed-point multiply and divide chains
fn bench_fixed(c: &mut Criterion) {
    let values: Vec<Fixed16> = (1..=1024).map(|i| Fixed16::from_raw(i * 97)).collect();
    c.bench_function("fixed_mul_div_x1024", |b| {
        b.iter(|| {
            let mut acc = Fixed16::ONE;
            for &v in &values {
                acc = (acc * v) / (v + Fixed16::ONE);
            }
            black_box(acc)
        })
    });
}

/// Benchmark: index to RGBA8888 expansion for presentation
fn bench_present(c: &mut Criterion) {
    let mut ctx = context();
    ctx.circle_fill(160, 80, 60, 8);
    let mut out = Vec::new();
    c.bench_function("expand_rgba8888_320x160", |b| {
        b.iter(|| expand_rgba8888(black_box(&ctx.frame()), &mut out))
    });
}

criterion_group!(
    benches,
    bench_clear,
    bench_lines,
    bench_triangles,
    bench_circles,
    bench_fixed,
    bench_present
);
criterion_main!(benches);
