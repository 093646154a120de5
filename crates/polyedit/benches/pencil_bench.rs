//! Criterion benchmarks for the stroke simplifier and a full pencil gesture.
//! Focus sizes: samples per stroke in {100, 1000, 5000}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use polyedit::api::{EditCfg, Editor, Event, Point, ScaledView, Stroke};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Wobbly spiral: many small turns, a few real corners.
fn samples(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=n)
        .map(|k| {
            let t = k as f64 / n as f64 * std::f64::consts::TAU;
            let r = 100.0 + 40.0 * t;
            Point::new(r * t.cos(), r * t.sin()) + Point::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5))
        })
        .collect()
}

fn bench_pencil(c: &mut Criterion) {
    let mut group = c.benchmark_group("pencil");
    for &n in &[100usize, 1000, 5000] {
        group.bench_with_input(BenchmarkId::new("stroke_feed", n), &n, |b, &n| {
            b.iter_batched(
                || samples(n, 7),
                |pts| {
                    let guard = |_: Point, _: Point, _: bool| true;
                    let mut stroke = Stroke::new(Point::new(100.0, 0.0), None, 15f64.to_radians(), 20.0);
                    let mut kept = 0usize;
                    for p in pts {
                        kept += stroke.feed(p, &guard).is_some() as usize;
                    }
                    kept
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("editor_gesture", n), &n, |b, &n| {
            let view = ScaledView::identity();
            b.iter_batched(
                || (Editor::new(EditCfg::default()), samples(n, 11)),
                |(mut ed, pts)| {
                    ed.handle(&view, Event::down(Point::new(100.0, 0.0)));
                    for p in &pts {
                        ed.handle(&view, Event::drag(*p));
                    }
                    if let Some(end) = pts.last() {
                        ed.handle(&view, Event::up(*end));
                    }
                    ed
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pencil);
criterion_main!(benches);
