use std::collections::HashMap;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use grime_engine::stroke::Stamp;
use grime_engine::{
    DirtSystem, LayerConfig, Rng, SilhouetteMask, StrokeConfig, StrokeSystem, DIRTY_EPSILON,
};

fn dirty_256() -> DirtSystem {
    let mask = Rc::new(SilhouetteMask::full(256));
    let layers = vec![LayerConfig::new("mold", 1.0, 1.0), LayerConfig::new("grease", 0.6, 0.8)];
    let mut dirt = DirtSystem::new(mask, 12.0, layers);
    let targets: HashMap<String, f32> =
        [("mold".to_string(), 0.6), ("grease".to_string(), 0.4)].into_iter().collect();
    dirt.init(&mut Rng::new(42), &targets);
    dirt
}

fn bench_init_256(c: &mut Criterion) {
    let mut dirt = dirty_256();
    let targets: HashMap<String, f32> =
        [("mold".to_string(), 0.6), ("grease".to_string(), 0.4)].into_iter().collect();

    c.bench_function("init_threshold_256", |b| {
        let mut seed = 0u32;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            dirt.init(&mut Rng::new(black_box(seed)), &targets);
        });
    });
}

fn bench_stamp(c: &mut Criterion) {
    let mut dirt = dirty_256();

    c.bench_function("apply_stamp_uv_r12", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let u = (i % 97) as f32 / 97.0;
            let v = (i % 89) as f32 / 89.0;
            dirt.apply_stamp_uv(black_box(u), black_box(v), 0.01, 1.0);
        });
    });
}

fn bench_union_ratio(c: &mut Criterion) {
    let dirt = dirty_256();

    c.bench_function("union_dirty_ratio_256", |b| {
        b.iter(|| dirt.union_dirty_ratio(black_box(DIRTY_EPSILON)));
    });
}

fn bench_stroke(c: &mut Criterion) {
    c.bench_function("stroke_1000_moves", |b| {
        let mut stamps: Vec<Stamp> = Vec::with_capacity(4096);
        b.iter(|| {
            stamps.clear();
            let mut rng = Rng::new(1);
            let mut stroke = StrokeSystem::new(StrokeConfig::hose());
            stroke.handle_down(0.0, 0.0, 0.0, &mut rng, &mut stamps);
            for i in 1..1000 {
                let f = i as f32;
                stroke.handle_move(f * 1.3, (f * 0.05).sin() * 50.0, i as f64 * 8.0, &mut rng, &mut stamps);
            }
            stroke.handle_up(1300.0, 0.0, 8000.0, &mut rng, &mut stamps);
            black_box(stamps.len())
        });
    });
}

criterion_group!(benches, bench_init_256, bench_stamp, bench_union_ratio, bench_stroke);
criterion_main!(benches);
