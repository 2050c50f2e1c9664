//! Benchmarks for per-frame simulation steps.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glimmer::{Dimensions, EffectiveConfig, InputBus, Knobs, PixelSurface, RecordingSurface, Registry, SimState};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// A session that has already run a while, so emitters and bolts are populated.
fn warmed(index: usize, surface: &mut RecordingSurface) -> (EffectiveConfig, SimState, InputBus) {
    let registry = Registry::builtin();
    let descriptor = registry.get(index).expect("builtin index");
    let config = EffectiveConfig::new(descriptor, Knobs::default(), 42);
    let mut input = InputBus::new();
    let mut state = descriptor
        .kind
        .init(Dimensions::new(WIDTH as f32, HEIGHT as f32), &config, &mut input)
        .expect("builtin init");
    for _ in 0..120 {
        surface.clear();
        state.step(&config, surface, &mut input);
    }
    (config, state, input)
}

fn bench_step_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_recording");
    let registry = Registry::builtin();

    for (index, descriptor) in registry.iter().enumerate() {
        let mut surface = RecordingSurface::new(WIDTH as f32, HEIGHT as f32);
        let (config, mut state, mut input) = warmed(index, &mut surface);
        group.bench_with_input(BenchmarkId::from_parameter(descriptor.name), &index, |b, _| {
            b.iter(|| {
                surface.clear();
                state.step(black_box(&config), &mut surface, &mut input);
            })
        });
    }

    group.finish();
}

fn bench_step_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_raster");
    group.sample_size(20);
    let registry = Registry::builtin();

    // One of each family.
    for name in ["Wave Pool", "Spiral Galaxy", "Star Field", "Fireworks", "Mandala", "Lightning Orbs"] {
        let Some(index) = registry.iter().position(|d| d.name.ends_with(name)) else {
            continue;
        };
        let mut recording = RecordingSurface::new(WIDTH as f32, HEIGHT as f32);
        let (config, mut state, mut input) = warmed(index, &mut recording);
        let mut surface = PixelSurface::new(WIDTH, HEIGHT).expect("raster surface");

        group.bench_with_input(BenchmarkId::from_parameter(name), &index, |b, _| {
            b.iter(|| state.step(black_box(&config), &mut surface, &mut input))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step_recording, bench_step_raster);
criterion_main!(benches);
