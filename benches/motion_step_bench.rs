use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xpilot_core::registry::{AircraftRegistry, Identity};
use xpilot_core::types::{Attitude, Callsign, Pose, PositionFix};
use xpilot_core::{MotionEngine, TerrainProbe};

struct FlatTerrain;

impl TerrainProbe for FlatTerrain {
    fn probe(&self, _latitude: f64, _longitude: f64) -> Option<f64> {
        Some(0.0)
    }
}

fn populated_registry(count: usize) -> AircraftRegistry {
    let mut registry = AircraftRegistry::new();
    let now = Instant::now();
    for i in 0..count {
        let pose = Pose {
            position: PositionFix {
                latitude: 33.9 + i as f64 * 0.001,
                longitude: -118.4,
                altitude_true: 2000.0,
                altitude_agl: Some(2000.0),
            },
            attitude: Attitude {
                pitch: 0.0,
                bank: 0.0,
                heading: 90.0,
            },
            nose_wheel_angle: 0.0,
        };
        registry.add(Callsign::new(&format!("N{i}")), Identity::default(), pose, now);
    }
    registry
}

fn bench_step_50_aircraft(c: &mut Criterion) {
    let terrain = FlatTerrain;
    c.bench_function("motion_engine_step_50_aircraft", |b| {
        b.iter_batched(
            || (MotionEngine::new(), populated_registry(50)),
            |(mut engine, mut registry)| {
                let now = Instant::now();
                engine.step(black_box(&mut registry), black_box(1.0 / 60.0), now, &terrain);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_step_50_aircraft);
criterion_main!(benches);
