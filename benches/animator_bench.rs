//! Per-tick animator cost: sampling, blending and hierarchy composition.
//!
//! Run with `cargo bench --bench animator_bench`.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Quat, Vec3};

use imdl::animation::clip::{AnimationChannel, AnimationClip};
use imdl::assets::format::NodeInfo;
use imdl::assets::{ImdlLoader, ImdlWriter, Model, ModelData};
use imdl::{Animator, LoopMode};

const NODE_COUNT: usize = 128;
const KEY_COUNT: usize = 60;

/// A branching skeleton: node `i` hangs under node `(i - 1) / 2`.
fn skeleton() -> Vec<NodeInfo> {
    (0..NODE_COUNT)
        .map(|i| NodeInfo {
            parent_index: if i == 0 { -1 } else { ((i - 1) / 2) as i32 },
            default_translation: Vec3::new(0.0, 0.1, 0.0),
            ..NodeInfo::default()
        })
        .collect()
}

fn clip(name: &str, phase: f32) -> AnimationClip {
    let times: Vec<f32> = (0..KEY_COUNT).map(|k| k as f32 / 30.0).collect();
    let rotations = (0..NODE_COUNT as u32)
        .map(|node| {
            let values = times
                .iter()
                .map(|t| Quat::from_rotation_z((t * 6.0 + phase + node as f32 * 0.1).sin() * 0.3))
                .collect();
            AnimationChannel::new(node, times.clone(), values)
        })
        .collect();
    let translations = vec![AnimationChannel::new(
        0,
        times.clone(),
        times.iter().map(|t| Vec3::new(*t, 0.0, 0.0)).collect(),
    )];
    AnimationClip::from_channels(name, translations, rotations, vec![])
}

fn model_data() -> ModelData {
    ModelData {
        nodes: skeleton(),
        animations: vec![clip("walk", 0.0), clip("run", 1.5)],
        ..ModelData::default()
    }
}

fn bench_update(c: &mut Criterion) {
    let model = Arc::new(Model::from_data(model_data()).expect("valid synthetic model"));

    c.bench_function("animator_update_single", |b| {
        let mut animator = Animator::new(Arc::clone(&model));
        animator.play(0, LoopMode::Loop);
        b.iter(|| {
            animator.update(black_box(1.0 / 60.0));
            black_box(animator.world_matrices());
        });
    });

    c.bench_function("animator_update_blend", |b| {
        let mut animator = Animator::new(Arc::clone(&model));
        animator.play(0, LoopMode::Loop);
        b.iter(|| {
            // Restart the fade so every iteration blends.
            animator.cross_fade(1, 10.0);
            animator.update(black_box(1.0 / 60.0));
            black_box(animator.world_matrices());
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = ImdlWriter::encode(&model_data());
    let loader = ImdlLoader::default();

    c.bench_function("imdl_load_from_bytes", |b| {
        b.iter(|| loader.load_from_bytes(black_box(&bytes)).expect("valid file"));
    });
}

criterion_group!(benches, bench_update, bench_decode);
criterion_main!(benches);
