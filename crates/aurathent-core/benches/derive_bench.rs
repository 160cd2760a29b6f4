//! # Derivation Benchmarks
//!
//! Performance benchmarks for aurathent-core derivations and engine flows.
//!
//! Run with: `cargo bench -p aurathent-core`

use aurathent_core::{
    DerivationInput, Engine, convert_experience_to_mana, detect_aura_shift, resolve_paradox_chain,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Engine with `size` stored memories for one owner.
fn engine_with_memories(size: usize) -> Engine {
    let mut engine = Engine::new();
    for i in 0..size {
        let note = format!("note {i}");
        let _ = engine.store_memory("bench", "joy", "honor", &note);
    }
    engine
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_pure_derivations(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivations");

    group.bench_function("mana", |b| {
        b.iter(|| black_box(convert_experience_to_mana(black_box("gratitude"), black_box("grace"))));
    });
    group.bench_function("aura", |b| {
        b.iter(|| black_box(detect_aura_shift(black_box(120.0), Some("origin"))));
    });
    group.bench_function("paradox", |b| {
        b.iter(|| black_box(resolve_paradox_chain(black_box("humility"), black_box("pride"))));
    });

    group.finish();
}

fn bench_sanctify(c: &mut Criterion) {
    let input = DerivationInput::new("awe", "truth").with_breath_cycle(3);

    c.bench_function("sanctify_in_memory", |b| {
        let mut engine = Engine::new();
        b.iter(|| black_box(engine.sanctify("bench", &input)));
    });
}

fn bench_recent_memories(c: &mut Criterion) {
    let mut group = c.benchmark_group("recent_memories");

    for size in [100, 1000, 10000].iter() {
        let engine = engine_with_memories(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(engine.recent_memories("bench", 5)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pure_derivations,
    bench_sanctify,
    bench_recent_memories
);
criterion_main!(benches);
