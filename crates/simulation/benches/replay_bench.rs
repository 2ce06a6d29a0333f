//! Criterion benchmarks for recording playback.
//!
//! Benchmarks:
//!   - full playback of 1K / 10K events dispatched in a single advance
//!   - tick-by-tick playback of 1K events spread over 20 seconds
//!   - handler registry dispatch with 1 and 8 handlers per kind
//!
//! Budget: full playback of 10K events < 2ms.
//!
//! Run with: cargo bench -p simulation --bench replay_bench

use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use simulation::clock::SimClock;
use simulation::effects::{AgentEffect, EffectQueue};
use simulation::replay::{
    CompletionSink, DispatchMode, EventPayload, HandlerContext, HandlerRegistry, Replayer,
    TimedEvent,
};

struct NullSink;

impl CompletionSink for NullSink {
    fn notify_completed(&mut self, _agent: Entity) {}
}

/// A frozen-ready recording of `count` movement events, `step` seconds apart.
fn recorded_replayer(count: usize, step: f64) -> Replayer {
    let agent = Entity::from_raw(1);
    let mut replayer = Replayer::new(0.0);
    replayer.register_handler("HorzVertAxis", |ctx, event| {
        if let Some(axes) = event.payload().movement() {
            ctx.effects.push(AgentEffect::Translate {
                agent: ctx.source,
                delta: axes,
            });
        }
    });

    let mut clock = SimClock::default();
    let mut effects = EffectQueue::default();
    for _ in 0..count {
        clock.advance(step);
        let mut ctx = HandlerContext::new(agent, DispatchMode::Live, &mut effects);
        let event = TimedEvent::capture(
            &clock,
            "HorzVertAxis",
            EventPayload::Movement {
                horizontal: 1.0,
                vertical: 0.0,
            },
        );
        let _ = replayer.record_input(event, &mut ctx);
    }
    replayer.freeze();
    replayer
}

// ---------------------------------------------------------------------------
// Benchmark: playback
// ---------------------------------------------------------------------------

fn bench_full_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_full_playback");
    let agent = Entity::from_raw(1);

    for count in [1_000usize, 10_000] {
        // Every event is due well before this.
        let end = count as f64;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut replayer = recorded_replayer(count, 0.001);
            let mut effects = EffectQueue::default();
            b.iter(|| {
                replayer.begin_replay(agent, 0.0, &mut NullSink);
                let mut ctx = HandlerContext::new(agent, DispatchMode::Replay, &mut effects);
                let dispatched = replayer.advance(black_box(end), &mut ctx, &mut NullSink);
                effects.drain();
                black_box(dispatched.len())
            });
        });
    }

    group.finish();
}

fn bench_tick_by_tick_playback(c: &mut Criterion) {
    let agent = Entity::from_raw(1);
    let mut replayer = recorded_replayer(1_000, 0.02);

    c.bench_function("replay_tick_by_tick_1k", |b| {
        let mut effects = EffectQueue::default();
        b.iter(|| {
            let mut clock = SimClock::default();
            replayer.begin_replay(agent, 0.0, &mut NullSink);
            while replayer.is_replaying() {
                clock.advance(0.02);
                let mut ctx = HandlerContext::new(agent, DispatchMode::Replay, &mut effects);
                black_box(replayer.advance(clock.elapsed(), &mut ctx, &mut NullSink));
                effects.drain();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Benchmark: registry dispatch
// ---------------------------------------------------------------------------

fn bench_registry_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_dispatch");
    let agent = Entity::from_raw(1);
    let event = TimedEvent::capture(
        &SimClock::starting_at(1.0),
        "Fire1",
        EventPayload::Position(Vec2::ONE),
    );

    for handlers in [1usize, 8] {
        let mut registry = HandlerRegistry::default();
        for _ in 0..handlers {
            registry.register("Fire1", |ctx, event| {
                if let Some(at) = event.payload().position() {
                    ctx.effects.push(AgentEffect::SpawnMarker {
                        source: ctx.source,
                        at,
                        lifetime: 1.0,
                    });
                }
            });
        }

        group.bench_with_input(BenchmarkId::from_parameter(handlers), &handlers, |b, _| {
            let mut effects = EffectQueue::default();
            b.iter(|| {
                let mut ctx = HandlerContext::new(agent, DispatchMode::Replay, &mut effects);
                let result = registry.dispatch(&mut ctx, black_box(&event));
                effects.drain();
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_playback,
    bench_tick_by_tick_playback,
    bench_registry_dispatch
);
criterion_main!(benches);
