//! Benchmarks for sampling animations.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use blinc_motion::{
    Decay, DecayConfig, Easing, LoopConfig, ManualClock, Position, Registry, Spring, SpringConfig,
    SpringVec2, SpringVec2Config, AnimationOptions, Timeline, TimelineConfig, Tween, TweenConfig,
    Vec2,
};
use std::rc::Rc;

fn bench_primitives(c: &mut Criterion) {
    let clock = ManualClock::new(0.0);

    let tween = Tween::new(
        TweenConfig::new(0.0, 100.0, 0.5)
            .easing(Easing::EASE_IN_OUT)
            .looping(LoopConfig::new().infinite().alternate()),
        &clock,
    )
    .unwrap();
    c.bench_function("tween_sample_bezier", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.016;
            black_box(tween.sample_at(black_box(t)))
        })
    });

    let spring = Spring::new(SpringConfig::wobbly(), &clock).unwrap();
    c.bench_function("spring_sample_underdamped", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.016;
            black_box(spring.sample_at(black_box(t % 2.0)))
        })
    });

    let overdamped = Spring::new(SpringConfig::new(0.0, 1.0).physics(100.0, 40.0, 1.0), &clock).unwrap();
    c.bench_function("spring_sample_overdamped", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.016;
            black_box(overdamped.sample_at(black_box(t % 2.0)))
        })
    });

    let decay = Decay::new(DecayConfig::new(0.0, 2000.0), &clock).unwrap();
    c.bench_function("decay_sample", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.016;
            black_box(decay.sample_at(black_box(t % 5.0)))
        })
    });

    let spring2 = SpringVec2::spring(
        SpringVec2Config::new(Vec2::ZERO, Vec2::new(300.0, 600.0)).with_velocity(Vec2::new(-400.0, 900.0)),
        &clock,
    )
    .unwrap();
    c.bench_function("spring_vec2_sample", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t += 0.016;
            black_box(spring2.sample_at(black_box(t % 2.0)))
        })
    });
}

fn bench_timeline(c: &mut Criterion) {
    c.bench_function("timeline_sample_100_children", |b| {
        let clock = ManualClock::new(0.0);
        let mut timeline = Timeline::new(TimelineConfig::default(), &clock).unwrap();
        // Alternate sequential and overlapping placements
        for i in 0..100 {
            let tween = Tween::new(TweenConfig::new(0.0, i as f64, 0.3), &clock).unwrap();
            let position = if i % 2 == 0 {
                Position::AfterPrevious(-0.1)
            } else {
                Position::WithPrevious(0.05)
            };
            timeline.add(tween, position).unwrap();
        }
        let duration = timeline.duration();

        let mut t = 0.0;
        b.iter(|| {
            t = (t + 0.016) % duration;
            black_box(timeline.sample_at(black_box(t)))
        })
    });
}

fn bench_registry(c: &mut Criterion) {
    c.bench_function("registry_tick_100_springs", |b| {
        let clock = Rc::new(ManualClock::new(0.0));
        let mut registry = Registry::new(clock.clone());
        for i in 0..100 {
            let spring = Spring::new(
                SpringConfig::new(0.0, 100.0).looping(LoopConfig::new().infinite()),
                &*clock,
            )
            .unwrap();
            registry
                .animate(format!("spring{}", i), spring, AnimationOptions::new())
                .unwrap();
        }

        b.iter(|| {
            clock.advance(0.016);
            black_box(registry.tick_all())
        })
    });
}

criterion_group!(benches, bench_primitives, bench_timeline, bench_registry);
criterion_main!(benches);
