use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pushbutton::animation::{plan_pressure, plan_transition};
use pushbutton::{AnimationState, ButtonConfig};

fn bench_plan_transition(c: &mut Criterion) {
    let config = ButtonConfig::default();
    let pairs = [
        (AnimationState::Off, AnimationState::PushOn),
        (AnimationState::PushOn, AnimationState::On),
        (AnimationState::On, AnimationState::PushOff),
        (AnimationState::PushOff, AnimationState::Off),
    ];

    c.bench_function("plan_transition_full_cycle", |b| {
        b.iter(|| {
            for (current, target) in pairs {
                black_box(plan_transition(
                    black_box(current),
                    black_box(target),
                    &config,
                ));
            }
        })
    });
}

fn bench_plan_pressure(c: &mut Criterion) {
    c.bench_function("plan_pressure", |b| {
        b.iter(|| black_box(plan_pressure(black_box(2.0))))
    });
}

criterion_group!(benches, bench_plan_transition, bench_plan_pressure);
criterion_main!(benches);
