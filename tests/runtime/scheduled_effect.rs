use std::time::Duration;

use bevy_celebration::effects::{EffectKind, EffectState, ScheduledEffect, fireworks_particle_count};
use bevy_celebration::palette::Palette;
use bevy_celebration::settings::{FireworksSettings, FlowerPetalsSettings};

use super::helpers::FixedRandom;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn fireworks() -> ScheduledEffect {
    ScheduledEffect::fireworks(&FireworksSettings::default(), Palette::default())
}

fn petals() -> ScheduledEffect {
    ScheduledEffect::flower_petals(&FlowerPetalsSettings::default(), Palette::default())
}

#[test]
fn new_effect_is_active_until_its_window_closes() {
    let effect = fireworks();
    assert_eq!(effect.kind(), EffectKind::Fireworks);
    assert_eq!(effect.state(), EffectState::Active { deadline: ms(5000) });
    assert_eq!(effect.interval(), ms(250));
    assert_eq!(effect.elapsed(), Duration::ZERO);
    assert_eq!(effect.ticks_emitted(), 0);
}

#[test]
fn nothing_is_emitted_before_the_first_interval() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let bursts = effect.advance(ms(249), &mut rng);
    assert!(bursts.is_empty());
    assert_eq!(effect.ticks_emitted(), 0);
}

#[test]
fn fireworks_tick_emits_a_left_and_a_right_burst() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.0, 0.0, 0.999, 0.999]);
    let bursts = effect.advance(ms(250), &mut rng);

    assert_eq!(bursts.len(), 2);
    let (left, right) = (&bursts[0], &bursts[1]);
    assert!((left.origin.x - 0.1).abs() < 1e-5);
    assert!((left.origin.y + 0.2).abs() < 1e-5);
    assert!((right.origin.x - 0.9).abs() < 1e-3);
    assert!((right.origin.y - 0.799).abs() < 1e-3);
}

#[test]
fn fireworks_bursts_share_the_fixed_parameters() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.3, 0.6]);
    for burst in effect.advance(ms(1000), &mut rng) {
        assert_eq!(burst.start_velocity, 30.0);
        assert_eq!(burst.spread, 360.0);
        assert_eq!(burst.ticks, 60);
        assert_eq!(burst.z_index, 0);
        assert!(burst.shapes.is_empty());
        assert_eq!(burst.colors, Palette::default());
    }
}

#[test]
fn fireworks_origins_stay_within_their_ranges() {
    let samples: Vec<f32> = (0..40).map(|i| i as f32 / 40.0).collect();
    let mut rng = FixedRandom::new(&samples);
    let mut effect = fireworks();
    let bursts = effect.advance(ms(6000), &mut rng);

    for pair in bursts.chunks(2) {
        let (left, right) = (&pair[0], &pair[1]);
        assert!((0.1..0.3).contains(&left.origin.x), "left x {}", left.origin.x);
        assert!((0.7..0.9).contains(&right.origin.x), "right x {}", right.origin.x);
        for burst in pair {
            assert!((-0.2..0.8).contains(&burst.origin.y), "y {}", burst.origin.y);
        }
    }
}

#[test]
fn fireworks_particle_count_decays_linearly() {
    let settings = FireworksSettings::default();
    assert_eq!(fireworks_particle_count(&settings, Duration::ZERO), 50.0);
    assert!((fireworks_particle_count(&settings, ms(250)) - 47.5).abs() < 1e-4);
    assert!((fireworks_particle_count(&settings, ms(2500)) - 25.0).abs() < 1e-4);
    assert!((fireworks_particle_count(&settings, ms(4750)) - 2.5).abs() < 1e-4);
    assert_eq!(fireworks_particle_count(&settings, ms(5000)), 0.0);
    assert_eq!(fireworks_particle_count(&settings, ms(7000)), 0.0);
}

#[test]
fn fireworks_particle_count_is_strictly_decreasing() {
    let settings = FireworksSettings::default();
    let counts: Vec<f32> = (0..5000)
        .step_by(50)
        .map(|t| fireworks_particle_count(&settings, ms(t)))
        .collect();
    for window in counts.windows(2) {
        assert!(window[1] < window[0], "{} should be below {}", window[1], window[0]);
    }
}

#[test]
fn fireworks_emitted_counts_shrink_every_tick() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let bursts = effect.advance(ms(6000), &mut rng);

    let per_tick: Vec<f32> = bursts.chunks(2).map(|pair| pair[0].particle_count).collect();
    assert!((per_tick[0] - 47.5).abs() < 1e-4);
    for window in per_tick.windows(2) {
        assert!(window[1] < window[0]);
    }
    for pair in bursts.chunks(2) {
        assert_eq!(pair[0].particle_count, pair[1].particle_count);
    }
}

#[test]
fn fireworks_stop_at_the_deadline() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let bursts = effect.advance(ms(5000), &mut rng);

    assert_eq!(effect.ticks_emitted(), 19);
    assert_eq!(bursts.len(), 38);
    assert!(effect.is_terminated());
}

#[test]
fn fireworks_never_exceed_twenty_ticks() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let mut total = 0;
    for _ in 0..1000 {
        total += effect.advance(ms(16), &mut rng).len();
    }
    assert!(effect.ticks_emitted() <= 20);
    assert!(total <= 40);
    assert!(effect.is_terminated());
}

#[test]
fn terminated_effect_emits_nothing_more() {
    let mut effect = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    effect.advance(ms(5000), &mut rng);
    assert!(effect.is_terminated());

    let bursts = effect.advance(ms(10_000), &mut rng);
    assert!(bursts.is_empty());
    assert_eq!(effect.state(), EffectState::Terminated);
}

#[test]
fn long_frames_replay_every_missed_tick_in_order() {
    let mut stepped = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let mut small_steps = Vec::new();
    for _ in 0..100 {
        small_steps.extend(stepped.advance(ms(10), &mut rng));
    }

    let mut jumped = fireworks();
    let mut rng = FixedRandom::new(&[0.5]);
    let one_jump = jumped.advance(ms(1000), &mut rng);

    assert_eq!(one_jump.len(), 8);
    assert_eq!(small_steps, one_jump);
}

#[test]
fn petals_emit_two_small_bursts_from_opposite_edges() {
    let mut effect = petals();
    let mut rng = FixedRandom::new(&[0.5]);
    let bursts = effect.advance(ms(150), &mut rng);

    assert_eq!(bursts.len(), 2);
    let (left, right) = (&bursts[0], &bursts[1]);
    assert_eq!(left.particle_count, 2.0);
    assert_eq!(left.angle, 60.0);
    assert_eq!(left.origin.x, 0.0);
    assert_eq!(right.particle_count, 2.0);
    assert_eq!(right.angle, 120.0);
    assert_eq!(right.origin.x, 1.0);
    for burst in &bursts {
        assert_eq!(burst.spread, 55.0);
        assert_eq!(burst.origin.y, 0.5);
    }
}

#[test]
fn petals_emit_on_the_deadline_tick_and_stop_after_it() {
    let mut effect = petals();
    let mut rng = FixedRandom::new(&[0.5]);

    let bursts = effect.advance(ms(3000), &mut rng);
    assert_eq!(effect.ticks_emitted(), 20);
    assert_eq!(bursts.len(), 40);
    assert!(!effect.is_terminated());

    let bursts = effect.advance(ms(150), &mut rng);
    assert!(bursts.is_empty());
    assert!(effect.is_terminated());
}

#[test]
fn petals_never_exceed_twenty_ticks() {
    let mut effect = petals();
    let mut rng = FixedRandom::new(&[0.5]);
    for _ in 0..500 {
        effect.advance(ms(33), &mut rng);
    }
    assert_eq!(effect.ticks_emitted(), 20);
    assert!(effect.is_terminated());
}

#[test]
fn head_start_counts_towards_the_first_tick() {
    let mut effect = petals().with_head_start(ms(100));
    let mut rng = FixedRandom::new(&[0.5]);
    assert!(effect.advance(ms(40), &mut rng).is_empty());
    assert_eq!(effect.advance(ms(10), &mut rng).len(), 2);
}

#[test]
fn zero_interval_is_clamped() {
    let settings = FlowerPetalsSettings {
        interval_ms: 0,
        duration_ms: 10,
        ..Default::default()
    };
    let mut effect = ScheduledEffect::flower_petals(&settings, Palette::default());
    let mut rng = FixedRandom::new(&[0.5]);

    assert_eq!(effect.interval(), ms(1));
    let bursts = effect.advance(ms(20), &mut rng);
    assert_eq!(bursts.len(), 20);
    assert!(effect.is_terminated());
}

#[test]
fn zero_duration_fireworks_terminate_on_first_tick() {
    let settings = FireworksSettings {
        duration_ms: 0,
        ..Default::default()
    };
    let mut effect = ScheduledEffect::fireworks(&settings, Palette::default());
    let mut rng = FixedRandom::new(&[0.5]);
    assert!(effect.advance(ms(250), &mut rng).is_empty());
    assert!(effect.is_terminated());
}
