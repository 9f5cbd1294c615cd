use std::time::Duration;

use bevy::prelude::*;

use crate::burst::BurstConfig;
use crate::facility::{Facility, emit_to_world};
use crate::palette::Palette;
use crate::random::{CelebrationRng, RandomSource};
use crate::settings::{
    CelebrationSettings, FireworksSettings, FlowerPetalsSettings, HeartBurstSettings,
};
use crate::shapes::HEART;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// The effects a celebration is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// One burst of hearts from the bottom of the screen.
    HeartBurst,
    /// Shrinking bursts from the left and right of the screen.
    Fireworks,
    /// Petals drifting in from both edges.
    FlowerPetals,
    /// All three of the above, layered.
    Celebration,
}

/// Lifecycle of a [`ScheduledEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    /// Still ticking. `deadline` is measured from the start of the effect.
    Active {
        /// When the effect window closes.
        deadline: Duration,
    },
    /// The effect has stopped for good and will never emit again.
    Terminated,
}

#[derive(Debug, Clone)]
enum Pattern {
    Fireworks(FireworksSettings),
    FlowerPetals(FlowerPetalsSettings),
}

/// A running, self-terminating repeating effect.
///
/// Time only moves forward through [`advance`](Self::advance). Every tick is
/// evaluated at the instant it was due, so a long frame replays each missed
/// tick in order. Once the deadline has passed the effect switches to
/// [`EffectState::Terminated`] and the entity carrying it is despawned.
#[derive(Component, Debug, Clone)]
pub struct ScheduledEffect {
    pattern: Pattern,
    palette: Palette,
    state: EffectState,
    elapsed: Duration,
    next_tick: Duration,
    interval: Duration,
    duration: Duration,
    ticks_emitted: u32,
}

impl ScheduledEffect {
    /// Fireworks, with bursts shrinking linearly to nothing over the window.
    pub fn fireworks(settings: &FireworksSettings, palette: Palette) -> Self {
        Self::new(
            Pattern::Fireworks(settings.clone()),
            palette,
            settings.duration_ms,
            settings.interval_ms,
        )
    }

    /// Petals from both edges of the screen.
    pub fn flower_petals(settings: &FlowerPetalsSettings, palette: Palette) -> Self {
        Self::new(
            Pattern::FlowerPetals(settings.clone()),
            palette,
            settings.duration_ms,
            settings.interval_ms,
        )
    }

    fn new(pattern: Pattern, palette: Palette, duration_ms: u64, interval_ms: u64) -> Self {
        let duration = Duration::from_millis(duration_ms);
        let interval = Duration::from_millis(interval_ms).max(MIN_INTERVAL);
        Self {
            pattern,
            palette,
            state: EffectState::Active { deadline: duration },
            elapsed: Duration::ZERO,
            next_tick: interval,
            interval,
            duration,
            ticks_emitted: 0,
        }
    }

    /// Starts the effect clock at `elapsed` instead of zero.
    pub fn with_head_start(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Which effect this is.
    pub fn kind(&self) -> EffectKind {
        match self.pattern {
            Pattern::Fireworks(_) => EffectKind::Fireworks,
            Pattern::FlowerPetals(_) => EffectKind::FlowerPetals,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EffectState {
        self.state
    }

    /// Returns `true` once the effect has stopped.
    pub fn is_terminated(&self) -> bool {
        self.state == EffectState::Terminated
    }

    /// Time since the effect started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Length of the effect window.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time between two ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks that emitted bursts so far.
    pub fn ticks_emitted(&self) -> u32 {
        self.ticks_emitted
    }

    /// Moves the effect clock forward by `delta` and returns the bursts of
    /// every tick that came due, in order.
    pub fn advance(&mut self, delta: Duration, rng: &mut dyn RandomSource) -> Vec<BurstConfig> {
        self.elapsed += delta;

        let mut bursts = Vec::new();
        while let EffectState::Active { deadline } = self.state {
            if self.next_tick > self.elapsed {
                break;
            }
            let now = self.next_tick;
            self.next_tick += self.interval;

            let emitted = match &self.pattern {
                Pattern::Fireworks(settings) => {
                    let time_left = deadline.saturating_sub(now);
                    if time_left.is_zero() {
                        None
                    } else {
                        let count = fireworks_particle_count(settings, now);
                        Some(fireworks_bursts(settings, &self.palette, count, rng))
                    }
                }
                Pattern::FlowerPetals(settings) => {
                    if now > deadline {
                        None
                    } else {
                        Some(flower_petal_bursts(settings, &self.palette))
                    }
                }
            };

            match emitted {
                Some(tick_bursts) => {
                    self.ticks_emitted += 1;
                    trace!(
                        "{:?} tick {} at {:?}",
                        self.kind(),
                        self.ticks_emitted,
                        now
                    );
                    bursts.extend(tick_bursts);
                }
                None => self.state = EffectState::Terminated,
            }
        }
        bursts
    }
}

/// Particles per fireworks burst `elapsed` into the effect.
///
/// Decays linearly from `max_particles` at the start to zero at the deadline.
pub fn fireworks_particle_count(settings: &FireworksSettings, elapsed: Duration) -> f32 {
    let duration = Duration::from_millis(settings.duration_ms);
    let time_left = duration.saturating_sub(elapsed);
    if duration.is_zero() {
        return 0.0;
    }
    settings.max_particles * (time_left.as_secs_f32() / duration.as_secs_f32())
}

fn fireworks_bursts(
    settings: &FireworksSettings,
    palette: &Palette,
    particle_count: f32,
    rng: &mut dyn RandomSource,
) -> [BurstConfig; 2] {
    let mut side = |(min_x, max_x): (f32, f32)| {
        let x = rng.in_range(min_x, max_x);
        let y = rng.next_unit() - settings.y_lift;
        BurstConfig::with_palette(palette.clone())
            .with_particle_count(particle_count)
            .with_start_velocity(settings.start_velocity)
            .with_spread(settings.spread)
            .with_ticks(settings.ticks)
            .with_z_index(settings.z_index)
            .with_origin(Vec2::new(x, y))
    };
    let left = side(settings.left_x);
    let right = side(settings.right_x);
    [left, right]
}

fn flower_petal_bursts(settings: &FlowerPetalsSettings, palette: &Palette) -> [BurstConfig; 2] {
    let side = |angle: f32, x: f32| {
        BurstConfig::with_palette(palette.clone())
            .with_particle_count(settings.particle_count)
            .with_angle(angle)
            .with_spread(settings.spread)
            .with_origin(Vec2::new(x, 0.5))
    };
    [
        side(settings.left_angle, 0.0),
        side(settings.right_angle, 1.0),
    ]
}

/// The single burst of [`heart_burst_effect`].
pub fn heart_burst(settings: &HeartBurstSettings, palette: &Palette) -> BurstConfig {
    BurstConfig::with_palette(palette.clone())
        .with_particle_count(settings.particle_count)
        .with_spread(settings.spread)
        .with_origin(settings.origin.into())
        .with_shapes([HEART])
        .with_scalar(settings.scalar)
}

/// An effect waiting for its start delay to run out.
#[derive(Component, Debug, Clone)]
pub struct DelayedStart {
    /// What to start.
    pub kind: EffectKind,
    /// Time left before it starts.
    pub remaining: Duration,
}

impl DelayedStart {
    /// Starts `kind` after `delay`.
    pub fn new(kind: EffectKind, delay: Duration) -> Self {
        Self {
            kind,
            remaining: delay,
        }
    }
}

fn with_settings<T>(world: &World, f: impl FnOnce(&CelebrationSettings) -> T) -> T {
    match world.get_resource::<CelebrationSettings>() {
        Some(settings) => f(settings),
        None => f(&CelebrationSettings::default()),
    }
}

/// Emits the heart burst right away.
pub fn heart_burst_effect(world: &mut World) {
    let burst = with_settings(world, |settings| {
        heart_burst(&settings.heart_burst, &settings.palette)
    });
    emit_to_world(world, &burst);
}

/// Starts the fireworks and returns the entity running them.
pub fn fireworks_effect(world: &mut World) -> Entity {
    spawn_scheduled(world, EffectKind::Fireworks, Duration::ZERO)
}

/// Starts the flower petals and returns the entity running them.
pub fn flower_petals_effect(world: &mut World) -> Entity {
    spawn_scheduled(world, EffectKind::FlowerPetals, Duration::ZERO)
}

/// Plays a full celebration: hearts now, fireworks and petals after their
/// configured delays.
///
/// Each part runs on its own once started; nothing tracks the celebration as
/// a whole.
pub fn celebration(world: &mut World) {
    celebration_with_head_start(world, Duration::ZERO);
}

// `head_start` is how long ago the celebration was due. Child delays count
// from that instant, not from now.
fn celebration_with_head_start(world: &mut World, head_start: Duration) {
    info!("starting celebration");
    heart_burst_effect(world);

    let (fireworks_delay, petals_delay) = with_settings(world, |settings| {
        (
            Duration::from_millis(settings.timeline.fireworks_delay_ms),
            Duration::from_millis(settings.timeline.petals_delay_ms),
        )
    });
    for (kind, delay) in [
        (EffectKind::Fireworks, fireworks_delay),
        (EffectKind::FlowerPetals, petals_delay),
    ] {
        match delay.checked_sub(head_start) {
            Some(remaining) if !remaining.is_zero() => {
                world.spawn(DelayedStart::new(kind, remaining));
            }
            _ => {
                spawn_scheduled(world, kind, head_start - delay);
            }
        }
    }
}

/// Starts any effect by kind.
pub fn start_effect(world: &mut World, kind: EffectKind) {
    start_effect_with_head_start(world, kind, Duration::ZERO);
}

fn start_effect_with_head_start(world: &mut World, kind: EffectKind, head_start: Duration) {
    match kind {
        EffectKind::HeartBurst => heart_burst_effect(world),
        EffectKind::Celebration => celebration_with_head_start(world, head_start),
        EffectKind::Fireworks | EffectKind::FlowerPetals => {
            spawn_scheduled(world, kind, head_start);
        }
    }
}

fn spawn_scheduled(world: &mut World, kind: EffectKind, head_start: Duration) -> Entity {
    let effect = with_settings(world, |settings| {
        let palette = settings.palette.clone();
        match kind {
            EffectKind::FlowerPetals => {
                ScheduledEffect::flower_petals(&settings.flower_petals, palette)
            }
            _ => ScheduledEffect::fireworks(&settings.fireworks, palette),
        }
    })
    .with_head_start(head_start);

    debug!("{kind:?} started, lasting {:?}", effect.duration());
    world.spawn(effect).id()
}

/// Queues celebration effects from systems and observers.
pub trait CelebrationCommandsExt {
    /// Queues [`celebration`].
    fn celebrate(&mut self);

    /// Queues [`start_effect`] for `kind`.
    fn start_effect(&mut self, kind: EffectKind);
}

impl CelebrationCommandsExt for Commands<'_, '_> {
    fn celebrate(&mut self) {
        self.queue(celebration);
    }

    fn start_effect(&mut self, kind: EffectKind) {
        self.queue(move |world: &mut World| start_effect(world, kind));
    }
}

pub(crate) fn tick_scheduled_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<CelebrationRng>,
    mut facility: Option<ResMut<Facility>>,
    mut effects: Query<(Entity, &mut ScheduledEffect)>,
) {
    for (entity, mut effect) in &mut effects {
        let bursts = effect.advance(time.delta(), rng.source());

        if let Some(facility) = facility.as_deref_mut() {
            for burst in &bursts {
                facility.emit(burst);
            }
        }

        if effect.is_terminated() {
            debug!(
                "{:?} finished after {} ticks",
                effect.kind(),
                effect.ticks_emitted()
            );
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn start_delayed_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut pending: Query<(Entity, &mut DelayedStart)>,
) {
    let delta = time.delta();
    for (entity, mut start) in &mut pending {
        if start.remaining > delta {
            start.remaining -= delta;
            continue;
        }

        let head_start = delta - start.remaining;
        let kind = start.kind;
        commands.entity(entity).despawn();
        commands.queue(move |world: &mut World| {
            start_effect_with_head_start(world, kind, head_start)
        });
    }
}

pub(crate) fn schedule_startup_celebration(
    mut commands: Commands,
    settings: Res<CelebrationSettings>,
) {
    if let Some(delay_ms) = settings.timeline.startup_delay_ms {
        commands.spawn(DelayedStart::new(
            EffectKind::Celebration,
            Duration::from_millis(delay_ms),
        ));
    }
}
