use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// One discrete particle emission.
///
/// A burst is built once and never mutated: effects construct a fresh value
/// for every emission tick. Field defaults follow the conventional confetti
/// defaults, so a `BurstConfig::default()` is a plain 50 particle pop from the
/// middle of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstConfig {
    /// How many particles to launch. Fractional counts are floored by the facility.
    pub particle_count: f32,
    /// Launch direction in degrees, counter-clockwise from the positive x axis.
    ///
    /// `90.0` launches straight up. Defaults to `90.0`.
    pub angle: f32,
    /// How far off-center particles can go, in degrees. Defaults to `45.0`.
    pub spread: f32,
    /// Initial speed of each particle, in pixels per frame. Defaults to `45.0`.
    pub start_velocity: f32,
    /// Velocity multiplier applied every frame. Defaults to `0.9`.
    pub decay: f32,
    /// Downward pull. `1.0` is full gravity, `0.0` makes particles float. Defaults to `1.0`.
    pub gravity: f32,
    /// Sideways push per frame. Negative drifts left. Defaults to `0.0`.
    pub drift: f32,
    /// Number of frames each particle lives. Defaults to `200`.
    pub ticks: u32,
    /// Launch position, normalized to the canvas (`0.0..=1.0` on each axis, y down).
    ///
    /// Values outside that range are allowed and start particles off-screen.
    pub origin: Vec2,
    /// Names of the shapes to pick from. Empty means the facility's default shapes.
    pub shapes: Vec<String>,
    /// Colours assigned round-robin to the particles.
    pub colors: Palette,
    /// Size multiplier for every particle. Defaults to `1.0`.
    pub scalar: f32,
    /// Stacking order of the canvas the burst is drawn on. Defaults to `100`.
    pub z_index: i32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 50.0,
            angle: 90.0,
            spread: 45.0,
            start_velocity: 45.0,
            decay: 0.9,
            gravity: 1.0,
            drift: 0.0,
            ticks: 200,
            origin: Vec2::new(0.5, 0.5),
            shapes: Vec::new(),
            colors: Palette::default(),
            scalar: 1.0,
            z_index: 100,
        }
    }
}

impl BurstConfig {
    /// A default burst painted with `colors`.
    pub fn with_palette(colors: Palette) -> Self {
        Self {
            colors,
            ..default()
        }
    }

    /// Sets the particle count.
    pub fn with_particle_count(mut self, count: f32) -> Self {
        self.particle_count = count;
        self
    }

    /// Sets the launch angle, in degrees.
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    /// Sets the spread, in degrees.
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.spread = degrees;
        self
    }

    /// Sets the initial velocity.
    pub fn with_start_velocity(mut self, velocity: f32) -> Self {
        self.start_velocity = velocity;
        self
    }

    /// Sets the particle lifetime, in frames.
    pub fn with_ticks(mut self, ticks: u32) -> Self {
        self.ticks = ticks;
        self
    }

    /// Sets the normalized launch position.
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Restricts the burst to the given shape names.
    pub fn with_shapes<I, S>(mut self, shapes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shapes = shapes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the size multiplier.
    pub fn with_scalar(mut self, scalar: f32) -> Self {
        self.scalar = scalar;
        self
    }

    /// Sets the canvas stacking order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The number of particles the facility will actually spawn.
    pub fn whole_particles(&self) -> u32 {
        if self.particle_count.is_finite() && self.particle_count > 0.0 {
            self.particle_count.floor() as u32
        } else {
            0
        }
    }
}

/// A launch position as written in settings files.
///
/// Either axis may be omitted and falls back to the centre of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Horizontal position, `0.0` is the left edge.
    #[serde(default = "half")]
    pub x: f32,
    /// Vertical position, `0.0` is the top edge.
    #[serde(default = "half")]
    pub y: f32,
}

fn half() -> f32 {
    0.5
}

impl Default for Origin {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl From<Origin> for Vec2 {
    fn from(origin: Origin) -> Self {
        Vec2::new(origin.x, origin.y)
    }
}
