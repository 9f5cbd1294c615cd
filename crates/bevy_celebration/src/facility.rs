use std::ops::{Deref, DerefMut};

use bevy::prelude::*;

use crate::burst::BurstConfig;
use crate::shapes::ShapeCallback;

/// Something that can draw confetti.
///
/// Both calls are fire-and-forget: implementations must never block and must
/// swallow their own failures (missing canvas, poisoned state, ...).
pub trait ParticleFacility: Send + Sync + 'static {
    /// Renders one burst.
    fn emit(&mut self, burst: &BurstConfig);

    /// Inserts or replaces a named shape in the facility's shape table.
    fn register_shape(&mut self, name: &str, draw: ShapeCallback);
}

/// The particle facility the scheduler and shape registry talk to.
///
/// When this resource is missing every emission and registration becomes a
/// no-op, which is how the crate runs headless.
#[derive(Resource)]
pub struct Facility(Box<dyn ParticleFacility>);

impl Facility {
    /// Wraps a facility implementation.
    pub fn new(facility: impl ParticleFacility) -> Self {
        Self(Box::new(facility))
    }
}

impl Deref for Facility {
    type Target = dyn ParticleFacility;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for Facility {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

/// Emits `burst` if a facility is installed in `world`.
pub fn emit_to_world(world: &mut World, burst: &BurstConfig) {
    match world.get_resource_mut::<Facility>() {
        Some(mut facility) => facility.emit(burst),
        None => trace!("no particle facility installed, dropping burst"),
    }
}
