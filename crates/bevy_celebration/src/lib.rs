#![deny(missing_docs)]
//! **Celebration** plays layered confetti effects in a [Bevy](https://bevyengine.org/) app:
//! a burst of hearts, two-sided fireworks and petals drifting in from the screen edges.
//!
//! # Getting started
//!
//! Add [`CelebrationPlugin`] for the scheduler and [`ConfettiCanvasPlugin`] for the
//! built-in confetti renderer:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_celebration::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, CelebrationPlugin, ConfettiCanvasPlugin::default()))
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn(Camera2d);
//!         })
//!         .run();
//! }
//! ```
//!
//! One celebration plays shortly after startup. Trigger [`CelebrateRequested`] to play
//! another one; the [`CelebrationQuota`] decides whether it is allowed.
//!
//! # Effects
//!
//! - [`heart_burst_effect`]: one burst of heart-shaped confetti
//! - [`fireworks_effect`]: a few seconds of shrinking bursts from both sides
//! - [`flower_petals_effect`]: small bursts angled in from the left and right edges
//! - [`celebration`]: all three, staggered
//!
//! Repeating effects are [`ScheduledEffect`] components ticked on virtual [`Time`], and
//! despawn themselves once their window closes.
//!
//! # Rendering
//!
//! Effects hand [`BurstConfig`] values to the [`Facility`] resource, a boxed
//! [`ParticleFacility`]. Without that resource every emission is silently dropped, which
//! keeps headless apps and tests cheap. Custom silhouettes are plain
//! [`ShapeCallback`] functions tracing a path on a [`DrawContext`].
//!
//! # Configuration
//!
//! Every constant lives in [`CelebrationSettings`]. Insert the resource before adding the
//! plugin, or load a `*.celebration.ron` file through the asset server.

/// Burst parameters.
pub mod burst;
/// The built-in confetti renderer.
pub mod canvas;
/// Celebration effects and their scheduling.
pub mod effects;
/// The particle facility bursts are emitted into.
pub mod facility;
/// Shared colour palettes.
pub mod palette;
/// Convenience re-exports for common celebration types.
pub mod prelude;
/// Rate limiting of user-triggered celebrations.
pub mod quota;
/// Injectable randomness.
pub mod random;
/// Tunables and their RON loader.
pub mod settings;
/// Custom particle silhouettes.
pub mod shapes;

use bevy::prelude::*;

use effects::{schedule_startup_celebration, start_delayed_effects, tick_scheduled_effects};
use quota::{init_quota, on_celebrate_requested, on_dismiss_banner};
use settings::apply_loaded_settings;
use shapes::register_shape_callbacks;

/// Plugin that schedules celebration effects.
///
/// Registers the settings asset, the shape callbacks, the quota observers and the
/// systems that tick running effects. Requires the asset plugin. Rendering is left to
/// whatever [`Facility`] is installed, see [`ConfettiCanvasPlugin`].
pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<CelebrationSettings>()
            .init_asset_loader::<CelebrationSettingsLoader>();

        app.init_resource::<CelebrationSettings>()
            .init_resource::<CelebrationQuota>()
            .init_resource::<CelebrationRng>();

        app.add_observer(on_celebrate_requested)
            .add_observer(on_dismiss_banner);

        app.add_systems(
            Startup,
            (
                register_shape_callbacks,
                init_quota,
                schedule_startup_celebration,
            ),
        )
        .add_systems(
            Update,
            (
                apply_loaded_settings,
                tick_scheduled_effects,
                start_delayed_effects,
            )
                .chain(),
        );
    }
}

pub use burst::{BurstConfig, Origin};
pub use canvas::{ConfettiCanvas, ConfettiCanvasPlugin, Confetto, ParticleShape, ShapeOutline};
pub use effects::{
    CelebrationCommandsExt, DelayedStart, EffectKind, EffectState, ScheduledEffect, celebration,
    fireworks_effect, flower_petals_effect, heart_burst_effect, start_effect,
};
pub use facility::{Facility, ParticleFacility};
pub use palette::Palette;
pub use quota::{CelebrateRequested, CelebrationQuota, DismissBanner};
pub use random::{CelebrationRng, RandomSource, StdRandom};
pub use settings::{CelebrationSettings, CelebrationSettingsLoader, SettingsError};
pub use shapes::{DrawContext, PathOp, PathRecorder, ShapeCallback, register_shapes};
