pub use crate::CelebrationPlugin;

pub use crate::burst::{BurstConfig, Origin};
pub use crate::canvas::{ConfettiCanvas, ConfettiCanvasPlugin};
pub use crate::effects::{
    CelebrationCommandsExt, DelayedStart, EffectKind, EffectState, ScheduledEffect, celebration,
    fireworks_effect, flower_petals_effect, heart_burst_effect, start_effect,
};
pub use crate::facility::{Facility, ParticleFacility};
pub use crate::palette::Palette;
pub use crate::quota::{CelebrateRequested, CelebrationQuota, DismissBanner};
pub use crate::random::{CelebrationRng, RandomSource};
pub use crate::settings::CelebrationSettings;
pub use crate::shapes::{DrawContext, FLOWER, HEART, ShapeCallback, register_shapes};
