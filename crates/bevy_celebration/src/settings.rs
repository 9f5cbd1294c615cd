use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    color::HexColorError,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::burst::Origin;
use crate::palette::Palette;
use crate::quota::CelebrationQuota;

/// Errors that can occur when reading [`CelebrationSettings`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading the settings file.
    #[error("Could not load settings: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file contained invalid RON syntax.
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// A palette was declared without any colour.
    #[error("Palette must contain at least one colour")]
    EmptyPalette,
    /// A palette entry is not a hex colour.
    #[error("Invalid palette colour \"{value}\": {source}")]
    InvalidColor {
        /// The rejected entry.
        value: String,
        /// Why it was rejected.
        source: HexColorError,
    },
    /// A repeating effect was configured with a zero tick interval.
    #[error("Effect \"{effect}\" has a zero tick interval")]
    ZeroInterval {
        /// Which effect is misconfigured.
        effect: &'static str,
    },
}

/// Two-sided fireworks: bursts from the left and right thirds of the screen
/// whose size shrinks linearly over the effect window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksSettings {
    /// Length of the effect window, in milliseconds.
    pub duration_ms: u64,
    /// Time between two emission ticks, in milliseconds.
    pub interval_ms: u64,
    /// Particles per burst at the very start of the window.
    pub max_particles: f32,
    /// Initial particle velocity.
    pub start_velocity: f32,
    /// Spread in degrees.
    pub spread: f32,
    /// Particle lifetime in frames.
    pub ticks: u32,
    /// Canvas stacking order.
    pub z_index: i32,
    /// Horizontal launch range of the left burst.
    pub left_x: (f32, f32),
    /// Horizontal launch range of the right burst.
    pub right_x: (f32, f32),
    /// Subtracted from a uniform sample to get the vertical launch position,
    /// so particles may start above the visible area.
    pub y_lift: f32,
}

impl Default for FireworksSettings {
    fn default() -> Self {
        Self {
            duration_ms: 5_000,
            interval_ms: 250,
            max_particles: 50.0,
            start_velocity: 30.0,
            spread: 360.0,
            ticks: 60,
            z_index: 0,
            left_x: (0.1, 0.3),
            right_x: (0.7, 0.9),
            y_lift: 0.2,
        }
    }
}

/// A single burst of heart-shaped confetti.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartBurstSettings {
    /// Number of hearts.
    pub particle_count: f32,
    /// Spread in degrees.
    pub spread: f32,
    /// Launch position.
    pub origin: Origin,
    /// Size multiplier.
    pub scalar: f32,
}

impl Default for HeartBurstSettings {
    fn default() -> Self {
        Self {
            particle_count: 100.0,
            spread: 70.0,
            origin: Origin { x: 0.5, y: 0.9 },
            scalar: 2.0,
        }
    }
}

/// Petals drifting in from both sides of the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerPetalsSettings {
    /// Length of the effect window, in milliseconds.
    pub duration_ms: u64,
    /// Time between two emission ticks, in milliseconds.
    pub interval_ms: u64,
    /// Particles per side and tick.
    pub particle_count: f32,
    /// Spread in degrees.
    pub spread: f32,
    /// Launch angle of the left side, in degrees.
    pub left_angle: f32,
    /// Launch angle of the right side, in degrees.
    pub right_angle: f32,
}

impl Default for FlowerPetalsSettings {
    fn default() -> Self {
        Self {
            duration_ms: 3_000,
            interval_ms: 150,
            particle_count: 2.0,
            spread: 55.0,
            left_angle: 60.0,
            right_angle: 120.0,
        }
    }
}

/// When each part of a celebration starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationTimeline {
    /// Delay before the fireworks start, in milliseconds.
    pub fireworks_delay_ms: u64,
    /// Delay before the petals start, in milliseconds.
    pub petals_delay_ms: u64,
    /// Delay before the automatic celebration after startup, in milliseconds.
    ///
    /// `None` disables the automatic celebration.
    pub startup_delay_ms: Option<u64>,
    /// How many user-triggered celebrations are allowed while the banner is shown.
    pub quota: u32,
}

impl Default for CelebrationTimeline {
    fn default() -> Self {
        Self {
            fireworks_delay_ms: 300,
            petals_delay_ms: 600,
            startup_delay_ms: Some(1_000),
            quota: 3,
        }
    }
}

/// Every tunable of the celebration effects.
///
/// Inserted as a resource by [`CelebrationPlugin`](crate::CelebrationPlugin)
/// with the defaults below, and loadable from RON files through
/// [`CelebrationSettingsLoader`]. Any loaded settings asset replaces the
/// resource.
///
/// ```ron
/// (
///     palette: ["#ff69b4", "#e91e63"],
///     fireworks: (duration_ms: 8000),
///     timeline: (startup_delay_ms: None),
/// )
/// ```
#[derive(Asset, Resource, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CelebrationSettings {
    /// Colours shared by every burst.
    pub palette: Palette,
    /// Fireworks tunables.
    pub fireworks: FireworksSettings,
    /// Heart burst tunables.
    pub heart_burst: HeartBurstSettings,
    /// Flower petals tunables.
    pub flower_petals: FlowerPetalsSettings,
    /// Start delays and the user quota.
    pub timeline: CelebrationTimeline,
}

impl CelebrationSettings {
    /// Parses and validates settings written in RON.
    pub fn from_ron(source: &[u8]) -> Result<Self, SettingsError> {
        let settings = ron::de::from_bytes::<Self>(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings that could never terminate or never emit.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.palette.is_empty() {
            return Err(SettingsError::EmptyPalette);
        }
        if self.fireworks.interval_ms == 0 {
            return Err(SettingsError::ZeroInterval { effect: "fireworks" });
        }
        if self.flower_petals.interval_ms == 0 {
            return Err(SettingsError::ZeroInterval {
                effect: "flower_petals",
            });
        }
        Ok(())
    }
}

/// Asset loader for [`CelebrationSettings`] files in RON format.
#[derive(Default, TypePath)]
pub struct CelebrationSettingsLoader;

impl AssetLoader for CelebrationSettingsLoader {
    type Asset = CelebrationSettings;
    type Settings = ();
    type Error = SettingsError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        CelebrationSettings::from_ron(&bytes)
    }

    fn extensions(&self) -> &[&str] {
        &["celebration.ron"]
    }
}

pub(crate) fn apply_loaded_settings(
    mut events: MessageReader<AssetEvent<CelebrationSettings>>,
    assets: Res<Assets<CelebrationSettings>>,
    mut settings: ResMut<CelebrationSettings>,
    mut quota: ResMut<CelebrationQuota>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id }
        | AssetEvent::LoadedWithDependencies { id }
        | AssetEvent::Modified { id }) = event
        else {
            continue;
        };
        if let Some(loaded) = assets.get(*id) {
            info!("applying celebration settings {id:?}");
            *settings = loaded.clone();
            quota.set_limit(settings.timeline.quota);
        }
    }
}
