use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

/// The pink and violet colours every celebration burst is painted with.
pub const CELEBRATION_COLORS: [Srgba; 9] = [
    Srgba::rgb(1.0, 105.0 / 255.0, 180.0 / 255.0), // #ff69b4
    Srgba::rgb(1.0, 20.0 / 255.0, 147.0 / 255.0), // #ff1493
    Srgba::rgb(218.0 / 255.0, 112.0 / 255.0, 214.0 / 255.0), // #da70d6
    Srgba::rgb(186.0 / 255.0, 85.0 / 255.0, 211.0 / 255.0), // #ba55d3
    Srgba::rgb(147.0 / 255.0, 112.0 / 255.0, 219.0 / 255.0), // #9370db
    Srgba::rgb(138.0 / 255.0, 43.0 / 255.0, 226.0 / 255.0), // #8a2be2
    Srgba::rgb(1.0, 107.0 / 255.0, 107.0 / 255.0), // #ff6b6b
    Srgba::rgb(240.0 / 255.0, 98.0 / 255.0, 146.0 / 255.0), // #f06292
    Srgba::rgb(233.0 / 255.0, 30.0 / 255.0, 99.0 / 255.0), // #e91e63
];

/// An ordered, immutable list of colours shared by bursts.
///
/// Cloning a palette is cheap: every clone points at the same colours. In RON
/// the palette is written as a list of hex strings, e.g. `["#ff69b4", "#e91e63"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette(Arc<[Srgba]>);

impl Palette {
    /// Creates a palette from any list of colours.
    pub fn new(colors: impl IntoIterator<Item = Srgba>) -> Self {
        Self(colors.into_iter().collect())
    }

    /// The colours, in order.
    pub fn colors(&self) -> &[Srgba] {
        &self.0
    }

    /// Number of colours in the palette.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the palette has no colours.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colour for the `index`-th particle of a burst, cycling through the palette.
    pub fn cycle(&self, index: usize) -> Option<Srgba> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0[index % self.0.len()])
    }

    /// Returns `true` if both palettes share the same storage.
    pub fn ptr_eq(&self, other: &Palette) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(CELEBRATION_COLORS)
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = SettingsError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(SettingsError::EmptyPalette);
        }
        let colors = value
            .into_iter()
            .map(|hex| {
                Srgba::hex(&hex).map_err(|source| SettingsError::InvalidColor { value: hex, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(colors))
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors().iter().map(Srgba::to_hex).collect()
    }
}
