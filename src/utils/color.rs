//! Body and trail colors.
//!
//! Colors are stored as plain sRGB channel triples so they can travel through
//! configuration files and vertex buffers unchanged. Conversion to Bevy's
//! color types happens only at the window edge.

use bevy::color::{Color, ColorToComponents};
use serde::{Deserialize, Serialize};

/// An sRGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_color(self) -> Color {
        Color::srgb(self.r, self.g, self.b)
    }

    /// Linear RGBA components, the form Bevy's mesh vertex color attribute expects.
    pub fn to_linear_rgba(self) -> [f32; 4] {
        self.to_color().to_linear().to_f32_array()
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(color: Rgb) -> Self {
        color.to_array()
    }
}

pub mod palette {
    use super::Rgb;

    pub const FOREGROUND: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BACKGROUND: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const TRAIL_LINE: Rgb = Rgb::new(0.43, 0.43, 0.43);

    pub const SUN: Rgb = Rgb::new(1.0, 0.92, 0.0);
    pub const MERCURY: Rgb = Rgb::new(0.64, 0.65, 0.68);
    pub const VENUS: Rgb = Rgb::new(0.90, 0.76, 0.57);
    pub const EARTH: Rgb = Rgb::new(0.26, 0.58, 0.94);
    pub const MARS: Rgb = Rgb::new(0.96, 0.28, 0.24);
    pub const JUPITER: Rgb = Rgb::new(0.85, 0.56, 0.16);
    pub const SATURN: Rgb = Rgb::new(0.59, 0.49, 0.36);
    pub const URANUS: Rgb = Rgb::new(0.0, 0.53, 0.66);
    pub const NEPTUNE: Rgb = Rgb::new(0.06, 0.20, 0.53);
    pub const PLUTO: Rgb = Rgb::new(0.91, 0.91, 0.91);
}
