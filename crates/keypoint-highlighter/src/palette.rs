//! Highlight colors cycled by keypoint index

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
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

    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

pub const YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);
pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
pub const ORANGE: Rgb = Rgb::new(1.0, 0.5, 0.0);
pub const LIGHT_BLUE: Rgb = Rgb::new(0.0, 0.8, 1.0);
pub const MAGENTA: Rgb = Rgb::new(1.0, 0.0, 1.0);
pub const LIGHT_GREEN: Rgb = Rgb::new(0.5, 1.0, 0.5);
pub const PINK: Rgb = Rgb::new(1.0, 0.7, 0.7);
pub const LIGHT_PURPLE: Rgb = Rgb::new(0.7, 0.7, 1.0);

pub const DEFAULT_COLORS: [Rgb; 8] = [
    YELLOW,
    GREEN,
    ORANGE,
    LIGHT_BLUE,
    MAGENTA,
    LIGHT_GREEN,
    PINK,
    LIGHT_PURPLE,
];

/// Ordered, non-empty set of colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::Invalid("Palette must contain at least one color".into()));
        }
        if let Some(bad) = colors.iter().find(|c| !c.is_valid()) {
            return Err(ConfigError::Invalid(format!(
                "Color components must be within [0, 1]: {:?}",
                bad
            )));
        }
        Ok(Self { colors })
    }

    /// Color for the keypoint at `index` (0-based, input order)
    pub fn color_for(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}
