//! Core type aliases and re-exports

use serde::{Deserialize, Serialize};

pub use glam::{DVec3, IVec3};

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Draw color. Channels are forwarded to the renderer untouched, so they are
/// not clamped to any range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub alpha: f64,
}

impl Color {
    /// Opaque black, the turtle's starting pen
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
