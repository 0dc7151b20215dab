//! Distinguishable colors for new cuboids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::Rgb;

/// Draws random, saturated colors
pub struct ColorPicker {
    rng: StdRng,
}

impl ColorPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence, for tests and scripted sessions
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_color(&mut self) -> Rgb {
        let hue = self.rng.random_range(0.0..360.0);
        let saturation = self.rng.random_range(0.65..0.95);
        Rgb::from_hsv(hue, saturation, 0.95)
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}
