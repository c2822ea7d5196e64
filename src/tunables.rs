//! Live-tunable scene parameters.
//!
//! A single resource edited through the debug panel and read by the per-frame
//! systems. Both run on the main schedule, so an edit is seen by the next tick.

use std::ops::RangeInclusive;

use bevy::prelude::*;

pub struct TunablesPlugin;

impl Plugin for TunablesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TunableParams>();
    }
}

/// User-adjustable scalars affecting rendering.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct TunableParams {
    /// Multiplier on how fast the sun travels along its orbit.
    pub sun_speed: f32,
    /// Sun light strength in panel units.
    pub sun_intensity: f32,
    /// Exponential-squared fog density.
    pub fog_density: f32,
    /// Street lamp strength in panel units, applied to every lamp.
    pub lamp_intensity: f32,
}

impl Default for TunableParams {
    fn default() -> Self {
        Self {
            sun_speed: 1.0,
            sun_intensity: 1.2,
            fog_density: 0.0015,
            lamp_intensity: 0.6,
        }
    }
}

/// Slider bounds for one tunable field.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.min..=self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Nearest step above `min`, kept inside the range.
    pub fn snap(&self, value: f32) -> f32 {
        if self.step <= 0.0 {
            return self.clamp(value);
        }
        let steps = ((value - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }
}

pub const SUN_SPEED_RANGE: SliderRange = SliderRange::new(0.1, 5.0, 0.1);
pub const SUN_INTENSITY_RANGE: SliderRange = SliderRange::new(0.0, 2.0, 0.1);
pub const FOG_DENSITY_RANGE: SliderRange = SliderRange::new(0.001, 0.01, 0.001);
pub const LAMP_INTENSITY_RANGE: SliderRange = SliderRange::new(0.0, 2.0, 0.1);

impl TunableParams {
    /// Pull every field back into its slider range.
    pub fn clamped(self) -> Self {
        Self {
            sun_speed: SUN_SPEED_RANGE.clamp(self.sun_speed),
            sun_intensity: SUN_INTENSITY_RANGE.clamp(self.sun_intensity),
            fog_density: FOG_DENSITY_RANGE.clamp(self.fog_density),
            lamp_intensity: LAMP_INTENSITY_RANGE.clamp(self.lamp_intensity),
        }
    }
}
