use glam::Vec3;

use crate::color::Color;

/// Directional sun light.
///
/// Intensity is illuminance in lux, matching the photometric camera exposure;
/// color is linear. Direction is the direction light travels (typically
/// pointing down).
#[derive(Debug, Clone, PartialEq)]
pub struct SunLight {
    pub color: Color,
    pub intensity: f32,
    pub direction: Vec3,
    /// Apparent angular radius of the disc, in degrees. Widens the shadow
    /// softening kernel.
    pub angular_radius: f32,
    pub cast_shadows: bool,
}

impl SunLight {
    pub fn new() -> Self {
        Self {
            color: Color::white(),
            intensity: 100_000.0,
            direction: Vec3::NEG_Y,
            angular_radius: 0.545,
            cast_shadows: false,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn intensity(mut self, lux: f32) -> Self {
        self.intensity = lux;
        self
    }

    pub fn direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn angular_radius(mut self, degrees: f32) -> Self {
        self.angular_radius = degrees;
        self
    }

    pub fn cast_shadows(mut self, cast: bool) -> Self {
        self.cast_shadows = cast;
        self
    }

    /// Normalized travel direction; a zero vector falls back to straight down.
    pub fn direction_normalized(&self) -> Vec3 {
        let d = self.direction;
        if d.length_squared() > 1e-12 {
            d.normalize()
        } else {
            Vec3::NEG_Y
        }
    }
}

impl Default for SunLight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain_overrides_defaults() {
        let sun = SunLight::new()
            .color(Color::from_srgb(0.98, 0.92, 0.89, 1.0))
            .intensity(110_000.0)
            .direction(Vec3::new(0.2, -1.0, -0.8))
            .angular_radius(1.9)
            .cast_shadows(true);

        assert_eq!(sun.intensity, 110_000.0);
        assert_eq!(sun.angular_radius, 1.9);
        assert!(sun.cast_shadows);
        // The sRGB constructor landed in linear space.
        assert!(sun.color.r < 0.98 && sun.color.r > 0.9);
    }

    #[test]
    fn zero_direction_normalizes_to_down() {
        let sun = SunLight::new().direction(Vec3::ZERO);
        assert_eq!(sun.direction_normalized(), Vec3::NEG_Y);
    }

    #[test]
    fn direction_is_normalized() {
        let sun = SunLight::new().direction(Vec3::new(0.2, -1.0, -0.8));
        assert!((sun.direction_normalized().length() - 1.0).abs() < 1e-6);
    }
}
