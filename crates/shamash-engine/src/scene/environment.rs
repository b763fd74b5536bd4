use crate::color::Color;

/// Constant-color sky drawn behind everything.
///
/// The color is display-referred: it is presented as-is, bypassing exposure
/// and tonemapping, so a configured pale blue stays pale blue regardless of
/// the photometric light levels in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Skybox {
    pub color: Color,
}

impl Skybox {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Ambient (indirect) lighting stand-in.
///
/// A constant-irradiance term: linear tint times illuminance in lux. This is
/// the configuration-level counterpart of an image-based environment without
/// the prefiltered cubemaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub color: Color,
    pub intensity: f32,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            color: Color::white(),
            intensity: 30_000.0,
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
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
