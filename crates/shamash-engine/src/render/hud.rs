use crate::color::Color;
use crate::coords::Vec2;
use crate::text::FontId;

/// One HUD text line.
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub text: String,
    pub font: FontId,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text in logical pixels.
    pub origin: Vec2,
}

/// Screen-space overlay recorded per frame.
///
/// Rebuild it every frame: `clear()` then `push_text(...)` for each line.
#[derive(Debug, Default)]
pub struct Hud {
    texts: Vec<HudText>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded lines. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.texts.clear();
    }

    pub fn push_text(
        &mut self,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        origin: Vec2,
    ) {
        self.texts.push(HudText {
            text: text.into(),
            font,
            size,
            color,
            origin,
        });
    }

    pub fn texts(&self) -> &[HudText] {
        &self.texts
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_retains_capacity() {
        let mut hud = Hud::new();
        hud.push_text("fps", FontId(0), 14.0, Color::white(), Vec2::zero());
        assert_eq!(hud.texts().len(), 1);
        hud.clear();
        assert!(hud.is_empty());
    }
}
