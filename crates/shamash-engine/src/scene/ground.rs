use glam::Mat4;

/// Ground-plane shadow catcher.
///
/// A quad the engine builds procedurally and renders with the shadow-catching
/// material: invisible except where it receives shadow, where it darkens the
/// background by `strength`. Receives shadows, never casts, never culled.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundPlane {
    /// Half extent of the quad in world units (the quad spans ±half_extent
    /// in X and Z at y = 0, before `transform`).
    pub half_extent: f32,
    /// Shadow opacity in [0, 1].
    pub strength: f32,
    pub transform: Mat4,
}

impl GroundPlane {
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent,
            strength: 0.7,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_is_clamped_to_unit_range() {
        assert_eq!(GroundPlane::new(10.0).strength(1.5).strength, 1.0);
        assert_eq!(GroundPlane::new(10.0).strength(-0.2).strength, 0.0);
    }
}
