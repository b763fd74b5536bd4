//! Material parameter sets.

use crate::scene::TextureId;

/// Textured-lit PBR parameter set: albedo, metallic, roughness, normal.
///
/// All four maps are required; callers substitute procedural constants
/// (solid metallic/roughness values, a flat normal) when a map is not
/// available as a file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PbrMaterial {
    pub albedo: TextureId,
    pub metallic: TextureId,
    pub roughness: TextureId,
    pub normal: TextureId,
}

impl PbrMaterial {
    pub fn new(
        albedo: TextureId,
        metallic: TextureId,
        roughness: TextureId,
        normal: TextureId,
    ) -> Self {
        Self {
            albedo,
            metallic,
            roughness,
            normal,
        }
    }
}
