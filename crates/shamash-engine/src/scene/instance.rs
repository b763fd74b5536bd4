use glam::Mat4;

use super::{MaterialId, MeshId};

/// One renderable: a mesh drawn with a material at a model transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshInstance {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub transform: Mat4,
    pub cast_shadows: bool,
}

impl MeshInstance {
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            mesh,
            material,
            transform: Mat4::IDENTITY,
            cast_shadows: false,
        }
    }

    pub fn transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn cast_shadows(mut self, cast: bool) -> Self {
        self.cast_shadows = cast;
        self
    }
}
