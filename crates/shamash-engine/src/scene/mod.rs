//! Retained scene.
//!
//! Responsibilities:
//! - own the mesh/texture/material registries behind dense id handles
//! - hold the renderable configuration: instances, sun, sky, environment,
//!   ground plane
//! - answer the bounds queries the shadow pass fits against
//!
//! Resources are immutable once added; the renderer uploads each id at most
//! once. Instance transforms stay mutable for per-frame animation.

mod environment;
mod ground;
mod instance;
mod light;

pub use environment::{Environment, Skybox};
pub use ground::GroundPlane;
pub use instance::MeshInstance;
pub use light::SunLight;

use crate::material::PbrMaterial;
use crate::mesh::{Aabb, MeshData};
use crate::texture::TextureData;

/// Opaque handle to a mesh registered in a [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Opaque handle to a texture registered in a [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub(crate) usize);

/// Opaque handle to a material registered in a [`Scene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialId(pub(crate) usize);

/// Everything the renderer draws for one frame.
#[derive(Default)]
pub struct Scene {
    meshes: Vec<MeshData>,
    textures: Vec<TextureData>,
    materials: Vec<PbrMaterial>,

    instances: Vec<MeshInstance>,
    sun: Option<SunLight>,
    skybox: Option<Skybox>,
    environment: Environment,
    ground: Option<GroundPlane>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ── registries ────────────────────────────────────────────────────────

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        debug_assert!(mesh.is_valid(), "registered mesh must be valid");
        let id = MeshId(self.meshes.len());
        self.meshes.push(mesh);
        id
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        id
    }

    pub fn add_material(&mut self, material: PbrMaterial) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id.0)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&PbrMaterial> {
        self.materials.get(id.0)
    }

    // ── renderables ───────────────────────────────────────────────────────

    pub fn add_instance(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [MeshInstance] {
        &mut self.instances
    }

    pub fn set_sun(&mut self, sun: SunLight) {
        self.sun = Some(sun);
    }

    pub fn sun(&self) -> Option<&SunLight> {
        self.sun.as_ref()
    }

    pub fn set_skybox(&mut self, skybox: Skybox) {
        self.skybox = Some(skybox);
    }

    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn set_ground_plane(&mut self, ground: GroundPlane) {
        self.ground = Some(ground);
    }

    pub fn ground_plane(&self) -> Option<&GroundPlane> {
        self.ground.as_ref()
    }

    // ── bounds ────────────────────────────────────────────────────────────

    /// World-space bounds of all shadow-casting instances.
    ///
    /// An empty result (no casters, or casters with unknown meshes) yields a
    /// unit box at the origin so the shadow projection stays finite.
    pub fn caster_bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for instance in &self.instances {
            if !instance.cast_shadows {
                continue;
            }
            if let Some(mesh) = self.mesh(instance.mesh) {
                bounds.union(mesh.aabb().transformed(instance.transform));
            }
        }
        if bounds.is_valid() {
            bounds
        } else {
            Aabb::new(glam::Vec3::splat(-0.5), glam::Vec3::splat(0.5))
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::texture::ColorSpace;

    fn scene_with_cube() -> (Scene, MeshId, MaterialId) {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(MeshData::cube(0.5));
        let tex = scene.add_texture(TextureData::solid([255; 4], ColorSpace::Srgb));
        let mat = scene.add_material(PbrMaterial::new(tex, tex, tex, tex));
        (scene, mesh, mat)
    }

    // ── registries ────────────────────────────────────────────────────────

    #[test]
    fn ids_are_dense_and_resolvable() {
        let (scene, mesh, mat) = scene_with_cube();
        assert!(scene.mesh(mesh).is_some());
        assert!(scene.material(mat).is_some());
        assert!(scene.mesh(MeshId(42)).is_none());
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn caster_bounds_cover_transformed_instances() {
        let (mut scene, mesh, mat) = scene_with_cube();
        scene.add_instance(
            MeshInstance::new(mesh, mat)
                .transform(Mat4::from_translation(Vec3::new(3.0, 0.0, -4.0)))
                .cast_shadows(true),
        );
        scene.add_instance(
            MeshInstance::new(mesh, mat)
                .transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)))
                .cast_shadows(true),
        );

        let b = scene.caster_bounds();
        assert_eq!(b.min, Vec3::new(-0.5, -0.5, -4.5));
        assert_eq!(b.max, Vec3::new(3.5, 0.5, -3.5));
    }

    #[test]
    fn non_casters_do_not_grow_bounds() {
        let (mut scene, mesh, mat) = scene_with_cube();
        scene.add_instance(MeshInstance::new(mesh, mat).cast_shadows(true));
        scene.add_instance(
            MeshInstance::new(mesh, mat)
                .transform(Mat4::from_translation(Vec3::splat(100.0)))
                .cast_shadows(false),
        );

        let b = scene.caster_bounds();
        assert!(b.max.x < 1.0);
    }

    #[test]
    fn empty_scene_bounds_are_a_unit_box() {
        let scene = Scene::new();
        let b = scene.caster_bounds();
        assert_eq!(b.extent(), Vec3::ONE);
        assert_eq!(b.center(), Vec3::ZERO);
    }
}
