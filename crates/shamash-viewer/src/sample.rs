//! The sample scene: five textured props, sun, sky, ground shadow catcher.

use std::path::Path;

use anyhow::Result;
use glam::{Mat4, Vec3};

use shamash_engine::color::Color;
use shamash_engine::material::PbrMaterial;
use shamash_engine::mesh::MeshData;
use shamash_engine::scene::{Environment, GroundPlane, MeshInstance, Scene, Skybox, SunLight};
use shamash_engine::texture::{ColorSpace, TextureData};

use crate::assets;

/// Placeholder geometry used when a model's GLB container is absent.
#[derive(Debug, Copy, Clone)]
pub enum PlaceholderShape {
    Cube { half_extent: f32 },
    Sphere { radius: f32 },
}

/// Static description of one prop.
pub struct ModelSpec {
    pub name: &'static str,
    pub translation: Vec3,
    pub rotation_y: f32,
    pub shape: PlaceholderShape,
    /// Checkerboard tints for the placeholder albedo.
    pub tint: ([u8; 3], [u8; 3]),
    /// Placeholder metallic / roughness constants (0-255).
    pub metallic: u8,
    pub roughness: u8,
}

impl ModelSpec {
    pub fn placeholder_mesh(&self) -> MeshData {
        match self.shape {
            PlaceholderShape::Cube { half_extent } => MeshData::cube(half_extent),
            PlaceholderShape::Sphere { radius } => MeshData::sphere(radius, 32),
        }
    }
}

/// The five props with their original placements.
pub const MODELS: [ModelSpec; 5] = [
    ModelSpec {
        name: "drill",
        translation: Vec3::new(0.0, 0.0, -4.0),
        rotation_y: 0.0,
        shape: PlaceholderShape::Cube { half_extent: 0.35 },
        tint: ([228, 176, 52], [42, 42, 42]),
        metallic: 40,
        roughness: 140,
    },
    ModelSpec {
        name: "extinguisher",
        translation: Vec3::new(1.0, 0.0, -4.0),
        rotation_y: 0.0,
        shape: PlaceholderShape::Sphere { radius: 0.35 },
        tint: ([196, 36, 36], [235, 235, 235]),
        metallic: 120,
        roughness: 90,
    },
    ModelSpec {
        name: "rescue_randy",
        translation: Vec3::new(2.0, 0.0, -4.0),
        rotation_y: 0.0,
        shape: PlaceholderShape::Sphere { radius: 0.45 },
        tint: ([214, 116, 56], [58, 88, 138]),
        metallic: 10,
        roughness: 200,
    },
    ModelSpec {
        name: "pump",
        translation: Vec3::new(4.0, 0.0, -4.0),
        rotation_y: 1.57,
        shape: PlaceholderShape::Cube { half_extent: 0.4 },
        tint: ([72, 128, 178], [32, 32, 32]),
        metallic: 180,
        roughness: 110,
    },
    ModelSpec {
        name: "valve",
        translation: Vec3::new(3.0, 0.0, -4.0),
        rotation_y: 0.0,
        shape: PlaceholderShape::Sphere { radius: 0.3 },
        tint: ([176, 58, 58], [120, 120, 120]),
        metallic: 220,
        roughness: 70,
    },
];

/// Center of the prop row; the orbit camera targets this.
pub fn scene_focus() -> Vec3 {
    Vec3::new(2.0, 0.5, -4.0)
}

/// Builds the full sample scene from `assets_dir`.
pub fn build_scene(assets_dir: &Path) -> Result<Scene> {
    let mut scene = Scene::new();

    for spec in &MODELS {
        add_model(&mut scene, assets_dir, spec)?;
    }

    scene.set_sun(
        SunLight::new()
            .color(Color::from_srgb(0.98, 0.92, 0.89, 1.0))
            .intensity(110_000.0)
            .direction(Vec3::new(0.2, -1.0, -0.8))
            .angular_radius(1.9)
            .cast_shadows(true),
    );

    scene.set_environment(Environment::new().intensity(100_000.0));

    scene.set_skybox(Skybox::new(Color::new(0.5, 0.75, 1.0, 1.0)));

    scene.set_ground_plane(
        GroundPlane::new(10.0)
            .strength(0.7)
            .transform(Mat4::from_translation(Vec3::new(3.0, 0.0, -4.0))),
    );

    Ok(scene)
}

fn add_model(scene: &mut Scene, assets_dir: &Path, spec: &ModelSpec) -> Result<()> {
    let mesh = scene.add_mesh(assets::load_mesh(assets_dir, spec)?);

    let albedo = scene.add_texture(assets::load_texture(
        assets_dir,
        spec.name,
        "albedo",
        ColorSpace::Srgb,
        || TextureData::checkerboard(128, 16, spec.tint.0, spec.tint.1),
    )?);
    let metallic = scene.add_texture(assets::load_texture(
        assets_dir,
        spec.name,
        "metallic",
        ColorSpace::Linear,
        || TextureData::solid([spec.metallic, spec.metallic, spec.metallic, 255], ColorSpace::Linear),
    )?);
    let roughness = scene.add_texture(assets::load_texture(
        assets_dir,
        spec.name,
        "roughness",
        ColorSpace::Linear,
        || {
            TextureData::solid(
                [spec.roughness, spec.roughness, spec.roughness, 255],
                ColorSpace::Linear,
            )
        },
    )?);
    let normal = scene.add_texture(assets::load_texture(
        assets_dir,
        spec.name,
        "normal",
        ColorSpace::Linear,
        TextureData::flat_normal,
    )?);

    let material = scene.add_material(PbrMaterial::new(albedo, metallic, roughness, normal));

    scene.add_instance(
        MeshInstance::new(mesh, material)
            .transform(
                Mat4::from_translation(spec.translation) * Mat4::from_rotation_y(spec.rotation_y),
            )
            .cast_shadows(true),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_scene() -> Scene {
        // A path that cannot exist: every asset falls back to placeholders.
        build_scene(Path::new("/nonexistent/shamash-assets")).unwrap()
    }

    #[test]
    fn scene_has_five_shadow_casting_props() {
        let scene = placeholder_scene();
        assert_eq!(scene.instances().len(), 5);
        assert!(scene.instances().iter().all(|i| i.cast_shadows));
    }

    #[test]
    fn prop_placements_match_the_layout() {
        let scene = placeholder_scene();
        let translations: Vec<Vec3> = scene
            .instances()
            .iter()
            .map(|i| i.transform.w_axis.truncate())
            .collect();
        assert!(translations.contains(&Vec3::new(0.0, 0.0, -4.0)));
        assert!(translations.contains(&Vec3::new(4.0, 0.0, -4.0)));
        // The whole row shares the z = -4 line.
        assert!(translations.iter().all(|t| t.z == -4.0));
    }

    #[test]
    fn pump_is_rotated_about_y() {
        let scene = placeholder_scene();
        // Index 3 is the pump; its rotation turns +X toward -Z.
        let rotated = scene.instances()[3].transform.transform_vector3(Vec3::X);
        assert!(rotated.z < -0.99);
    }

    #[test]
    fn lighting_matches_the_sample_configuration() {
        let scene = placeholder_scene();

        let sun = scene.sun().expect("sun configured");
        assert_eq!(sun.intensity, 110_000.0);
        assert!(sun.cast_shadows);
        assert_eq!(sun.angular_radius, 1.9);

        assert_eq!(scene.environment().intensity, 100_000.0);

        let sky = scene.skybox().expect("skybox configured");
        assert_eq!(sky.color, Color::new(0.5, 0.75, 1.0, 1.0));
    }

    #[test]
    fn ground_plane_catches_shadows_at_the_row_center() {
        let scene = placeholder_scene();
        let ground = scene.ground_plane().expect("ground configured");
        assert_eq!(ground.half_extent, 10.0);
        assert_eq!(ground.strength, 0.7);
        assert_eq!(
            ground.transform.w_axis.truncate(),
            Vec3::new(3.0, 0.0, -4.0)
        );
    }

    #[test]
    fn caster_bounds_cover_the_prop_row() {
        let scene = placeholder_scene();
        let b = scene.caster_bounds();
        assert!(b.min.x < 0.0 && b.max.x > 4.0);
        assert!(b.min.z < -3.9 && b.max.z > -4.6);
    }
}
