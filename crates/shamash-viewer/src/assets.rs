//! Asset loading with placeholder fallback.
//!
//! Layout per model under the assets directory:
//!
//! ```text
//! <dir>/<name>/<name>.glb
//! <dir>/<name>/<name>_albedo.png
//! <dir>/<name>/<name>_metallic.png
//! <dir>/<name>/<name>_roughness.png
//! <dir>/<name>/<name>_normal.png
//! ```
//!
//! A missing file logs a warning and substitutes a procedural placeholder;
//! a file that exists but fails to parse is a hard error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use shamash_engine::mesh::MeshData;
use shamash_engine::texture::{ColorSpace, TextureData};

use crate::sample::ModelSpec;

fn model_file(dir: &Path, name: &str, suffix: &str) -> PathBuf {
    dir.join(name).join(format!("{name}{suffix}"))
}

/// Loads the model's GLB container, or its placeholder primitive.
pub fn load_mesh(dir: &Path, spec: &ModelSpec) -> Result<MeshData> {
    let path = model_file(dir, spec.name, ".glb");
    match std::fs::read(&path) {
        Ok(bytes) => MeshData::from_glb_bytes(&bytes)
            .with_context(|| format!("malformed mesh container {}", path.display())),
        Err(_) => {
            log::warn!(
                "{} not found, using placeholder geometry for {}",
                path.display(),
                spec.name
            );
            Ok(spec.placeholder_mesh())
        }
    }
}

/// Loads one texture map, or builds its placeholder.
pub fn load_texture(
    dir: &Path,
    name: &str,
    map: &str,
    color_space: ColorSpace,
    placeholder: impl FnOnce() -> TextureData,
) -> Result<TextureData> {
    let path = model_file(dir, name, &format!("_{map}.png"));
    match std::fs::read(&path) {
        Ok(bytes) => TextureData::decode(&bytes, color_space)
            .with_context(|| format!("malformed texture {}", path.display())),
        Err(_) => {
            log::warn!("{} not found, using placeholder {map} map", path.display());
            Ok(placeholder())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::MODELS;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shamash-assets-{}-{tag}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_fall_back_to_placeholders() {
        let dir = PathBuf::from("/definitely/not/a/real/assets/dir");
        let spec = &MODELS[0];

        let mesh = load_mesh(&dir, spec).unwrap();
        assert!(mesh.is_valid());

        let tex = load_texture(&dir, spec.name, "albedo", ColorSpace::Srgb, || {
            TextureData::solid([255; 4], ColorSpace::Srgb)
        })
        .unwrap();
        assert_eq!(tex.width(), 1);
    }

    #[test]
    fn present_but_malformed_files_are_hard_errors() {
        let dir = scratch_dir("malformed");
        let spec = &MODELS[0];

        let model_dir = dir.join(spec.name);
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join(format!("{}.glb", spec.name)), b"garbage").unwrap();
        std::fs::write(model_dir.join(format!("{}_albedo.png", spec.name)), b"junk").unwrap();

        assert!(load_mesh(&dir, spec).is_err());
        assert!(
            load_texture(&dir, spec.name, "albedo", ColorSpace::Srgb, || {
                TextureData::solid([255; 4], ColorSpace::Srgb)
            })
            .is_err()
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
