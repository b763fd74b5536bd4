//! GLB container reading.
//!
//! Models arrive as self-contained binary GLB containers produced by offline
//! tooling. All primitives of the container's scene are flattened into one
//! `MeshData`, with node transforms baked into the vertices; the viewer
//! positions the result with a single instance transform.

use anyhow::{Context, Result, bail};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use super::{MeshData, Vertex};

impl MeshData {
    /// Reads every triangle primitive reachable from the container's scene.
    ///
    /// External (URI) buffers are rejected: a precompiled container must be
    /// self-contained. Missing normals/tangents are reconstructed.
    pub fn from_glb_bytes(bytes: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice(bytes).context("failed to parse GLB container")?;
        let blob = gltf.blob.as_deref();
        let document = &gltf.document;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("GLB container has no scene")?;

        let mut mesh = MeshData::default();
        for node in scene.nodes() {
            read_node(&node, Mat4::IDENTITY, blob, &mut mesh)?;
        }

        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            bail!("GLB container has no triangle geometry");
        }
        if !mesh.is_valid() {
            bail!("GLB container has out-of-range indices");
        }

        mesh.ensure_normals();
        mesh.ensure_tangents();
        Ok(mesh)
    }
}

fn read_node(
    node: &gltf::Node,
    parent: Mat4,
    blob: Option<&[u8]>,
    out: &mut MeshData,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(gltf_mesh) = node.mesh() {
        for primitive in gltf_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "skipping non-triangle primitive (mode {:?}) in GLB mesh",
                    primitive.mode()
                );
                continue;
            }
            read_primitive(&primitive, world, blob, out)?;
        }
    }

    for child in node.children() {
        read_node(&child, world, blob, out)?;
    }
    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive,
    world: Mat4,
    blob: Option<&[u8]>,
    out: &mut MeshData,
) -> Result<()> {
    let reader = primitive.reader(|buffer| match buffer.source() {
        gltf::buffer::Source::Bin => blob,
        gltf::buffer::Source::Uri(_) => None,
    });

    let positions = reader
        .read_positions()
        .context("GLB primitive has no positions (external buffers are not supported)")?;

    // Normals are rotated/scale-corrected with the inverse transpose; a
    // non-invertible node transform falls back to the plain rotation part.
    let normal_matrix = {
        let m = Mat3::from_mat4(world);
        let inv = m.inverse();
        if inv.is_finite() {
            inv.transpose()
        } else {
            m
        }
    };

    let base_vertex = out.vertices.len() as u32;

    for p in positions {
        let position = world.transform_point3(Vec3::from_array(p));
        out.vertices.push(Vertex::new(position, Vec3::ZERO, Vec2::ZERO));
    }

    if let Some(normals) = reader.read_normals() {
        for (i, n) in normals.enumerate() {
            if let Some(v) = out.vertices.get_mut(base_vertex as usize + i) {
                v.normal = (normal_matrix * Vec3::from_array(n)).normalize_or_zero();
            }
        }
    }

    if let Some(tangents) = reader.read_tangents() {
        for (i, t) in tangents.enumerate() {
            if let Some(v) = out.vertices.get_mut(base_vertex as usize + i) {
                let dir = (Mat3::from_mat4(world) * Vec3::new(t[0], t[1], t[2])).normalize_or_zero();
                v.tangent = Vec4::new(dir.x, dir.y, dir.z, t[3]);
            }
        }
    }

    if let Some(uvs) = reader.read_tex_coords(0) {
        for (i, uv) in uvs.into_f32().enumerate() {
            if let Some(v) = out.vertices.get_mut(base_vertex as usize + i) {
                v.uv = Vec2::from_array(uv);
            }
        }
    }

    match reader.read_indices() {
        Some(indices) => {
            for i in indices.into_u32() {
                out.indices.push(base_vertex + i);
            }
        }
        None => {
            // Unindexed primitive: consecutive triangles.
            let count = out.vertices.len() as u32 - base_vertex;
            out.indices.extend(base_vertex..base_vertex + count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal, valid GLB: one triangle, positions + u32 indices,
    /// no normals/uvs/tangents (those must be reconstructed).
    fn tiny_glb(translation: [f32; 3]) -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices: [u32; 3] = [0, 1, 2];

        let mut bin: Vec<u8> = Vec::new();
        for f in positions {
            bin.extend_from_slice(&f.to_le_bytes());
        }
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }

        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"#,
                r#""scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{{"mesh":0,"translation":[{},{},{}]}}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],"#,
                r#""buffers":[{{"byteLength":{}}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},"#,
                r#"{{"buffer":0,"byteOffset":36,"byteLength":12}}],"#,
                r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
                r#"{{"bufferView":1,"componentType":5125,"count":3,"type":"SCALAR"}}]}}"#
            ),
            translation[0],
            translation[1],
            translation[2],
            bin.len(),
        );

        let mut json_bytes = json.into_bytes();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&0x4654_6C67u32.to_le_bytes()); // "glTF"
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes()); // "JSON"
        glb.extend_from_slice(&json_bytes);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(&0x004E_4942u32.to_le_bytes()); // "BIN\0"
        glb.extend_from_slice(&bin);
        glb
    }

    #[test]
    fn reads_triangle_from_container() {
        let mesh = MeshData::from_glb_bytes(&tiny_glb([0.0, 0.0, 0.0])).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn node_transform_is_baked_into_vertices() {
        let mesh = MeshData::from_glb_bytes(&tiny_glb([3.0, 0.0, -4.0])).unwrap();
        assert_eq!(mesh.vertices[0].position, Vec3::new(3.0, 0.0, -4.0));
        assert_eq!(mesh.vertices[1].position, Vec3::new(4.0, 0.0, -4.0));
    }

    #[test]
    fn reconstructs_missing_normals_and_tangents() {
        let mesh = MeshData::from_glb_bytes(&tiny_glb([0.0, 0.0, 0.0])).unwrap();
        for v in &mesh.vertices {
            // CCW triangle in the XY plane faces +Z.
            assert!((v.normal - Vec3::Z).length() < 1e-5);
            assert!((v.tangent.truncate().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(MeshData::from_glb_bytes(b"not a container").is_err());
    }

    #[test]
    fn truncated_container_is_rejected() {
        let glb = tiny_glb([0.0, 0.0, 0.0]);
        assert!(MeshData::from_glb_bytes(&glb[..glb.len() / 2]).is_err());
    }
}
