use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use super::Aabb;

/// Vertex attributes used by every mesh pass.
///
/// Tangents are `Vec4`: xyz is the tangent direction, w is the bitangent
/// handedness (±1), matching the GLB convention.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec4,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            tangent: Vec4::ZERO,
            uv,
        }
    }

    /// Packs the vertex for GPU upload.
    pub fn to_raw(&self) -> RawVertex {
        RawVertex {
            position: self.position.to_array(),
            normal: self.normal.to_array(),
            tangent: self.tangent.to_array(),
            uv: self.uv.to_array(),
        }
    }
}

/// GPU vertex layout shared by the shadow and PBR pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct RawVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 4],
    pub uv: [f32; 2],
}

impl RawVertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x4, // tangent (w = handedness)
        3 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RawVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Mesh geometry ready for upload.
///
/// Immutable once registered with a scene; the renderer uploads it at most
/// once per mesh id.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    /// Local-space bounds over all vertex positions.
    pub fn aabb(&self) -> Aabb {
        let mut b = Aabb::empty();
        for v in &self.vertices {
            b.union_point(v.position);
        }
        if !b.is_valid() {
            // Empty meshes report a unit box so downstream fitting stays finite.
            b = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        }
        b
    }

    /// Rebuilds normals when any are missing (zero-length).
    ///
    /// Face normals are accumulated unnormalized, so large triangles weigh
    /// more, then the per-vertex sums are normalized (smooth shading).
    pub fn ensure_normals(&mut self) {
        let missing = self
            .vertices
            .iter()
            .any(|v| v.normal.length_squared() < 1e-6);
        if !missing {
            return;
        }

        for v in &mut self.vertices {
            v.normal = Vec3::ZERO;
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len() {
                continue;
            }
            let p0 = self.vertices[i0].position;
            let p1 = self.vertices[i1].position;
            let p2 = self.vertices[i2].position;
            let face = (p1 - p0).cross(p2 - p0);
            self.vertices[i0].normal += face;
            self.vertices[i1].normal += face;
            self.vertices[i2].normal += face;
        }

        for v in &mut self.vertices {
            let len = v.normal.length();
            v.normal = if len > 1e-6 { v.normal / len } else { Vec3::Y };
        }
    }

    /// Rebuilds tangents when any are missing (zero-length).
    ///
    /// Per-triangle tangent/bitangent directions are derived from the UV
    /// parameterization, accumulated per vertex, then Gram-Schmidt
    /// orthogonalized against the normal. Handedness comes from the
    /// accumulated bitangent. Call after `ensure_normals`.
    pub fn ensure_tangents(&mut self) {
        let missing = self
            .vertices
            .iter()
            .any(|v| v.tangent.truncate().length_squared() < 1e-6);
        if !missing {
            return;
        }

        let mut tan = vec![Vec3::ZERO; self.vertices.len()];
        let mut bitan = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if i0 >= self.vertices.len() || i1 >= self.vertices.len() || i2 >= self.vertices.len() {
                continue;
            }
            let (v0, v1, v2) = (&self.vertices[i0], &self.vertices[i1], &self.vertices[i2]);

            let e1 = v1.position - v0.position;
            let e2 = v2.position - v0.position;
            let duv1 = v1.uv - v0.uv;
            let duv2 = v2.uv - v0.uv;

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            if det.abs() < 1e-12 {
                // Degenerate UV mapping contributes nothing.
                continue;
            }
            let r = 1.0 / det;
            let t = (e1 * duv2.y - e2 * duv1.y) * r;
            let b = (e2 * duv1.x - e1 * duv2.x) * r;

            for i in [i0, i1, i2] {
                tan[i] += t;
                bitan[i] += b;
            }
        }

        for (i, v) in self.vertices.iter_mut().enumerate() {
            let n = v.normal;
            let t = tan[i] - n * n.dot(tan[i]);
            let t = if t.length_squared() > 1e-12 {
                t.normalize()
            } else {
                fallback_tangent(n)
            };
            let w = if n.cross(t).dot(bitan[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            v.tangent = t.extend(w);
        }
    }
}

/// An arbitrary unit vector orthogonal to `n`, for vertices whose UV
/// neighborhood gave no usable tangent direction.
fn fallback_tangent(n: Vec3) -> Vec3 {
    let axis = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let t = axis - n * n.dot(axis);
    if t.length_squared() > 1e-12 {
        t.normalize()
    } else {
        Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        // Unit quad in the XZ plane, facing +Y, with a planar UV map.
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        MeshData {
            vertices: positions
                .iter()
                .zip(uvs.iter())
                .map(|(&p, &uv)| Vertex::new(p, Vec3::ZERO, uv))
                .collect(),
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn quad_is_valid() {
        assert!(quad().is_valid());
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mut m = quad();
        m.indices[0] = 99;
        assert!(!m.is_valid());
    }

    #[test]
    fn non_triangle_index_count_is_invalid() {
        let mut m = quad();
        m.indices.pop();
        assert!(!m.is_valid());
    }

    // ── normals ───────────────────────────────────────────────────────────

    #[test]
    fn ensure_normals_reconstructs_face_normal() {
        let mut m = quad();
        m.ensure_normals();
        for v in &m.vertices {
            assert!((v.normal - Vec3::Y).length() < 1e-5, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn ensure_normals_keeps_existing_normals() {
        let mut m = quad();
        for v in &mut m.vertices {
            v.normal = Vec3::X;
        }
        m.ensure_normals();
        assert_eq!(m.vertices[0].normal, Vec3::X);
    }

    // ── tangents ──────────────────────────────────────────────────────────

    #[test]
    fn tangents_are_unit_and_orthogonal_to_normals() {
        let mut m = quad();
        m.ensure_normals();
        m.ensure_tangents();
        for v in &m.vertices {
            let t = v.tangent.truncate();
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!(t.dot(v.normal).abs() < 1e-4);
            assert!(v.tangent.w.abs() == 1.0);
        }
    }

    #[test]
    fn tangent_follows_u_direction() {
        let mut m = quad();
        m.ensure_normals();
        m.ensure_tangents();
        // U increases along +X on this quad, so tangents must point along +X.
        for v in &m.vertices {
            assert!(v.tangent.x > 0.9, "tangent {:?}", v.tangent);
        }
    }

    #[test]
    fn degenerate_uvs_get_fallback_tangents() {
        let mut m = quad();
        for v in &mut m.vertices {
            v.uv = Vec2::ZERO;
        }
        m.ensure_normals();
        m.ensure_tangents();
        for v in &m.vertices {
            let t = v.tangent.truncate();
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!(t.dot(v.normal).abs() < 1e-4);
        }
    }

    // ── aabb ──────────────────────────────────────────────────────────────

    #[test]
    fn aabb_covers_all_positions() {
        let b = quad().aabb();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn empty_mesh_reports_unit_box() {
        let b = MeshData::default().aabb();
        assert_eq!(b.extent(), Vec3::ONE);
    }
}
