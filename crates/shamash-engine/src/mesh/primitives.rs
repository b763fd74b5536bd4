//! Procedural primitives.
//!
//! The ground quad is engine geometry; cube/sphere serve as placeholder
//! stand-ins when a model container is unavailable.

use glam::{Vec2, Vec3};

use super::{MeshData, Vertex};

impl MeshData {
    /// Quad in the XZ plane facing +Y, spanning ±`half_extent`.
    pub fn plane(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = [
            Vec3::new(-h, 0.0, -h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
        ];
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];

        let mut mesh = Self {
            vertices: positions
                .iter()
                .zip(uvs.iter())
                .map(|(&p, &uv)| Vertex::new(p, Vec3::Y, uv))
                .collect(),
            indices: vec![0, 1, 2, 2, 3, 0],
        };
        mesh.ensure_tangents();
        mesh
    }

    /// Axis-aligned cube spanning ±`half_extent`, four vertices per face so
    /// normals stay flat.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        // (normal, tangent-direction axis) per face; vertices wound CCW as
        // seen from outside.
        let faces: [(Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X),
            (Vec3::NEG_Z, Vec3::NEG_X),
            (Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_X, Vec3::Z),
            (Vec3::Y, Vec3::X),
            (Vec3::NEG_Y, Vec3::X),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (n, t) in faces {
            let b = n.cross(t);
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let pos = (n + t * su + b * sv) * h;
                let uv = Vec2::new(su * 0.5 + 0.5, 0.5 - sv * 0.5);
                vertices.push(Vertex::new(pos, n, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        let mut mesh = Self { vertices, indices };
        mesh.ensure_tangents();
        mesh
    }

    /// UV sphere with `segments` rings and sectors.
    pub fn sphere(radius: f32, segments: u32) -> Self {
        let rings = segments.max(3);
        let sectors = segments.max(3);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let ring_step = std::f32::consts::PI / rings as f32;
        let sector_step = 2.0 * std::f32::consts::PI / sectors as f32;

        for i in 0..=rings {
            let phi = i as f32 * ring_step;
            let (sin_phi, cos_phi) = phi.sin_cos();

            for j in 0..=sectors {
                let theta = j as f32 * sector_step;
                let (sin_theta, cos_theta) = theta.sin_cos();

                let n = Vec3::new(cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
                let uv = Vec2::new(1.0 - j as f32 / sectors as f32, i as f32 / rings as f32);
                vertices.push(Vertex::new(n * radius, n, uv));
            }
        }

        for i in 0..rings {
            for j in 0..sectors {
                let first = i * (sectors + 1) + j;
                let second = first + sectors + 1;

                indices.extend_from_slice(&[first, first + 1, second]);
                indices.extend_from_slice(&[second, first + 1, second + 1]);
            }
        }

        let mut mesh = Self { vertices, indices };
        mesh.ensure_tangents();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_is_a_valid_quad() {
        let m = MeshData::plane(10.0);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.index_count(), 6);
        assert!(m.is_valid());
        assert_eq!(m.aabb().min, Vec3::new(-10.0, 0.0, -10.0));
        assert_eq!(m.aabb().max, Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn plane_faces_up_with_ccw_winding() {
        let m = MeshData::plane(1.0);
        for tri in m.indices.chunks_exact(3) {
            let p0 = m.vertices[tri[0] as usize].position;
            let p1 = m.vertices[tri[1] as usize].position;
            let p2 = m.vertices[tri[2] as usize].position;
            let face = (p1 - p0).cross(p2 - p0);
            assert!(face.y > 0.0, "triangle winds away from +Y");
        }
    }

    #[test]
    fn cube_has_flat_faces() {
        let m = MeshData::cube(0.5);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.index_count(), 36);
        assert!(m.is_valid());
        for v in &m.vertices {
            // Every normal is axis-aligned and the vertex lies on that face.
            assert!((v.normal.length() - 1.0).abs() < 1e-6);
            assert!((v.position.dot(v.normal) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn sphere_normals_are_radial() {
        let m = MeshData::sphere(0.4, 16);
        assert!(m.is_valid());
        for v in &m.vertices {
            assert!((v.position.length() - 0.4).abs() < 1e-5);
            assert!((v.normal - v.position / 0.4).length() < 1e-4);
        }
    }

    #[test]
    fn closed_primitives_wind_outward() {
        for m in [MeshData::cube(0.5), MeshData::sphere(1.0, 12)] {
            for tri in m.indices.chunks_exact(3) {
                let p0 = m.vertices[tri[0] as usize].position;
                let p1 = m.vertices[tri[1] as usize].position;
                let p2 = m.vertices[tri[2] as usize].position;
                let face = (p1 - p0).cross(p2 - p0);
                if face.length_squared() < 1e-12 {
                    continue; // degenerate pole triangle
                }
                let centroid = (p0 + p1 + p2) / 3.0;
                assert!(
                    face.dot(centroid) > 0.0,
                    "inward-facing triangle at {centroid:?}"
                );
            }
        }
    }

    #[test]
    fn primitives_carry_tangents() {
        for m in [
            MeshData::plane(1.0),
            MeshData::cube(0.5),
            MeshData::sphere(1.0, 12),
        ] {
            for v in &m.vertices {
                assert!((v.tangent.truncate().length() - 1.0).abs() < 1e-3);
            }
        }
    }
}
