//! CPU-side triangle meshes for liquid columns and tank fuel.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use super::aabb::Aabb;

/// Vertex layout shared by every generated liquid mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LiquidVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

/// Indexed triangle list in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex array.
    pub vertices: Vec<LiquidVertex>,
    /// Triangle indices (three per face).
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Closed cylinder centred on the origin, axis along +Y.
    ///
    /// Side vertices duplicate the seam so normals stay continuous.
    #[must_use]
    pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height * 0.5;
        let mut mesh = Self::default();

        for y in [half, -half] {
            for s in 0..=segments {
                let theta = s as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                mesh.push_vertex(
                    Vec3::new(radius * sin, y, radius * cos),
                    Vec3::new(sin, 0.0, cos),
                );
            }
        }

        let stride = segments + 1;
        for s in 0..segments {
            let (a, b, c, d) = (s, s + stride, s + stride + 1, s + 1);
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        mesh.push_cap(radius, half, segments);
        mesh.push_cap(radius, -half, segments);
        mesh
    }

    /// Axis-aligned box centred on the origin.
    #[must_use]
    pub fn cuboid(size: Vec3) -> Self {
        let half = size * 0.5;
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Self::default();
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            {
                mesh.push_vertex((normal + u * su + v * sv) * half, normal);
            }
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }
        mesh
    }

    /// Append a vertex.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.push(LiquidVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        });
    }

    /// Fan-triangulated disc at height `y`; normal follows the sign of `y`.
    fn push_cap(&mut self, radius: f32, y: f32, segments: u32) {
        let normal = if y >= 0.0 { Vec3::Y } else { Vec3::NEG_Y };
        let center = self.vertices.len() as u32;
        self.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        for s in 0..=segments {
            let theta = s as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
        for s in 0..segments {
            let a = center + 1 + s;
            if normal.y > 0.0 {
                self.indices.extend_from_slice(&[center, a, a + 1]);
            } else {
                self.indices.extend_from_slice(&[center, a + 1, a]);
            }
        }
    }

    /// Shift every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).to_array();
        }
    }

    /// Rotate every vertex and normal about the Z axis.
    pub fn rotate_z(&mut self, angle: f32) {
        let q = Quat::from_rotation_z(angle);
        for v in &mut self.vertices {
            v.position = (q * Vec3::from(v.position)).to_array();
            v.normal = (q * Vec3::from(v.normal)).to_array();
        }
    }

    /// Non-uniform rescale of positions (normals are re-normalized with the
    /// inverse scale).
    pub fn scale_axes(&mut self, scale: Vec3) {
        let inv = Vec3::ONE / scale;
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) * scale).to_array();
            v.normal = (Vec3::from(v.normal) * inv).normalize_or_zero().to_array();
        }
    }

    /// Object-space bounds, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw vertex bytes for GPU upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn cylinder_extents() {
        let mesh = MeshData::cylinder(0.5, 2.0, 16);
        let b = mesh.bounds().unwrap();
        assert!((b.size().y - 2.0).abs() < 1e-5);
        assert!((b.size().x - 1.0).abs() < 1e-3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn cylinder_rotated_lies_along_x() {
        let mut mesh = MeshData::cylinder(0.1, 3.0, 8);
        mesh.rotate_z(FRAC_PI_2);
        let size = mesh.bounds().unwrap().size();
        assert!((size.x - 3.0).abs() < 1e-4);
        assert!(size.y < 0.3);
    }

    #[test]
    fn cuboid_has_twelve_triangles() {
        let mesh = MeshData::cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds().unwrap().size(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn byte_views_match_lengths() {
        let mesh = MeshData::cuboid(Vec3::ONE);
        assert_eq!(
            mesh.vertex_bytes().len(),
            mesh.vertices.len() * size_of::<LiquidVertex>()
        );
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }
}
