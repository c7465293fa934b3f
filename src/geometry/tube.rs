//! Circular-section tubes swept along a polyline.

use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::MeshData;
use super::spline::frame_path;

/// Sweep a circle of `radius` along `path` using rotation-minimizing frames.
///
/// Open-ended (no caps). Paths with fewer than two points produce an empty
/// mesh.
#[must_use]
pub fn sweep_tube(path: &[Vec3], radius: f32, radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    if path.len() < 2 {
        return mesh;
    }

    let radial = radial_segments.max(3);
    let frames = frame_path(path);

    for frame in &frames {
        for r in 0..=radial {
            let theta = r as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let dir = frame.normal * cos + frame.binormal * sin;
            mesh.push_vertex(frame.pos + dir * radius, dir);
        }
    }

    let stride = radial + 1;
    for ring in 0..frames.len() as u32 - 1 {
        for r in 0..radial {
            let a = ring * stride + r;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }
    mesh
}
