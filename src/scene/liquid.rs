//! Renderable fuel: liquid meshes with fill level, and particle clouds.

use glam::{Mat4, Quat, Vec3};

use super::node::Material;
use crate::geometry::{Aabb, MeshData};

/// Fill-axis scale of an empty liquid mesh. Never exactly zero so the mesh
/// never degenerates.
pub const EMPTY_FILL: f32 = 0.01;

/// World-space clipping plane. Fragments with negative signed distance are
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    /// Unit normal pointing into the kept half-space.
    pub normal: Vec3,
    /// Plane offset: `distance(p) = normal · p + constant`.
    pub constant: f32,
}

impl ClipPlane {
    /// Signed distance of `p` from the plane.
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.constant
    }

    /// Whether `p` survives clipping.
    #[must_use]
    pub fn keeps(&self, p: Vec3) -> bool {
        self.distance(p) >= 0.0
    }
}

/// Liquid column inside a pipe segment or the tank.
///
/// The fill level lives in `scale.y`; the other axes keep `base_scale`.
#[derive(Debug, Clone)]
pub struct LiquidMesh {
    /// Debug label.
    pub name: String,
    /// Object-space geometry.
    pub geometry: MeshData,
    /// Surface parameters (opacity shimmers while flowing).
    pub material: Material,
    /// World translation.
    pub position: Vec3,
    /// Translation restored on reset.
    pub home_position: Vec3,
    /// Current scale.
    pub scale: Vec3,
    /// Non-fill scale inherited from the host pipe.
    pub base_scale: Vec3,
    /// Render toggle.
    pub visible: bool,
    /// Active clipping planes.
    pub clip_planes: Vec<ClipPlane>,
    /// Whether the mesh casts shadows.
    pub cast_shadow: bool,
}

impl LiquidMesh {
    /// New hidden, empty liquid mesh at `position`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        geometry: MeshData,
        material: Material,
        position: Vec3,
        base_scale: Vec3,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            position,
            home_position: position,
            scale: Vec3::new(base_scale.x, EMPTY_FILL, base_scale.z),
            base_scale,
            visible: false,
            clip_planes: Vec::new(),
            cast_shadow: false,
        }
    }

    /// Current fill-axis scale.
    #[must_use]
    pub fn fill_level(&self) -> f32 {
        self.scale.y
    }

    /// Set the fill-axis scale.
    pub fn set_fill_level(&mut self, level: f32) {
        self.scale.y = level;
    }

    /// Whether the mesh is at the empty sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scale.y <= EMPTY_FILL
    }

    /// Hide, empty, return home and drop clipping planes.
    pub fn reset(&mut self) {
        self.visible = false;
        self.scale = Vec3::new(self.base_scale.x, EMPTY_FILL, self.base_scale.z);
        self.position = self.home_position;
        self.clip_planes.clear();
    }

    /// Object → world transform.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position)
    }

    /// Transform an object-space point to world space.
    #[must_use]
    pub fn world_point(&self, local: Vec3) -> Vec3 {
        self.position + local * self.scale
    }

    /// World-space bounds of the geometry, ignoring clipping.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Aabb> {
        let b = self.geometry.bounds()?;
        Some(Aabb::new(
            self.world_point(b.min),
            self.world_point(b.max),
        ))
    }
}

/// Point sprites drawn along a pipe.
#[derive(Debug, Clone)]
pub struct PointCloud {
    /// Host pipe name.
    pub name: String,
    /// World positions, one per particle slot.
    pub positions: Vec<Vec3>,
    /// Sprite material.
    pub material: Material,
    /// Sprite size in world units.
    pub point_size: f32,
    /// Render toggle.
    pub visible: bool,
    /// Number of leading positions to draw.
    pub draw_count: usize,
}

impl PointCloud {
    /// Hidden cloud with the given initial positions.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        material: Material,
        point_size: f32,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            material,
            point_size,
            visible: false,
            draw_count: 0,
        }
    }

    /// Positions that should be drawn this frame.
    #[must_use]
    pub fn drawn(&self) -> &[Vec3] {
        &self.positions[..self.draw_count.min(self.positions.len())]
    }

    /// Raw bytes of the drawn positions for GPU upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.drawn())
    }
}
