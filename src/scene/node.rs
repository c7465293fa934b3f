//! Named model components and their surface materials.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::geometry::Aabb;

/// Surface parameters for a component or liquid mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base linear RGB colour.
    pub color: [f32; 3],
    /// Emissive linear RGB colour.
    pub emissive: [f32; 3],
    /// Alpha in `[0, 1]`; only honoured when `transparent` is set.
    pub opacity: f32,
    /// Whether the renderer should alpha-blend this surface.
    pub transparent: bool,
    /// PBR roughness.
    pub roughness: f32,
    /// PBR metalness.
    pub metalness: f32,
    /// Physical transmission (refractive liquids).
    pub transmission: f32,
    /// Index of refraction.
    pub ior: f32,
}

impl Material {
    /// Opaque painted metal.
    #[must_use]
    pub fn solid(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            opacity: 1.0,
            transparent: false,
            roughness: 0.5,
            metalness: 0.3,
            transmission: 0.0,
            ior: 1.5,
        }
    }

    /// Refractive translucent fuel.
    #[must_use]
    pub fn liquid(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            opacity: 0.4,
            transparent: true,
            roughness: 0.05,
            metalness: 0.0,
            transmission: 0.95,
            ior: 1.33,
        }
    }

    /// Switch to alpha blending at `opacity`.
    pub fn make_translucent(&mut self, opacity: f32) {
        self.transparent = true;
        self.opacity = opacity;
    }

    /// Restore full opacity with blending off.
    pub fn make_opaque(&mut self) {
        self.transparent = false;
        self.opacity = 1.0;
    }
}

/// One node of the loaded model: a named rigid part with optional children.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Stable component name.
    pub name: String,
    /// Local translation.
    pub position: Vec3,
    /// Euler rotation (XYZ order, radians).
    pub rotation: Vec3,
    /// Local scale.
    pub scale: Vec3,
    /// World-space bounds of this node's own geometry.
    pub bounds: Aabb,
    /// Surface material, `None` for pure grouping nodes.
    pub material: Option<Material>,
    /// Child nodes.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Leaf mesh node with unit scale centred on its bounds.
    #[must_use]
    pub fn mesh(name: impl Into<String>, bounds: Aabb, material: Material) -> Self {
        Self {
            name: name.into(),
            position: bounds.center(),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            bounds,
            material: Some(material),
            children: Vec::new(),
        }
    }

    /// Bounds of this node and all descendants.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.children
            .iter()
            .fold(self.bounds, |acc, child| acc.union(&child.bounding_box()))
    }

    /// Visit every material in the subtree.
    pub fn for_each_material_mut(&mut self, f: &mut impl FnMut(&mut Material)) {
        if let Some(material) = &mut self.material {
            f(material);
        }
        for child in &mut self.children {
            child.for_each_material_mut(f);
        }
    }

    /// Apply `opacity` to every material in the subtree.
    pub fn set_translucent(&mut self, opacity: f32) {
        self.for_each_material_mut(&mut |m| m.make_translucent(opacity));
    }

    /// Restore every material in the subtree to opaque.
    pub fn set_opaque(&mut self) {
        self.for_each_material_mut(&mut Material::make_opaque);
    }
}

/// Name → component table supplied by the model loader.
#[derive(Debug, Clone, Default)]
pub struct Components {
    nodes: FxHashMap<String, SceneNode>,
}

impl Components {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a node under its own name.
    pub fn insert(&mut self, node: SceneNode) {
        let _ = self.nodes.insert(node.name.clone(), node);
    }

    /// Look up a component.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.get(name)
    }

    /// Look up a component mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.nodes.get_mut(name)
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sorted component names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<SceneNode> for Components {
    fn from_iter<I: IntoIterator<Item = SceneNode>>(iter: I) -> Self {
        let mut components = Self::new();
        for node in iter {
            components.insert(node);
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn casing() -> SceneNode {
        let mut node = SceneNode::mesh(
            "Top_Casing",
            Aabb::from_center_size(Vec3::ZERO, Vec3::ONE),
            Material::solid([0.6; 3]),
        );
        node.children.push(SceneNode::mesh(
            "Top_Casing_bolt",
            Aabb::from_center_size(Vec3::Y, Vec3::splat(0.2)),
            Material::solid([0.3; 3]),
        ));
        node
    }

    #[test]
    fn bounding_box_includes_children() {
        let b = casing().bounding_box();
        assert!((b.max.y - 1.1).abs() < 1e-6);
        assert!((b.min.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn translucency_reaches_every_child() {
        let mut node = casing();
        node.set_translucent(0.3);
        let mut seen = 0;
        node.for_each_material_mut(&mut |m| {
            assert!(m.transparent);
            assert_eq!(m.opacity, 0.3);
            seen += 1;
        });
        assert_eq!(seen, 2);

        node.set_opaque();
        node.for_each_material_mut(&mut |m| {
            assert!(!m.transparent);
            assert_eq!(m.opacity, 1.0);
        });
    }

    #[test]
    fn components_lookup() {
        let table: Components = [casing()].into_iter().collect();
        assert!(table.contains("Top_Casing"));
        assert!(table.get("Left_pipe").is_none());
        assert_eq!(table.names(), vec!["Top_Casing"]);
    }
}
