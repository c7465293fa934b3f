//! TOML description of the model's named components.
//!
//! Stands in for the binary model loader: each entry gives a part's
//! world-space bounds and surface, which is all the animation core reads.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::node::{Components, Material, SceneNode};
use crate::error::FlowError;
use crate::geometry::Aabb;

const FADEC_LAYOUT: &str = include_str!("../../assets/layouts/fadec.toml");

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn default_color() -> [f32; 3] {
    [0.6; 3]
}

fn full_opacity() -> f32 {
    1.0
}

/// One named part and its sub-parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    /// Stable component name.
    pub name: String,
    /// World-space centre of the bounds.
    pub center: [f32; 3],
    /// World-space extents.
    pub size: [f32; 3],
    /// Object scale (liquid meshes inherit its non-fill axes).
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Euler rotation in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Base colour.
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    /// Initial opacity; below 1 makes the part translucent.
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    /// Child parts sharing this component's name lookup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ComponentDef>,
}

impl ComponentDef {
    fn into_node(self) -> SceneNode {
        let bounds = Aabb::from_center_size(self.center.into(), self.size.into());
        let mut material = Material::solid(self.color);
        if self.opacity < 1.0 {
            material.make_translucent(self.opacity);
        }
        SceneNode {
            name: self.name,
            position: bounds.center(),
            rotation: Vec3::from(self.rotation),
            scale: Vec3::from(self.scale),
            bounds,
            material: Some(material),
            children: self.parts.into_iter().map(Self::into_node).collect(),
        }
    }
}

/// Full component table as read from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentLayout {
    /// Top-level components.
    #[serde(default)]
    pub components: Vec<ComponentDef>,
}

impl ComponentLayout {
    /// The built-in FADEC unit layout.
    pub fn fadec_default() -> Result<Self, FlowError> {
        Self::from_toml_str(FADEC_LAYOUT)
    }

    /// Parse a layout from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, FlowError> {
        toml::from_str(content).map_err(|e| FlowError::LayoutParse(e.to_string()))
    }

    /// Load a layout from a TOML file.
    pub fn load(path: &Path) -> Result<Self, FlowError> {
        let content = std::fs::read_to_string(path).map_err(FlowError::Io)?;
        let layout = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded {} components from {}",
            layout.components.len(),
            path.display()
        );
        Ok(layout)
    }

    /// Convert to the runtime component table. Later duplicates replace
    /// earlier entries.
    #[must_use]
    pub fn into_components(self) -> Components {
        self.components
            .into_iter()
            .map(ComponentDef::into_node)
            .collect()
    }
}
