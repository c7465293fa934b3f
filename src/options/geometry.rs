use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Liquid mesh synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
pub struct GeometryOptions {
    /// Liquid radius as a fraction of the pipe's minor extent.
    #[schemars(title = "Radius Factor", range(min = 0.1, max = 0.5), extend("step" = 0.01))]
    pub radius_factor: f32,
    /// Liquid length as a fraction of the pipe's dominant extent.
    #[schemars(title = "Length Factor", range(min = 0.5, max = 1.0), extend("step" = 0.01))]
    pub length_factor: f32,
    /// Segments around cylinders and tubes.
    #[schemars(title = "Radial Segments", range(min = 3, max = 64), extend("step" = 1))]
    pub radial_segments: u32,
    /// Samples per curve span when sweeping bent pipes.
    #[schemars(title = "Tubular Segments", range(min = 2, max = 64), extend("step" = 1))]
    pub tubular_segments: u32,
    /// World offset added to every pipe liquid mesh.
    #[schemars(skip)]
    pub liquid_offset: [f32; 3],
    /// Liquid base colour (linear RGB).
    #[schemars(skip)]
    pub liquid_color: [f32; 3],
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            radius_factor: 0.35,
            length_factor: 0.95,
            radial_segments: 16,
            tubular_segments: 20,
            liquid_offset: [0.0, 0.025, 0.0],
            liquid_color: [0.2, 0.733, 1.0],
        }
    }
}
