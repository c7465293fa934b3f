use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fuel tank gauge parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Tank", inline)]
#[serde(default)]
pub struct TankOptions {
    /// Fuel box extents as fractions of the tank's bounds.
    #[schemars(skip)]
    pub fill_fraction: [f32; 3],
    /// Quantity (percent) at and above which the casing turns translucent.
    #[schemars(title = "See-through At", range(min = 0, max = 100), extend("step" = 1))]
    pub transparent_threshold: u8,
    /// Casing opacity once translucent.
    #[schemars(title = "Casing Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub casing_opacity: f32,
    /// Quantity loaded at startup (percent).
    #[schemars(skip)]
    pub initial_quantity: u8,
}

impl Default for TankOptions {
    fn default() -> Self {
        Self {
            fill_fraction: [0.96, 0.98, 0.96],
            transparent_threshold: 30,
            casing_opacity: 0.3,
            initial_quantity: 0,
        }
    }
}
