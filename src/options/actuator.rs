use std::f32::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Solenoid actuator and throttle readout parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Actuator", inline)]
#[serde(default)]
pub struct ActuatorOptions {
    /// Feedback rod rotation at full current (radians).
    #[schemars(skip)]
    pub max_rotation: f32,
    /// Land assembly travel at full current.
    #[schemars(skip)]
    pub max_land_travel: f32,
    /// Per-frame smoothing factor for the feedback rod.
    #[schemars(title = "Response Speed", range(min = 0.01, max = 0.2), extend("step" = 0.01))]
    pub rotation_smoothing: f32,
    /// Per-frame smoothing factor for the land assembly.
    #[schemars(skip)]
    pub land_smoothing: f32,
    /// Fuel flow readout at full throttle (L/min).
    #[schemars(skip)]
    pub max_fuel_flow: f32,
    /// Flow speed handed to the animations per unit throttle fraction.
    #[schemars(skip)]
    pub throttle_speed_scale: f32,
}

impl Default for ActuatorOptions {
    fn default() -> Self {
        Self {
            max_rotation: PI / 72.0,
            max_land_travel: 0.08,
            rotation_smoothing: 0.08,
            land_smoothing: 0.08,
            max_fuel_flow: 50.0,
            throttle_speed_scale: 0.002,
        }
    }
}
