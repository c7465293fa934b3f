use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Particle flow parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Particles", inline)]
#[serde(default)]
pub struct ParticleOptions {
    /// Particles per pipe.
    #[schemars(title = "Count", range(min = 1, max = 200), extend("step" = 1))]
    pub count: usize,
    /// Curve segments per pipe path.
    #[schemars(skip)]
    pub path_segments: usize,
    /// Assumed pipe wall thickness.
    #[schemars(skip)]
    pub wall_thickness: f32,
    /// Centerline jitter band as a fraction of interior extent.
    #[schemars(title = "Jitter", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub jitter: f32,
    /// Full width of each particle's fixed random offset.
    #[schemars(skip)]
    pub offset_spread: f32,
    /// Delay between successive particle activations (ms).
    #[schemars(title = "Trickle Delay (ms)", range(min = 10, max = 1000), extend("step" = 10))]
    pub activation_delay_ms: u64,
    /// Stage delay numerator (ms), divided by `max(speed * 1000, 1)`.
    #[schemars(skip)]
    pub stage_delay_ms: u64,
    /// Start speed per unit throttle percent.
    #[schemars(skip)]
    pub throttle_speed_scale: f32,
    /// Lower bound on the start speed.
    #[schemars(skip)]
    pub min_start_speed: f32,
    /// Lower bound on any later speed change.
    #[schemars(skip)]
    pub min_speed: f32,
    /// Host pipe opacity once its particles are active.
    #[schemars(title = "Pipe Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub pipe_opacity: f32,
    /// Sprite size in world units.
    #[schemars(title = "Point Size", range(min = 0.005, max = 0.1), extend("step" = 0.005))]
    pub point_size: f32,
    /// Sprite opacity.
    #[schemars(skip)]
    pub point_opacity: f32,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            count: 30,
            path_segments: 30,
            wall_thickness: 0.1,
            jitter: 0.2,
            offset_spread: 0.02,
            activation_delay_ms: 150,
            stage_delay_ms: 3000,
            throttle_speed_scale: 0.003,
            min_start_speed: 0.0005,
            min_speed: 0.0002,
            pipe_opacity: 0.2,
            point_size: 0.03,
            point_opacity: 0.9,
        }
    }
}
