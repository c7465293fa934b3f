use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which flow animations the simulation drives.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// Continuous liquid columns filling each pipe.
    #[default]
    Liquid,
    /// Discrete particles trickling along pipe centerlines.
    Particles,
    /// Both at once.
    Both,
}

/// Phase timing and casing treatment for the liquid fill sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Flow", inline)]
#[serde(default)]
pub struct FlowOptions {
    /// Active flow animation(s).
    #[schemars(title = "Flow Mode")]
    pub mode: FlowMode,
    /// Supply pipe riser fill time (ms).
    #[schemars(title = "Supply Rise (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub supply_rise_ms: u64,
    /// Supply pipe turn reveal time (ms).
    #[schemars(title = "Supply Turn (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub supply_turn_ms: u64,
    /// Below-mid pipe fill time (ms).
    #[schemars(title = "Below Mid (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub below_mid_ms: u64,
    /// Left/right riser fill time (ms).
    #[schemars(title = "Branch Rise (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub branch_rise_ms: u64,
    /// Left/right horizontal reveal time (ms).
    #[schemars(title = "Branch Cross (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub branch_cross_ms: u64,
    /// Left/right drop fill time (ms).
    #[schemars(title = "Branch Drop (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub branch_drop_ms: u64,
    /// Mid pipe fill time (ms).
    #[schemars(title = "Mid Pipe (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub mid_ms: u64,
    /// Spool pipe fill time (ms).
    #[schemars(title = "Spool (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub spool_ms: u64,
    /// Output pipes fill time (ms).
    #[schemars(title = "Outputs (ms)", range(min = 100, max = 10000), extend("step" = 100))]
    pub outputs_ms: u64,
    /// Opacity applied to casings along the flow path while flowing.
    #[schemars(title = "Casing Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub casing_opacity: f32,
    /// Casings made translucent in addition to the pipes themselves.
    #[schemars(skip)]
    pub extra_casings: Vec<String>,
    /// Mean liquid opacity while shimmering.
    #[schemars(skip)]
    pub shimmer_base: f32,
    /// Shimmer amplitude around the mean.
    #[schemars(title = "Shimmer", range(min = 0.0, max = 0.3), extend("step" = 0.01))]
    pub shimmer_amplitude: f32,
    /// Shimmer angular rate (rad/s).
    #[schemars(skip)]
    pub shimmer_rate: f32,
    /// Flow speed before any throttle input.
    #[schemars(skip)]
    pub initial_flow_speed: f32,
    /// Opacity of the mid pipe casing at setup.
    #[schemars(skip)]
    pub mid_pipe_opacity: f32,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            mode: FlowMode::Liquid,
            supply_rise_ms: 2000,
            supply_turn_ms: 1500,
            below_mid_ms: 1500,
            branch_rise_ms: 1200,
            branch_cross_ms: 1500,
            branch_drop_ms: 1200,
            mid_ms: 1500,
            spool_ms: 2000,
            outputs_ms: 1500,
            casing_opacity: 0.3,
            extra_casings: vec!["Top_Casing".to_owned(), "Bottom_Casing".to_owned()],
            shimmer_base: 0.4,
            shimmer_amplitude: 0.1,
            shimmer_rate: 2.0,
            initial_flow_speed: 0.001,
            mid_pipe_opacity: 0.6,
        }
    }
}
