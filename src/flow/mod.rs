//! Fuel flow animation: liquid mesh synthesis and the sequencers that drive
//! it.
//!
//! Both sequencers implement [`FlowAnimation`], the narrow start/stop/update
//! surface the control layer talks to. They own their generated render
//! objects and mutate nothing else except pipe casing opacity, which they
//! restore on stop.

pub mod builder;
pub mod particles;
pub mod paths;
pub mod phase;
pub mod segment;
pub mod sequencer;
pub mod timer;

pub use builder::{BuiltSegment, FillRule, Orientation, PipeGeometryBuilder, PipeKind, RevealSpan};
pub use particles::ParticleFlowSequencer;
pub use paths::ParticlePath;
pub use phase::{FlowPhase, PhasePlan, PhaseTarget, WalkPosition};
pub use segment::{Part, Pipe, SegmentId, SegmentMap};
pub use sequencer::{FlowSequencer, FlowState};
pub use timer::TimerQueue;
use web_time::Instant;

use crate::error::FlowError;
use crate::scene::{LiquidMesh, MeshHandle, Scene, EMPTY_FILL};

/// Result of a start request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The flow began.
    Started,
    /// A flow was already running; nothing changed.
    AlreadyFlowing,
    /// The tank gauge reads empty; nothing changed.
    TankEmpty,
}

/// Start/stop/update surface shared by every flow animation.
pub trait FlowAnimation {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Begin flowing at `throttle` percent. Idempotent while flowing.
    fn start_flow(
        &mut self,
        scene: &mut Scene,
        throttle: f32,
        now: Instant,
    ) -> Result<StartOutcome, FlowError>;

    /// Stop, hide and reset everything this animation shows, and restore
    /// any casing it made translucent.
    fn stop_flow(&mut self, scene: &mut Scene);

    /// Advance one frame.
    fn update(&mut self, scene: &mut Scene, now: Instant);

    /// Store a new flow speed.
    fn set_flow_speed(&mut self, speed: f32);

    /// Whether a flow is running.
    fn is_flowing(&self) -> bool;
}

/// Whether the tank gauge reads above empty. No gauge reads empty.
pub(crate) fn gauge_has_fuel(scene: &Scene, gauge: Option<MeshHandle>) -> bool {
    gauge
        .and_then(|gauge| scene.mesh(gauge))
        .map(LiquidMesh::fill_level)
        .is_some_and(|level| level > EMPTY_FILL)
}
