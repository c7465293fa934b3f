//! Time-driven liquid fill of the whole fuel path.
//!
//! The sequencer owns the liquid meshes built for each segment and, once
//! started, recomputes every mesh from `now - start` on each update. No
//! per-frame state accumulates, so a late or skipped frame can never drift
//! the animation.

use std::cmp::Ordering;

use web_time::Instant;

use super::builder::{BuiltSegment, FillRule, PipeGeometryBuilder};
use super::phase::{PhasePlan, PhaseTarget, WalkPosition};
use super::segment::{Part, SegmentId, SegmentMap};
use super::{gauge_has_fuel, FlowAnimation, StartOutcome};
use crate::error::FlowError;
use crate::options::{FlowOptions, GeometryOptions};
use crate::scene::{LiquidMesh, MeshHandle, Scene};

/// Lower bound on the active phase's progress so its mesh never collapses.
pub const PROGRESS_FLOOR: f32 = 0.01;

/// Per-sequencer flow state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowState {
    /// Whether a flow is running.
    pub is_flowing: bool,
    /// When the running flow started.
    pub started_at: Option<Instant>,
    /// Last speed handed in by the throttle.
    pub flow_speed: f32,
    /// Whether the phase walk has finished.
    pub walk_complete: bool,
    /// Active phase index, `None` before start or after completion.
    pub current_phase: Option<usize>,
}

/// Continuous liquid fill of every pipe, phase by phase.
#[derive(Debug, Clone)]
pub struct FlowSequencer {
    segments: SegmentMap<BuiltSegment>,
    plan: PhasePlan,
    options: FlowOptions,
    tank_gauge: Option<MeshHandle>,
    state: FlowState,
    touched: Vec<String>,
    epoch: Instant,
}

impl FlowSequencer {
    /// Sequencer over already built segments.
    ///
    /// `epoch` is the time base of the opacity shimmer.
    #[must_use]
    pub fn new(
        segments: SegmentMap<BuiltSegment>,
        plan: PhasePlan,
        options: &FlowOptions,
        epoch: Instant,
    ) -> Self {
        Self {
            segments,
            plan,
            options: options.clone(),
            tank_gauge: None,
            state: FlowState {
                flow_speed: options.initial_flow_speed,
                ..FlowState::default()
            },
            touched: Vec::new(),
            epoch,
        }
    }

    /// Build liquid meshes for every pipe of the FADEC plan and wrap them.
    ///
    /// Absent pipes are logged and skipped; starting the flow later reports
    /// them as an incomplete mesh set.
    pub fn build(
        scene: &mut Scene,
        geometry: &GeometryOptions,
        options: &FlowOptions,
        epoch: Instant,
    ) -> Self {
        let plan = PhasePlan::fadec(options);
        let segments = PipeGeometryBuilder::new(geometry).build_all(scene, &plan.pipes());
        Self::new(segments, plan, options, epoch)
    }

    /// Read the tank fuel mesh's fill level as the start gate.
    pub fn attach_tank_gauge(&mut self, gauge: MeshHandle) {
        self.tank_gauge = Some(gauge);
    }

    /// Current flow state.
    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Phase plan driving the walk.
    #[must_use]
    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    /// Built segment for `id`.
    #[must_use]
    pub fn segment(&self, id: SegmentId) -> Option<&BuiltSegment> {
        self.segments.get(id)
    }

    /// Mesh filled by `target`, if it was built.
    #[must_use]
    pub fn target_mesh(&self, target: PhaseTarget) -> Option<MeshHandle> {
        self.resolve(target).ok().map(|s| s.mesh)
    }

    /// Segments the plan needs that were never built.
    #[must_use]
    pub fn missing_segments(&self) -> Vec<SegmentId> {
        self.plan
            .phases()
            .iter()
            .flat_map(|phase| &phase.targets)
            .filter_map(|&target| self.resolve(target).err())
            .collect()
    }

    fn resolve(&self, target: PhaseTarget) -> Result<&BuiltSegment, SegmentId> {
        match target {
            PhaseTarget::Segment(id) => self.segments.get(id).ok_or(id),
            PhaseTarget::Straight(pipe) => [Part::Vertical, Part::Horizontal]
                .into_iter()
                .find_map(|part| self.segments.get(SegmentId::new(pipe, part)))
                .ok_or(SegmentId::new(pipe, Part::Vertical)),
        }
    }

    fn reset_meshes(&self, scene: &mut Scene) {
        for (_, segment) in self.segments.iter() {
            if let Some(mesh) = scene.mesh_mut(segment.mesh) {
                mesh.reset();
            }
        }
    }

    fn make_casings_translucent(&mut self, scene: &mut Scene) {
        let names = self
            .plan
            .pipes()
            .into_iter()
            .map(|pipe| pipe.component_name().to_owned())
            .chain(self.options.extra_casings.iter().cloned());
        for name in names {
            match scene.component_mut(&name) {
                Some(node) => {
                    node.set_translucent(self.options.casing_opacity);
                    if !self.touched.contains(&name) {
                        self.touched.push(name);
                    }
                }
                None => log::warn!("Casing {name} not found, left opaque"),
            }
        }
    }

    fn restore_casings(&mut self, scene: &mut Scene) {
        for name in self.touched.drain(..) {
            if let Some(node) = scene.component_mut(&name) {
                node.set_opaque();
            }
        }
    }

    /// Recompute every mesh from the elapsed time.
    fn apply_walk(&mut self, scene: &mut Scene, now: Instant) {
        let Some(start) = self.state.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(start);

        match self.plan.locate(elapsed) {
            WalkPosition::InPhase { index, progress } => {
                for (i, phase) in self.plan.phases().iter().enumerate() {
                    let level = match i.cmp(&index) {
                        Ordering::Less => Some(1.0),
                        Ordering::Equal => Some(progress.max(PROGRESS_FLOOR)),
                        Ordering::Greater => None,
                    };
                    for &target in &phase.targets {
                        let Ok(segment) = self.resolve(target) else {
                            continue;
                        };
                        let Some(mesh) = scene.mesh_mut(segment.mesh) else {
                            continue;
                        };
                        match level {
                            Some(level) => apply_rule(mesh, segment.rule, level),
                            None => mesh.reset(),
                        }
                    }
                }
                if self.state.current_phase != Some(index) {
                    log::debug!(
                        "Flow phase {index} ({}) at {}ms",
                        self.plan.phases()[index].label,
                        elapsed.as_millis()
                    );
                    self.state.current_phase = Some(index);
                }
            }
            WalkPosition::Complete => {
                for (_, segment) in self.segments.iter() {
                    if let Some(mesh) = scene.mesh_mut(segment.mesh) {
                        apply_rule(mesh, segment.rule, 1.0);
                        mesh.clip_planes.clear();
                    }
                }
                self.state.walk_complete = true;
                self.state.current_phase = None;
                log::info!("Fuel flow sequence complete after {}ms", elapsed.as_millis());
            }
        }
    }
}

fn apply_rule(mesh: &mut LiquidMesh, rule: FillRule, level: f32) {
    mesh.visible = true;
    match rule {
        FillRule::Grow => mesh.set_fill_level(level),
        FillRule::Reveal(span) => {
            mesh.set_fill_level(1.0);
            mesh.clip_planes.clear();
            mesh.clip_planes.push(span.clip_plane(level));
        }
    }
}

impl FlowAnimation for FlowSequencer {
    fn name(&self) -> &'static str {
        "liquid"
    }

    fn start_flow(
        &mut self,
        scene: &mut Scene,
        throttle: f32,
        now: Instant,
    ) -> Result<StartOutcome, FlowError> {
        if self.state.is_flowing {
            return Ok(StartOutcome::AlreadyFlowing);
        }

        if !gauge_has_fuel(scene, self.tank_gauge) {
            log::warn!("Cannot start flow - no fuel in tank");
            return Ok(StartOutcome::TankEmpty);
        }

        let missing = self.missing_segments();
        if !missing.is_empty() {
            let err = FlowError::IncompleteMeshSet(missing);
            log::error!("Cannot start flow: {err}");
            return Err(err);
        }

        log::info!("Starting fuel flow at throttle {throttle:.0}%");
        self.reset_meshes(scene);
        self.make_casings_translucent(scene);
        self.state.is_flowing = true;
        self.state.started_at = Some(now);
        self.state.walk_complete = false;
        self.state.current_phase = None;
        self.apply_walk(scene, now);
        Ok(StartOutcome::Started)
    }

    fn stop_flow(&mut self, scene: &mut Scene) {
        if self.state.is_flowing {
            log::info!("Stopping fuel flow");
        }
        self.state.is_flowing = false;
        self.state.started_at = None;
        self.state.walk_complete = false;
        self.state.current_phase = None;
        self.reset_meshes(scene);
        self.restore_casings(scene);
    }

    fn update(&mut self, scene: &mut Scene, now: Instant) {
        if !self.state.is_flowing {
            return;
        }
        if !self.state.walk_complete {
            self.apply_walk(scene, now);
        }

        let t = now.saturating_duration_since(self.epoch).as_secs_f32();
        let opacity = self.options.shimmer_base
            + self.options.shimmer_amplitude * (self.options.shimmer_rate * t).sin();
        for (_, segment) in self.segments.iter() {
            if let Some(mesh) = scene.mesh_mut(segment.mesh) {
                if mesh.visible {
                    mesh.material.opacity = opacity;
                }
            }
        }
    }

    fn set_flow_speed(&mut self, speed: f32) {
        self.state.flow_speed = speed;
    }

    fn is_flowing(&self) -> bool {
        self.state.is_flowing
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec3;

    use super::*;
    use crate::flow::Pipe;
    use crate::geometry::MeshData;
    use crate::scene::{ComponentLayout, Material, EMPTY_FILL};

    struct Rig {
        scene: Scene,
        seq: FlowSequencer,
        gauge: MeshHandle,
        t0: Instant,
    }

    fn rig_with(fuel: f32, layout: ComponentLayout) -> Rig {
        let t0 = Instant::now();
        let mut scene = Scene::new(layout.into_components());
        let mut seq = FlowSequencer::build(
            &mut scene,
            &GeometryOptions::default(),
            &FlowOptions::default(),
            t0,
        );
        let mut tank = LiquidMesh::new(
            "tank",
            MeshData::cuboid(Vec3::ONE),
            Material::liquid([0.2, 0.7, 1.0]),
            Vec3::ZERO,
            Vec3::ONE,
        );
        tank.set_fill_level(fuel);
        let gauge = scene.add_mesh(tank);
        seq.attach_tank_gauge(gauge);
        Rig { scene, seq, gauge, t0 }
    }

    fn rig(fuel: f32) -> Rig {
        rig_with(fuel, ComponentLayout::fadec_default().unwrap())
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    fn mesh(rig: &Rig, pipe: Pipe, part: Part) -> &LiquidMesh {
        let handle = rig.seq.segment(SegmentId::new(pipe, part)).unwrap().mesh;
        rig.scene.mesh(handle).unwrap()
    }

    fn liquid_meshes(rig: &Rig) -> impl Iterator<Item = &LiquidMesh> {
        rig.scene.meshes().iter().filter(|m| m.name != "tank")
    }

    #[test]
    fn builds_every_planned_segment() {
        let r = rig(0.5);
        assert!(r.seq.missing_segments().is_empty());
        // 2 supply + 1 below-mid + 3 + 3 branches + mid + spool + 2 outputs
        assert_eq!(liquid_meshes(&r).count(), 13);
    }

    #[test]
    fn empty_tank_rejects_start() {
        let mut r = rig(EMPTY_FILL);
        let outcome = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        assert_eq!(outcome, StartOutcome::TankEmpty);
        assert!(!r.seq.is_flowing());
        assert!(r.seq.state().started_at.is_none());
        assert!(liquid_meshes(&r).all(|m| !m.visible));
        let pipe = r.scene.component("Fuel_supply_pipe").unwrap();
        assert!(!pipe.material.unwrap().transparent);
    }

    #[test]
    fn missing_gauge_rejects_start() {
        let mut r = rig(0.5);
        let mut seq = FlowSequencer::build(
            &mut r.scene,
            &GeometryOptions::default(),
            &FlowOptions::default(),
            r.t0,
        );
        let outcome = seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        assert_eq!(outcome, StartOutcome::TankEmpty);
    }

    #[test]
    fn start_while_flowing_keeps_timestamp() {
        let mut r = rig(0.5);
        assert_eq!(
            r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap(),
            StartOutcome::Started
        );
        r.seq.update(&mut r.scene, at(r.t0, 1000));
        let again = r.seq.start_flow(&mut r.scene, 80.0, at(r.t0, 1000)).unwrap();
        assert_eq!(again, StartOutcome::AlreadyFlowing);
        assert_eq!(r.seq.state().started_at, Some(r.t0));
        let level = mesh(&r, Pipe::Supply, Part::Vertical).fill_level();
        assert!((level - 0.5).abs() < 1e-4);
    }

    #[test]
    fn fuel_50_throttle_40_after_two_seconds() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        r.seq.update(&mut r.scene, at(r.t0, 2000));

        let riser = mesh(&r, Pipe::Supply, Part::Vertical);
        assert_eq!(riser.fill_level(), 1.0);
        assert!(riser.visible);
        assert!(mesh(&r, Pipe::Supply, Part::Horizontal).visible);
        assert!(!mesh(&r, Pipe::Left, Part::Vertical).visible);
        assert_eq!(r.seq.state().current_phase, Some(1));
    }

    #[test]
    fn boundary_pins_earlier_phase_and_floors_next() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        let branch_rise = r.seq.plan().start_of(3);
        r.seq.update(&mut r.scene, r.t0 + branch_rise);

        for pipe in [Pipe::Left, Pipe::Right] {
            let m = mesh(&r, pipe, Part::Vertical);
            assert!(m.visible);
            assert_eq!(m.fill_level(), PROGRESS_FLOOR);
        }
        // Below-mid reveal pinned at full length.
        let below = mesh(&r, Pipe::BelowMid, Part::Horizontal);
        let plane = below.clip_planes[0];
        let far_end = below.world_bounds().unwrap().max;
        assert!(plane.keeps(far_end - Vec3::X * 0.05));
        assert!(!mesh(&r, Pipe::Left, Part::Horizontal).visible);
    }

    #[test]
    fn stop_then_start_resets_fill() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        r.seq.update(&mut r.scene, at(r.t0, 9000));
        r.seq.stop_flow(&mut r.scene);

        assert!(liquid_meshes(&r).all(|m| !m.visible && m.fill_level() == EMPTY_FILL));
        assert!(liquid_meshes(&r).all(|m| m.clip_planes.is_empty()));

        let t1 = at(r.t0, 9500);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, t1).unwrap();
        assert_eq!(r.seq.state().started_at, Some(t1));
        assert!(liquid_meshes(&r).all(|m| m.fill_level() == EMPTY_FILL));
        assert!(mesh(&r, Pipe::Supply, Part::Vertical).visible);
        assert_eq!(liquid_meshes(&r).filter(|m| m.visible).count(), 1);
    }

    #[test]
    fn casings_follow_flow() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        for name in ["Fuel_supply_pipe", "Spool_Pipe", "Top_Casing"] {
            let m = r.scene.component(name).unwrap().material.unwrap();
            assert!(m.transparent, "{name}");
            assert_eq!(m.opacity, 0.3);
        }
        assert!(!r.scene.component("FCU").unwrap().material.unwrap().transparent);

        r.seq.stop_flow(&mut r.scene);
        for name in ["Fuel_supply_pipe", "Spool_Pipe", "Top_Casing"] {
            let m = r.scene.component(name).unwrap().material.unwrap();
            assert!(!m.transparent);
            assert_eq!(m.opacity, 1.0);
        }
    }

    #[test]
    fn completion_fills_everything_and_clears_planes() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        let end = r.t0 + r.seq.plan().total();
        r.seq.update(&mut r.scene, end);

        assert!(r.seq.state().walk_complete);
        assert!(liquid_meshes(&r).all(|m| m.visible && m.fill_level() == 1.0));
        assert!(liquid_meshes(&r).all(|m| m.clip_planes.is_empty()));
        assert!(r.seq.is_flowing());
    }

    #[test]
    fn shimmer_stays_in_band() {
        let mut r = rig(0.5);
        let _ = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap();
        for ms in (0..3000).step_by(97) {
            r.seq.update(&mut r.scene, at(r.t0, ms));
            let m = mesh(&r, Pipe::Supply, Part::Vertical);
            assert!((0.3 - 1e-6..=0.5 + 1e-6).contains(&m.material.opacity));
        }
        // Hidden meshes keep their base opacity.
        assert_eq!(mesh(&r, Pipe::Spool, Part::Horizontal).material.opacity, 0.4);
    }

    #[test]
    fn flow_speed_does_not_change_timing() {
        let mut r = rig(0.5);
        r.seq.set_flow_speed(0.002);
        let _ = r.seq.start_flow(&mut r.scene, 100.0, r.t0).unwrap();
        r.seq.update(&mut r.scene, at(r.t0, 1000));
        assert_eq!(r.seq.state().flow_speed, 0.002);
        let level = mesh(&r, Pipe::Supply, Part::Vertical).fill_level();
        assert!((level - 0.5).abs() < 1e-4);
    }

    #[test]
    fn missing_pipe_aborts_start() {
        let mut layout = ComponentLayout::fadec_default().unwrap();
        layout.components.retain(|c| c.name != "Spool_Pipe");
        let mut r = rig_with(0.5, layout);

        let err = r.seq.start_flow(&mut r.scene, 40.0, r.t0).unwrap_err();
        match err {
            FlowError::IncompleteMeshSet(missing) => {
                assert_eq!(missing, vec![SegmentId::new(Pipe::Spool, Part::Vertical)]);
            }
            other => unreachable!("unexpected error {other}"),
        }
        assert!(!r.seq.is_flowing());
        assert!(liquid_meshes(&r).all(|m| !m.visible));
    }

    #[test]
    fn update_is_noop_when_stopped() {
        let mut r = rig(0.5);
        r.seq.update(&mut r.scene, at(r.t0, 5000));
        assert!(liquid_meshes(&r).all(|m| !m.visible));
        assert_eq!(r.scene.mesh(r.gauge).unwrap().fill_level(), 0.5);
    }
}
