//! Particle trickle along pipe centerlines.
//!
//! Pipes activate in flow order, one stage at a time. Inside a pipe the
//! particles switch on one by one, then loop along the path forever while
//! the flow runs. All timing goes through a [`TimerQueue`] drained by the
//! per-frame update.

use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use web_time::Instant;

use super::paths::{extract_paths, ParticlePath};
use super::segment::Pipe;
use super::timer::TimerQueue;
use super::{gauge_has_fuel, FlowAnimation, StartOutcome};
use crate::error::FlowError;
use crate::options::ParticleOptions;
use crate::scene::{Material, MeshHandle, PointCloud, PointsHandle, Scene};

/// Pipes that activate together, in flow order.
pub const STAGES: [&[Pipe]; 6] = [
    &[Pipe::Supply],
    &[Pipe::BelowMid],
    &[Pipe::Left, Pipe::Right],
    &[Pipe::Mid],
    &[Pipe::Spool],
    &[Pipe::LeftOutput, Pipe::RightOutput],
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    t: f32,
    active: bool,
    offset: Vec3,
}

#[derive(Debug, Clone)]
struct ParticleGroup {
    path: ParticlePath,
    cloud: PointsHandle,
    particles: Vec<Particle>,
    active_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParticleEvent {
    Stage(usize),
    Particle { group: usize, index: usize },
}

/// Discrete particles flowing through every pipe.
#[derive(Debug)]
pub struct ParticleFlowSequencer {
    groups: Vec<ParticleGroup>,
    stages: Vec<Vec<usize>>,
    options: ParticleOptions,
    timers: TimerQueue<ParticleEvent>,
    tank_gauge: Option<MeshHandle>,
    is_flowing: bool,
    flow_speed: f32,
    touched: Vec<String>,
}

impl ParticleFlowSequencer {
    /// Build paths and hidden point clouds for every present pipe.
    pub fn build(
        scene: &mut Scene,
        options: &ParticleOptions,
        color: [f32; 3],
        rng: &mut impl Rng,
    ) -> Self {
        let paths = extract_paths(&scene.components, &Pipe::ALL, options, rng);

        let mut material = Material::liquid(color);
        material.transmission = 0.0;
        material.make_translucent(options.point_opacity);

        let count = options.count;
        let groups: Vec<ParticleGroup> = paths
            .into_iter()
            .map(|path| {
                let particles: Vec<Particle> = (0..count)
                    .map(|i| Particle {
                        t: i as f32 / count as f32,
                        active: false,
                        offset: (Vec3::new(rng.random(), rng.random(), rng.random())
                            - Vec3::splat(0.5))
                            * options.offset_spread,
                    })
                    .collect();
                let positions = particles.iter().map(|p| path.point(p.t)).collect();
                let cloud = scene.add_points(PointCloud::new(
                    path.pipe.component_name(),
                    positions,
                    material,
                    options.point_size,
                ));
                ParticleGroup {
                    path,
                    cloud,
                    particles,
                    active_count: 0,
                }
            })
            .collect();

        let stages: Vec<Vec<usize>> = STAGES
            .iter()
            .map(|pipes| {
                groups
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| pipes.contains(&g.path.pipe))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        log::info!("Built {} particle paths", groups.len());
        Self {
            groups,
            stages,
            options: options.clone(),
            timers: TimerQueue::new(),
            tank_gauge: None,
            is_flowing: false,
            flow_speed: options.min_start_speed,
            touched: Vec::new(),
        }
    }

    /// Read the tank fuel mesh's fill level as the start gate.
    pub fn attach_tank_gauge(&mut self, gauge: MeshHandle) {
        self.tank_gauge = Some(gauge);
    }

    /// Current per-tick path advance.
    #[must_use]
    pub fn flow_speed(&self) -> f32 {
        self.flow_speed
    }

    /// Active particle count for `pipe`, `None` if it has no path.
    #[must_use]
    pub fn active_count(&self, pipe: Pipe) -> Option<usize> {
        self.group_of(pipe).map(|g| g.active_count)
    }

    /// Point cloud for `pipe`.
    #[must_use]
    pub fn cloud(&self, pipe: Pipe) -> Option<PointsHandle> {
        self.group_of(pipe).map(|g| g.cloud)
    }

    /// Pending stagger events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.timers.len()
    }

    fn group_of(&self, pipe: Pipe) -> Option<&ParticleGroup> {
        self.groups.iter().find(|g| g.path.pipe == pipe)
    }

    fn stage_delay(&self) -> Duration {
        let divisor = f64::from((self.flow_speed * 1000.0).max(1.0));
        Duration::from_secs_f64(self.options.stage_delay_ms as f64 / divisor / 1000.0)
    }

    fn drain(&mut self, scene: &mut Scene, now: Instant) {
        while let Some((due, event)) = self.timers.pop_due(now) {
            match event {
                ParticleEvent::Stage(stage) => {
                    let Some(members) = self.stages.get(stage).cloned() else {
                        continue;
                    };
                    log::debug!("Particle stage {stage}: {} pipe(s)", members.len());
                    for group in members {
                        self.activate_group(scene, group, due);
                    }
                    if stage + 1 < self.stages.len() {
                        self.timers
                            .schedule(due + self.stage_delay(), ParticleEvent::Stage(stage + 1));
                    }
                }
                ParticleEvent::Particle { group, index } => {
                    let Some(g) = self.groups.get_mut(group) else {
                        continue;
                    };
                    let Some(particle) = g.particles.get_mut(index) else {
                        continue;
                    };
                    particle.active = true;
                    g.active_count += 1;
                    if let Some(cloud) = scene.points_mut(g.cloud) {
                        cloud.draw_count = g.active_count;
                    }
                    let delay = Duration::from_millis(self.options.activation_delay_ms);
                    self.timers.schedule(
                        due + delay,
                        ParticleEvent::Particle {
                            group,
                            index: index + 1,
                        },
                    );
                }
            }
        }
    }

    fn activate_group(&mut self, scene: &mut Scene, group: usize, due: Instant) {
        let Some(g) = self.groups.get(group) else {
            return;
        };
        let name = g.path.pipe.component_name();
        if let Some(node) = scene.component_mut(name) {
            node.set_translucent(self.options.pipe_opacity);
            if !self.touched.iter().any(|t| t == name) {
                self.touched.push(name.to_owned());
            }
        }
        if let Some(cloud) = scene.points_mut(g.cloud) {
            cloud.visible = true;
        }
        self.timers
            .schedule(due, ParticleEvent::Particle { group, index: 0 });
    }
}

impl FlowAnimation for ParticleFlowSequencer {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn start_flow(
        &mut self,
        scene: &mut Scene,
        throttle: f32,
        now: Instant,
    ) -> Result<StartOutcome, FlowError> {
        if self.is_flowing {
            return Ok(StartOutcome::AlreadyFlowing);
        }
        if !gauge_has_fuel(scene, self.tank_gauge) {
            log::warn!("Cannot start particle flow - no fuel in tank");
            return Ok(StartOutcome::TankEmpty);
        }
        self.is_flowing = true;
        self.flow_speed = (throttle / 100.0 * self.options.throttle_speed_scale)
            .max(self.options.min_start_speed);
        log::info!("Starting particle flow at speed {:.4}", self.flow_speed);
        self.timers.schedule(now, ParticleEvent::Stage(0));
        self.drain(scene, now);
        Ok(StartOutcome::Started)
    }

    fn stop_flow(&mut self, scene: &mut Scene) {
        self.is_flowing = false;
        self.timers.clear();
        for group in &mut self.groups {
            group.active_count = 0;
            for particle in &mut group.particles {
                particle.active = false;
            }
            if let Some(cloud) = scene.points_mut(group.cloud) {
                cloud.visible = false;
                cloud.draw_count = 0;
            }
        }
        for name in self.touched.drain(..) {
            if let Some(node) = scene.component_mut(&name) {
                node.set_opaque();
            }
        }
    }

    fn update(&mut self, scene: &mut Scene, now: Instant) {
        if !self.is_flowing {
            return;
        }
        self.drain(scene, now);

        let speed = self.flow_speed;
        for group in &mut self.groups {
            let Some(cloud) = scene.points_mut(group.cloud) else {
                continue;
            };
            if !cloud.visible {
                continue;
            }
            for (particle, slot) in group.particles.iter_mut().zip(&mut cloud.positions) {
                if !particle.active {
                    continue;
                }
                particle.t = (particle.t + speed).fract();
                *slot = group.path.point(particle.t) + particle.offset;
            }
        }
    }

    fn set_flow_speed(&mut self, speed: f32) {
        self.flow_speed = speed.max(self.options.min_speed);
    }

    fn is_flowing(&self) -> bool {
        self.is_flowing
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::MeshData;
    use crate::scene::{ComponentLayout, LiquidMesh};

    fn rig_with_fuel(fuel: f32) -> (Scene, ParticleFlowSequencer, Instant) {
        let mut scene = Scene::new(ComponentLayout::fadec_default().unwrap().into_components());
        let mut seq = ParticleFlowSequencer::build(
            &mut scene,
            &ParticleOptions::default(),
            [0.2, 0.73, 1.0],
            &mut StdRng::seed_from_u64(42),
        );
        let mut tank = LiquidMesh::new(
            "tank",
            MeshData::cuboid(Vec3::ONE),
            Material::liquid([0.2, 0.7, 1.0]),
            Vec3::ZERO,
            Vec3::ONE,
        );
        tank.set_fill_level(fuel);
        seq.attach_tank_gauge(scene.add_mesh(tank));
        (scene, seq, Instant::now())
    }

    fn rig() -> (Scene, ParticleFlowSequencer, Instant) {
        rig_with_fuel(0.5)
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn clouds_start_hidden() {
        let (scene, seq, _) = rig();
        assert_eq!(scene.point_clouds().len(), Pipe::ALL.len());
        assert!(scene.point_clouds().iter().all(|c| !c.visible && c.positions.len() == 30));
        assert_eq!(seq.active_count(Pipe::Supply), Some(0));
    }

    #[test]
    fn particles_trickle_every_150ms() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 40.0, t0).unwrap();
        assert_eq!(seq.active_count(Pipe::Supply), Some(1));

        seq.update(&mut scene, at(t0, 149));
        assert_eq!(seq.active_count(Pipe::Supply), Some(1));
        seq.update(&mut scene, at(t0, 150));
        assert_eq!(seq.active_count(Pipe::Supply), Some(2));
        seq.update(&mut scene, at(t0, 450));
        assert_eq!(seq.active_count(Pipe::Supply), Some(4));

        // A long frame gap catches up without skipping particles.
        seq.update(&mut scene, at(t0, 10_000));
        assert_eq!(seq.active_count(Pipe::Supply), Some(30));
        let cloud = scene.points(seq.cloud(Pipe::Supply).unwrap()).unwrap();
        assert_eq!(cloud.drawn().len(), 30);
    }

    #[test]
    fn stages_follow_throttle_speed() {
        let (mut scene, mut seq, t0) = rig();
        // 40 % → speed 0.0012 → stage delay 3000 / 1.2 = 2500 ms
        let _ = seq.start_flow(&mut scene, 40.0, t0).unwrap();
        assert!((seq.flow_speed() - 0.0012).abs() < 1e-7);

        let below = seq.cloud(Pipe::BelowMid).unwrap();
        seq.update(&mut scene, at(t0, 2499));
        assert!(!scene.points(below).unwrap().visible);
        seq.update(&mut scene, at(t0, 2500));
        assert!(scene.points(below).unwrap().visible);
        assert_eq!(seq.active_count(Pipe::BelowMid), Some(1));
        assert_eq!(seq.active_count(Pipe::Left), Some(0));

        let pipe = scene.component("Below_Mid_pipe").unwrap().material.unwrap();
        assert!(pipe.transparent);
        assert_eq!(pipe.opacity, 0.2);
    }

    #[test]
    fn low_throttle_uses_minimum_speed() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 5.0, t0).unwrap();
        assert_eq!(seq.flow_speed(), 0.0005);
        seq.set_flow_speed(0.0);
        assert_eq!(seq.flow_speed(), 0.0002);
    }

    #[test]
    fn progress_wraps() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 100.0, t0).unwrap();
        seq.set_flow_speed(0.4);
        for frame in 0..10 {
            seq.update(&mut scene, at(t0, frame * 16));
        }
        for group in &seq.groups {
            assert!(group.particles.iter().all(|p| (0.0..1.0).contains(&p.t)));
        }
    }

    #[test]
    fn active_particles_sit_near_their_path() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 100.0, t0).unwrap();
        seq.update(&mut scene, at(t0, 16));
        let group = &seq.groups[0];
        let cloud = scene.points(group.cloud).unwrap();
        let p = group.particles[0];
        let expected = group.path.point(p.t) + p.offset;
        assert!((cloud.positions[0] - expected).length() < 1e-6);
        assert!(p.offset.abs().max_element() <= 0.01);
    }

    #[test]
    fn stop_cancels_pending_activations() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 40.0, t0).unwrap();
        seq.update(&mut scene, at(t0, 3000));
        seq.stop_flow(&mut scene);

        assert_eq!(seq.pending_events(), 0);
        assert!(!seq.is_flowing());
        assert!(scene.point_clouds().iter().all(|c| !c.visible && c.drawn().is_empty()));
        assert_eq!(seq.active_count(Pipe::Supply), Some(0));
        let pipe = scene.component("Fuel_supply_pipe").unwrap().material.unwrap();
        assert!(!pipe.transparent);

        seq.update(&mut scene, at(t0, 20_000));
        assert_eq!(seq.active_count(Pipe::Mid), Some(0));
    }

    #[test]
    fn restart_is_idempotent_while_flowing() {
        let (mut scene, mut seq, t0) = rig();
        let _ = seq.start_flow(&mut scene, 40.0, t0).unwrap();
        let again = seq.start_flow(&mut scene, 90.0, at(t0, 10)).unwrap();
        assert_eq!(again, StartOutcome::AlreadyFlowing);
        assert!((seq.flow_speed() - 0.0012).abs() < 1e-7);
    }

    #[test]
    fn empty_tank_rejects_start() {
        let (mut scene, mut seq, t0) = rig_with_fuel(0.01);
        let outcome = seq.start_flow(&mut scene, 40.0, t0).unwrap();
        assert_eq!(outcome, StartOutcome::TankEmpty);
        assert!(!seq.is_flowing());
        assert_eq!(seq.pending_events(), 0);
        assert!(scene.point_clouds().iter().all(|c| !c.visible));
    }

    #[test]
    fn missing_gauge_rejects_start() {
        let mut scene = Scene::new(ComponentLayout::fadec_default().unwrap().into_components());
        let mut seq = ParticleFlowSequencer::build(
            &mut scene,
            &ParticleOptions::default(),
            [0.2, 0.73, 1.0],
            &mut StdRng::seed_from_u64(42),
        );
        let outcome = seq.start_flow(&mut scene, 40.0, Instant::now()).unwrap();
        assert_eq!(outcome, StartOutcome::TankEmpty);
        assert!(!seq.is_flowing());
    }
}
