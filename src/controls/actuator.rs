//! Solenoid-driven torque motor: feedback rod and land assembly motion.
//!
//! Two mutually exclusive solenoids pull the feedback rod one way or the
//! other. Current sets the target deflection; the rod and lands ease toward
//! it a fixed fraction per frame.

use crate::options::ActuatorOptions;
use crate::scene::Scene;

/// Rod rotated about Z by the torque motor.
pub const FEEDBACK_ROD: &str = "Feedback_rod_001";

/// Parts translated along X with the spool.
pub const LANDS: [&str; 3] = ["Left_Land", "Right_Land", "Land_rod"];

const OFF_GREY: f32 = 0.5;
const GLOW: f32 = 0.3;

/// Which solenoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolenoidSide {
    /// Pulls toward negative rotation and travel.
    Left,
    /// Pulls toward positive rotation and travel.
    Right,
}

impl SolenoidSide {
    /// Component name of the coil.
    #[must_use]
    pub fn component_name(self) -> &'static str {
        match self {
            Self::Left => "Left_solenoid",
            Self::Right => "Right_Solenoid",
        }
    }

    fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `(color, emissive)` at current fraction `i`.
    fn tint(self, i: f32) -> ([f32; 3], [f32; 3]) {
        match self {
            Self::Left => ([1.0, 1.0 - i, 1.0 - i], [GLOW * i, 0.0, 0.0]),
            Self::Right => ([1.0 - i, 1.0 - i, 1.0], [0.0, 0.0, GLOW * i]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Coil {
    active: bool,
    current: u8,
}

/// Targets shown next to the solenoid controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorReadout {
    /// Target rod rotation in degrees.
    pub target_rotation_deg: f32,
    /// Target land travel.
    pub target_land_offset: f32,
}

/// Torque motor state and its eased output.
#[derive(Debug, Clone)]
pub struct SolenoidActuator {
    left: Coil,
    right: Coil,
    rotation: f32,
    target_rotation: f32,
    land_offset: f32,
    target_land_offset: f32,
    options: ActuatorOptions,
    rod_home: Option<f32>,
    land_homes: Vec<(&'static str, f32)>,
}

impl SolenoidActuator {
    /// Capture the rest pose of the rod and lands and paint both coils off.
    ///
    /// Parts missing from the scene are logged and left out.
    pub fn install(scene: &mut Scene, options: &ActuatorOptions) -> Self {
        let rod_home = scene.component(FEEDBACK_ROD).map(|n| n.rotation.z);
        if rod_home.is_none() {
            log::warn!("{FEEDBACK_ROD} not found, rod will not move");
        }
        let land_homes = LANDS
            .iter()
            .filter_map(|&name| match scene.component(name) {
                Some(node) => Some((name, node.position.x)),
                None => {
                    log::warn!("{name} not found, skipping");
                    None
                }
            })
            .collect();

        let actuator = Self {
            left: Coil::default(),
            right: Coil::default(),
            rotation: 0.0,
            target_rotation: 0.0,
            land_offset: 0.0,
            target_land_offset: 0.0,
            options: options.clone(),
            rod_home,
            land_homes,
        };
        actuator.paint(scene);
        actuator
    }

    fn coil(&self, side: SolenoidSide) -> &Coil {
        match side {
            SolenoidSide::Left => &self.left,
            SolenoidSide::Right => &self.right,
        }
    }

    fn coil_mut(&mut self, side: SolenoidSide) -> &mut Coil {
        match side {
            SolenoidSide::Left => &mut self.left,
            SolenoidSide::Right => &mut self.right,
        }
    }

    /// Whether `side` is switched on.
    #[must_use]
    pub fn is_active(&self, side: SolenoidSide) -> bool {
        self.coil(side).active
    }

    /// Current setting of `side` in percent.
    #[must_use]
    pub fn current(&self, side: SolenoidSide) -> u8 {
        self.coil(side).current
    }

    /// Eased rod rotation relative to rest (radians).
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Eased land travel relative to rest.
    #[must_use]
    pub fn land_offset(&self) -> f32 {
        self.land_offset
    }

    /// Set the current of `side` (clamped to 100).
    pub fn set_current(
        &mut self,
        scene: &mut Scene,
        side: SolenoidSide,
        current: u8,
    ) -> ActuatorReadout {
        self.coil_mut(side).current = current.min(100);
        self.retarget(scene)
    }

    /// Switch `side` on or off. Switching one on switches the other off.
    pub fn set_active(
        &mut self,
        scene: &mut Scene,
        side: SolenoidSide,
        active: bool,
    ) -> ActuatorReadout {
        self.coil_mut(side).active = active;
        if active {
            self.coil_mut(side.other()).active = false;
        }
        log::debug!("{side:?} solenoid {}", if active { "on" } else { "off" });
        self.retarget(scene)
    }

    /// Flip `side` and return its new state.
    pub fn toggle(&mut self, scene: &mut Scene, side: SolenoidSide) -> bool {
        let active = !self.is_active(side);
        let _ = self.set_active(scene, side, active);
        active
    }

    /// Rod smoothing factor, clamped to `0.01..=0.2`.
    pub fn set_response_speed(&mut self, speed: f32) {
        self.options.rotation_smoothing = speed.clamp(0.01, 0.2);
    }

    /// Current rod smoothing factor.
    #[must_use]
    pub fn response_speed(&self) -> f32 {
        self.options.rotation_smoothing
    }

    /// Side whose current drives the targets, if any.
    fn driving(&self) -> Option<(SolenoidSide, f32)> {
        [SolenoidSide::Left, SolenoidSide::Right]
            .into_iter()
            .find(|&s| self.is_active(s))
            .map(|s| (s, f32::from(self.current(s)) / 100.0))
    }

    fn retarget(&mut self, scene: &mut Scene) -> ActuatorReadout {
        let (rotation, travel) = match self.driving() {
            Some((side, i)) => (
                side.direction() * i * self.options.max_rotation,
                side.direction() * i * self.options.max_land_travel,
            ),
            None => (0.0, 0.0),
        };
        self.target_rotation = rotation;
        self.target_land_offset = travel;
        self.paint(scene);
        ActuatorReadout {
            target_rotation_deg: rotation.to_degrees(),
            target_land_offset: travel,
        }
    }

    fn paint(&self, scene: &mut Scene) {
        for side in [SolenoidSide::Left, SolenoidSide::Right] {
            let coil = self.coil(side);
            let (color, emissive) = if coil.active {
                side.tint(f32::from(coil.current) / 100.0)
            } else {
                ([OFF_GREY; 3], [0.0; 3])
            };
            if let Some(node) = scene.component_mut(side.component_name()) {
                node.for_each_material_mut(&mut |m| {
                    m.color = color;
                    m.emissive = emissive;
                });
            }
        }
    }

    /// Ease toward the targets and write the pose into the scene.
    pub fn update(&mut self, scene: &mut Scene) {
        self.rotation += (self.target_rotation - self.rotation) * self.options.rotation_smoothing;
        self.land_offset +=
            (self.target_land_offset - self.land_offset) * self.options.land_smoothing;

        if let (Some(home), Some(rod)) = (self.rod_home, scene.component_mut(FEEDBACK_ROD)) {
            rod.rotation.z = home + self.rotation;
        }
        for &(name, home) in &self.land_homes {
            if let Some(node) = scene.component_mut(name) {
                node.position.x = home + self.land_offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::scene::ComponentLayout;

    fn install() -> (Scene, SolenoidActuator) {
        let mut scene = Scene::new(ComponentLayout::fadec_default().unwrap().into_components());
        let actuator = SolenoidActuator::install(&mut scene, &ActuatorOptions::default());
        (scene, actuator)
    }

    fn color(scene: &Scene, side: SolenoidSide) -> [f32; 3] {
        scene.component(side.component_name()).unwrap().material.unwrap().color
    }

    #[test]
    fn coils_start_grey() {
        let (scene, _) = install();
        assert_eq!(color(&scene, SolenoidSide::Left), [0.5; 3]);
        assert_eq!(color(&scene, SolenoidSide::Right), [0.5; 3]);
    }

    #[test]
    fn switching_on_switches_other_off() {
        let (mut scene, mut act) = install();
        assert!(act.toggle(&mut scene, SolenoidSide::Left));
        assert!(act.toggle(&mut scene, SolenoidSide::Right));
        assert!(!act.is_active(SolenoidSide::Left));
        assert!(!act.toggle(&mut scene, SolenoidSide::Right));
        assert!(!act.is_active(SolenoidSide::Right));
    }

    #[test]
    fn targets_follow_side_and_current() {
        let (mut scene, mut act) = install();
        let _ = act.set_current(&mut scene, SolenoidSide::Left, 50);
        let r = act.set_active(&mut scene, SolenoidSide::Left, true);
        assert!((r.target_rotation_deg + 1.25).abs() < 1e-4);
        assert!((r.target_land_offset + 0.04).abs() < 1e-6);

        let _ = act.set_current(&mut scene, SolenoidSide::Right, 100);
        let r = act.set_active(&mut scene, SolenoidSide::Right, true);
        assert!((r.target_rotation_deg - 2.5).abs() < 1e-4);
        assert!((r.target_land_offset - 0.08).abs() < 1e-6);

        let r = act.set_active(&mut scene, SolenoidSide::Right, false);
        assert_eq!(r.target_rotation_deg, 0.0);
        assert_eq!(r.target_land_offset, 0.0);
    }

    #[test]
    fn active_coil_is_tinted() {
        let (mut scene, mut act) = install();
        let _ = act.set_current(&mut scene, SolenoidSide::Right, 40);
        let _ = act.set_active(&mut scene, SolenoidSide::Right, true);
        let m = scene
            .component(SolenoidSide::Right.component_name())
            .unwrap()
            .material
            .unwrap();
        assert!((m.color[0] - 0.6).abs() < 1e-6);
        assert_eq!(m.color[2], 1.0);
        assert!((m.emissive[2] - 0.12).abs() < 1e-6);
        assert_eq!(color(&scene, SolenoidSide::Left), [0.5; 3]);
    }

    #[test]
    fn pose_eases_toward_target() {
        let (mut scene, mut act) = install();
        let rod_home = scene.component(FEEDBACK_ROD).unwrap().rotation.z;
        let land_home = scene.component("Left_Land").unwrap().position.x;
        let _ = act.set_current(&mut scene, SolenoidSide::Right, 100);
        let _ = act.set_active(&mut scene, SolenoidSide::Right, true);

        act.update(&mut scene);
        let target = PI / 72.0;
        assert!((act.rotation() - target * 0.08).abs() < 1e-6);
        assert!((act.land_offset() - 0.08 * 0.08).abs() < 1e-6);

        for _ in 0..400 {
            act.update(&mut scene);
        }
        assert!((act.rotation() - target).abs() < 1e-4);
        let rod = scene.component(FEEDBACK_ROD).unwrap();
        assert!((rod.rotation.z - rod_home - target).abs() < 1e-4);
        let land = scene.component("Left_Land").unwrap();
        assert!((land.position.x - land_home - 0.08).abs() < 1e-4);
    }

    #[test]
    fn response_speed_is_clamped() {
        let (_, mut act) = install();
        act.set_response_speed(0.5);
        assert_eq!(act.response_speed(), 0.2);
        act.set_response_speed(0.0);
        assert_eq!(act.response_speed(), 0.01);
    }

    #[test]
    fn missing_parts_are_skipped() {
        let mut scene = Scene::default();
        let mut act = SolenoidActuator::install(&mut scene, &ActuatorOptions::default());
        let _ = act.set_active(&mut scene, SolenoidSide::Left, true);
        act.update(&mut scene);
        assert!(act.rotation() == 0.0);
    }
}
