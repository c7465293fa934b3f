//! Top-level facade: one visualization instance and its control routing.
//!
//! [`FadecSimulation`] owns the scene and everything that mutates it. Hosts
//! feed it [`ControlCommand`]s as the user moves sliders and call
//! [`FadecSimulation::tick`] once per frame before drawing
//! [`FadecSimulation::scene`].

use rand::Rng;
use web_time::Instant;

use crate::controls::{
    ActuatorReadout, FuelTank, SolenoidActuator, SolenoidSide, ThrottleControl, ThrottleReadout,
};
use crate::error::FlowError;
use crate::flow::{FlowAnimation, FlowSequencer, ParticleFlowSequencer};
use crate::options::{FlowMode, Options};
use crate::scene::{ComponentLayout, Components, Scene};

/// Pipe made translucent at setup so the spool stays visible.
const MID_PIPE: &str = "Mid_Pipe";

/// One user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// Throttle lever in percent.
    SetThrottle(u8),
    /// Tank fuel quantity in percent.
    SetFuelQuantity(u8),
    /// Solenoid current in percent.
    SetSolenoidCurrent {
        /// Which coil.
        side: SolenoidSide,
        /// Current in percent.
        current: u8,
    },
    /// Flip a solenoid on or off.
    ToggleSolenoid(SolenoidSide),
    /// Feedback rod smoothing factor.
    SetResponseSpeed(f32),
}

/// What a command changed, for the host's readout labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    /// Throttle readout after the move.
    Throttle(ThrottleReadout),
    /// New fuel fill level.
    FuelLevel(f32),
    /// Actuator targets after the change.
    Actuator(ActuatorReadout),
    /// Nothing to report.
    None,
}

/// A FADEC model with its liquid, tank and actuator animations.
pub struct FadecSimulation {
    scene: Scene,
    options: Options,
    tank: Option<FuelTank>,
    throttle: ThrottleControl,
    flows: Vec<Box<dyn FlowAnimation>>,
    actuator: SolenoidActuator,
}

impl FadecSimulation {
    /// Set up every animation over `components`.
    ///
    /// Missing parts are logged and skipped; the affected animation stays
    /// inert. `rng` seeds particle path jitter.
    pub fn new(components: Components, options: Options, now: Instant, rng: &mut impl Rng) -> Self {
        let mut scene = Scene::new(components);

        if let Some(mid) = scene.component_mut(MID_PIPE) {
            mid.set_translucent(options.flow.mid_pipe_opacity);
        }

        let tank = FuelTank::install(&mut scene, &options.tank, options.geometry.liquid_color)
            .map_err(|e| log::warn!("Fuel gauge unavailable: {e}"))
            .ok();

        let mut flows: Vec<Box<dyn FlowAnimation>> = Vec::new();
        if matches!(options.flow.mode, FlowMode::Liquid | FlowMode::Both) {
            let mut liquid =
                FlowSequencer::build(&mut scene, &options.geometry, &options.flow, now);
            if let Some(tank) = &tank {
                liquid.attach_tank_gauge(tank.gauge());
            }
            flows.push(Box::new(liquid));
        }
        if matches!(options.flow.mode, FlowMode::Particles | FlowMode::Both) {
            let mut particles = ParticleFlowSequencer::build(
                &mut scene,
                &options.particles,
                options.geometry.liquid_color,
                rng,
            );
            if let Some(tank) = &tank {
                particles.attach_tank_gauge(tank.gauge());
            }
            flows.push(Box::new(particles));
        }

        let actuator = SolenoidActuator::install(&mut scene, &options.actuator);
        log::info!(
            "FADEC simulation ready: {} components, {} liquid meshes, {} flow animation(s)",
            scene.components.len(),
            scene.meshes().len(),
            flows.len()
        );

        Self {
            scene,
            throttle: ThrottleControl::new(&options.actuator),
            options,
            tank,
            flows,
            actuator,
        }
    }

    /// Set up over a component layout.
    pub fn from_layout(
        layout: ComponentLayout,
        options: Options,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Self {
        Self::new(layout.into_components(), options, now, rng)
    }

    /// Apply one user input.
    pub fn execute(
        &mut self,
        command: ControlCommand,
        now: Instant,
    ) -> Result<CommandOutcome, FlowError> {
        match command {
            ControlCommand::SetThrottle(value) => {
                let fuel = self.fuel_quantity();
                self.throttle
                    .set(&mut self.scene, &mut self.flows, value, fuel, now)
                    .map(CommandOutcome::Throttle)
            }
            ControlCommand::SetFuelQuantity(quantity) => Ok(match &mut self.tank {
                Some(tank) => {
                    CommandOutcome::FuelLevel(tank.set_quantity(&mut self.scene, quantity))
                }
                None => CommandOutcome::None,
            }),
            ControlCommand::SetSolenoidCurrent { side, current } => Ok(CommandOutcome::Actuator(
                self.actuator.set_current(&mut self.scene, side, current),
            )),
            ControlCommand::ToggleSolenoid(side) => {
                let _ = self.actuator.toggle(&mut self.scene, side);
                Ok(CommandOutcome::None)
            }
            ControlCommand::SetResponseSpeed(speed) => {
                self.actuator.set_response_speed(speed);
                Ok(CommandOutcome::None)
            }
        }
    }

    /// Advance every animation by one frame.
    pub fn tick(&mut self, now: Instant) {
        for flow in &mut self.flows {
            flow.update(&mut self.scene, now);
        }
        self.actuator.update(&mut self.scene);
    }

    /// Render state.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Options the simulation was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Tank quantity in percent, zero without a tank.
    #[must_use]
    pub fn fuel_quantity(&self) -> u8 {
        self.tank.as_ref().map_or(0, FuelTank::quantity)
    }

    /// Whether any flow animation is running.
    #[must_use]
    pub fn is_flowing(&self) -> bool {
        self.flows.iter().any(|f| f.is_flowing())
    }

    /// Throttle lever state.
    #[must_use]
    pub fn throttle(&self) -> &ThrottleControl {
        &self.throttle
    }

    /// Torque motor state.
    #[must_use]
    pub fn actuator(&self) -> &SolenoidActuator {
        &self.actuator
    }
}
