//! Throttle lever: flow readout, flow speed and start/stop routing.

use web_time::Instant;

use crate::error::FlowError;
use crate::flow::{FlowAnimation, StartOutcome};
use crate::options::ActuatorOptions;
use crate::scene::Scene;

/// Values shown next to the throttle lever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleReadout {
    /// Lever position in percent.
    pub throttle: u8,
    /// Fuel flow in litres per minute.
    pub fuel_flow_lpm: f32,
    /// Speed handed to every flow animation.
    pub flow_speed: f32,
}

/// Throttle position and its mapping onto the flow animations.
#[derive(Debug, Clone)]
pub struct ThrottleControl {
    value: u8,
    max_fuel_flow: f32,
    speed_scale: f32,
}

impl ThrottleControl {
    /// Lever at zero.
    #[must_use]
    pub fn new(options: &ActuatorOptions) -> Self {
        Self {
            value: 0,
            max_fuel_flow: options.max_fuel_flow,
            speed_scale: options.throttle_speed_scale,
        }
    }

    /// Lever position in percent.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Readout for a lever position.
    #[must_use]
    pub fn readout(&self, value: u8) -> ThrottleReadout {
        let fraction = f32::from(value.min(100)) / 100.0;
        ThrottleReadout {
            throttle: value.min(100),
            fuel_flow_lpm: fraction * self.max_fuel_flow,
            flow_speed: fraction * self.speed_scale,
        }
    }

    /// Move the lever.
    ///
    /// Every animation gets the new flow speed. A non-zero position starts
    /// idle animations when the tank holds fuel; zero stops them all. The
    /// first start failure is returned after every animation was handled.
    pub fn set(
        &mut self,
        scene: &mut Scene,
        flows: &mut [Box<dyn FlowAnimation>],
        value: u8,
        fuel_quantity: u8,
        now: Instant,
    ) -> Result<ThrottleReadout, FlowError> {
        let readout = self.readout(value);
        self.value = readout.throttle;
        log::debug!(
            "Throttle {}%: {:.1} L/min",
            readout.throttle,
            readout.fuel_flow_lpm
        );

        for flow in flows.iter_mut() {
            flow.set_flow_speed(readout.flow_speed);
        }

        let mut first_error = None;
        if readout.throttle > 0 && fuel_quantity > 0 {
            for flow in flows.iter_mut().filter(|f| !f.is_flowing()) {
                match flow.start_flow(scene, f32::from(readout.throttle), now) {
                    Ok(StartOutcome::Started) => log::info!("{} flow started", flow.name()),
                    Ok(outcome) => log::debug!("{} flow not started: {outcome:?}", flow.name()),
                    Err(e) => {
                        log::error!("{} flow failed to start: {e}", flow.name());
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }
        } else if readout.throttle == 0 {
            for flow in flows.iter_mut() {
                flow.stop_flow(scene);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(readout),
        }
    }
}
