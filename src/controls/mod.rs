//! Control inputs: fuel quantity, throttle and the solenoid torque motor.

pub mod actuator;
pub mod tank;
pub mod throttle;

pub use actuator::{ActuatorReadout, SolenoidActuator, SolenoidSide};
pub use tank::FuelTank;
pub use throttle::{ThrottleControl, ThrottleReadout};
