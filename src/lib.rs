// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Animated fuel-flow visualization core for a FADEC fuel metering unit.
//!
//! A named component table (the loaded 3D model) is annotated with
//! procedurally generated liquid meshes inside its pipes and tank. Control
//! inputs drive timed fill animations, particle flow and mechanical motion
//! of the solenoid actuator. The crate produces plain-data render state;
//! drawing it is left to the host renderer.
//!
//! # Key entry points
//!
//! - [`simulation::FadecSimulation`] - owns the scene and routes control
//!   commands
//! - [`flow::PipeGeometryBuilder`] - synthesizes liquid meshes from pipe
//!   bounds
//! - [`flow::FlowSequencer`] - time-driven phase walk filling the pipes
//! - [`flow::ParticleFlowSequencer`] - staggered particles along pipe
//!   centerlines
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Driving
//!
//! Every animation is a pure function of `now - start`. Hosts call
//! [`simulation::FadecSimulation::tick`] once per frame with the current
//! [`web_time::Instant`]; tests inject synthetic instants instead.

pub mod controls;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod options;
pub mod scene;
pub mod simulation;

pub use error::FlowError;
pub use simulation::{CommandOutcome, ControlCommand, FadecSimulation};
