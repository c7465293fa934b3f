//! Centralized simulation options with TOML preset support.
//!
//! All tweakable settings (phase timing, geometry synthesis, particles, tank
//! gauge, actuator response) are consolidated here. Options serialize
//! to/from TOML for presets stored in `assets/presets/`.

mod actuator;
mod flow;
mod geometry;
mod particles;
mod tank;

use std::path::Path;

pub use actuator::ActuatorOptions;
pub use flow::{FlowMode, FlowOptions};
pub use geometry::GeometryOptions;
pub use particles::ParticleOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use tank::TankOptions;

use crate::error::FlowError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[flow]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Liquid fill sequence timing and casing treatment.
    pub flow: FlowOptions,
    /// Liquid mesh synthesis.
    pub geometry: GeometryOptions,
    /// Particle flow.
    pub particles: ParticleOptions,
    /// Fuel tank gauge.
    pub tank: TankOptions,
    /// Solenoid actuator and throttle readout.
    pub actuator: ActuatorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, FlowError> {
        let content = std::fs::read_to_string(path).map_err(FlowError::Io)?;
        toml::from_str(&content)
            .map_err(|e| FlowError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), FlowError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlowError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(FlowError::Io)?;
        }
        std::fs::write(path, content).map_err(FlowError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| {
                path.file_stem().and_then(|s| s.to_str()).map(str::to_owned)
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[flow]
supply_rise_ms = 500
mode = "both"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.flow.supply_rise_ms, 500);
        assert_eq!(opts.flow.mode, FlowMode::Both);
        // Everything else should be default
        assert_eq!(opts.flow.supply_turn_ms, 1500);
        assert_eq!(opts.particles.activation_delay_ms, 150);
        assert_eq!(opts.geometry.length_factor, 0.95);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("fadec-vis-options-test");
        let path = dir.join("slow.toml");
        let mut opts = Options::default();
        opts.flow.spool_ms = 4000;
        opts.save(&path).unwrap();

        assert_eq!(Options::load(&path).unwrap(), opts);
        assert!(Options::list_presets(&dir).contains(&"slow".to_owned()));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_preset_dir_lists_nothing() {
        assert!(Options::list_presets(Path::new("/nonexistent/presets")).is_empty());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["flow", "geometry", "particles", "tank", "actuator"] {
            assert!(props.contains_key(section), "missing {section}");
        }

        // Exposed fields present, skipped ones absent
        let flow = &props["flow"]["properties"];
        assert!(flow.get("supply_rise_ms").is_some());
        assert!(flow.get("extra_casings").is_none());
        let actuator = &props["actuator"]["properties"];
        assert!(actuator.get("rotation_smoothing").is_some());
        assert!(actuator.get("max_rotation").is_none());
    }
}
