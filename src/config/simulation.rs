use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::world::zone;
use crate::world::WorldSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 0 picks a random seed at startup.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_start_zone")]
    pub start_zone: String,
    /// Stop after this many completed passes. 0 runs until interrupted.
    #[serde(default)]
    pub max_passes: u64,
    #[serde(default)]
    pub effect_delay_ms: u64,
    /// Let an AI drive the player when no console is attached.
    #[serde(default = "default_autopilot")]
    pub autopilot: bool,
}

fn default_tick_rate() -> f32 {
    10.0
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_start_zone() -> String {
    "glade".to_string()
}
fn default_autopilot() -> bool {
    true
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            log_level: default_log_level(),
            seed: 0,
            start_zone: default_start_zone(),
            max_passes: 0,
            effect_delay_ms: 0,
            autopilot: default_autopilot(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.tick_rate_hz <= 0.0 {
            errors.push(format!(
                "tick_rate_hz must be > 0.0, got {}. Example: tick_rate_hz = 10.0",
                self.tick_rate_hz
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if zone::find(&self.start_zone).is_none() {
            errors.push(format!(
                "start_zone must be one of {:?}, got '{}'. Example: start_zone = \"glade\"",
                zone::ids(),
                self.start_zone
            ));
        }

        if self.effect_delay_ms > 10_000 {
            errors.push(format!(
                "effect_delay_ms must be <= 10000, got {}. Example: effect_delay_ms = 150",
                self.effect_delay_ms
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.tick_rate_hz)
    }

    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            effect_delay: Duration::from_millis(self.effect_delay_ms),
        }
    }
}
