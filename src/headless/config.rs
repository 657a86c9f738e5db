//! JSON scenario parsing for headless mode
//!
//! A scenario lists the units on the board and how long the round may run.
//! Unit stats come from the RON templates; the scenario only names them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::DEFAULT_MAX_ROUND_DURATION;
use crate::units::Team;

use super::templates::UnitTemplates;

/// One unit placed on the board by a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioUnit {
    /// Template name from the unit templates file
    pub template: String,
    pub team: Team,
    /// Board slot id, also used to spread default spawn positions
    #[serde(default)]
    pub slot: Option<i32>,
    /// Overrides the template's star level
    #[serde(default)]
    pub star_level: Option<u32>,
    /// Explicit spawn position; when absent the unit is placed on its team's row
    #[serde(default)]
    pub position: Option<[f32; 3]>,
}

/// Headless round configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub units: Vec<ScenarioUnit>,
    /// Maximum round duration in seconds before declaring a draw
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Seed for reproducible spawn jitter
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_max_duration() -> f32 {
    DEFAULT_MAX_ROUND_DURATION
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        config.validate_shape()?;
        Ok(config)
    }

    /// Checks that need nothing but the scenario itself
    fn validate_shape(&self) -> Result<(), String> {
        if !self.units.iter().any(|u| u.team == Team::Player) {
            return Err("scenario needs at least one Player unit".to_string());
        }
        if !self.units.iter().any(|u| u.team != Team::Player) {
            return Err("scenario needs at least one Enemy or Neutral unit".to_string());
        }
        if !(self.max_duration_secs > 0.0) {
            return Err(format!(
                "max_duration_secs must be positive, got {}",
                self.max_duration_secs
            ));
        }
        for (i, unit) in self.units.iter().enumerate() {
            if unit.star_level == Some(0) {
                return Err(format!("unit {} ({}): star_level must be at least 1", i, unit.template));
            }
        }
        Ok(())
    }

    /// Full validation, including that every template exists
    pub fn validate(&self, templates: &UnitTemplates) -> Result<(), String> {
        self.validate_shape()?;
        for (i, unit) in self.units.iter().enumerate() {
            if templates.get(&unit.template).is_none() {
                return Err(format!(
                    "unit {}: unknown template '{}'. Valid templates: {}",
                    i,
                    unit.template,
                    templates.names().join(", ")
                ));
            }
        }
        Ok(())
    }
}
