//! Data-Driven Unit Templates
//!
//! Unit stats live in `assets/config/units.ron` instead of code, so balance
//! changes don't require recompilation. Templates are validated on load.

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sim::AbilityConfig;
use crate::units::UnitStats;

pub const DEFAULT_TEMPLATES_PATH: &str = "assets/config/units.ron";

/// One named unit template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub stats: UnitStats,
    /// Effect run when the unit casts (None = animation only)
    #[serde(default)]
    pub ability: Option<AbilityConfig>,
}

/// Root structure of the templates file
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub templates: HashMap<String, UnitTemplate>,
}

/// All unit templates, keyed by template name
#[derive(Debug, Clone)]
pub struct UnitTemplates {
    templates: HashMap<String, UnitTemplate>,
}

impl Default for UnitTemplates {
    /// Load templates from the default config file.
    /// Panics if the file cannot be loaded - use for tests only.
    fn default() -> Self {
        Self::load_from_file(Path::new(DEFAULT_TEMPLATES_PATH))
            .expect("Failed to load unit templates in Default impl")
    }
}

impl UnitTemplates {
    pub fn new(config: TemplatesConfig) -> Self {
        Self {
            templates: config.templates,
        }
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, String> {
        let config: TemplatesConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse unit templates: {}", e))?;
        let templates = Self::new(config);
        templates.validate()?;
        Ok(templates)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let templates = Self::from_ron_str(&contents)
            .map_err(|e| format!("{} ({})", e, path.display()))?;
        info!(
            "Loaded {} unit templates from {}",
            templates.templates.len(),
            path.display()
        );
        Ok(templates)
    }

    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.templates.get(name)
    }

    /// Template names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.templates.is_empty() {
            return Err("no unit templates defined".to_string());
        }
        for (key, template) in &self.templates {
            template
                .stats
                .validate()
                .map_err(|e| format!("template '{}': {}", key, e))?;
            if let Some(ability) = &template.ability {
                ability
                    .validate()
                    .map_err(|e| format!("template '{}': {}", key, e))?;
            }
        }
        Ok(())
    }
}
