//! Combat logging
//!
//! Records every combat event for post-round analysis and the headless report.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;

use serde::Serialize;

use crate::units::UnitId;

/// A single entry in the combat log
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    /// Timestamp in round time (seconds since the world started ticking)
    pub timestamp: f32,
    pub event_type: CombatLogEventType,
    /// Unit that caused the event, if any
    pub source: Option<UnitId>,
    /// Unit affected by the event, if any
    pub target: Option<UnitId>,
    /// Numeric payload (damage applied, mana gained, ...). Zero when unused.
    pub amount: f32,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// Auto-attack landed
    Attack,
    /// Damage applied after mitigation
    Damage,
    /// Ability cast started
    AbilityCast,
    /// Lifecycle state entered
    StateChange,
    /// Unit died
    Death,
    /// Corpse hidden or unit destroyed
    Cleanup,
    /// Round event (start, end, reset, ...)
    MatchEvent,
}

/// Final per-unit numbers written at the top of a saved report
#[derive(Debug, Clone, Serialize)]
pub struct UnitMetadata {
    pub name: String,
    pub team: String,
    pub max_health: f32,
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

/// Round-level metadata for a saved report
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetadata {
    /// Winning side name, None for a draw
    pub winner: Option<String>,
    pub duration: f32,
    pub units: Vec<UnitMetadata>,
}

/// The combat log storing all events in chronological order
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    pub entries: Vec<CombatLogEntry>,
    /// Current round time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new round
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add an entry with no unit references
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.record(event_type, None, None, 0.0, message);
    }

    pub fn record(
        &mut self,
        event_type: CombatLogEventType,
        source: Option<UnitId>,
        target: Option<UnitId>,
        amount: f32,
        message: String,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            source,
            target,
            amount,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total mitigated damage dealt by one unit
    pub fn damage_dealt_by(&self, unit: UnitId) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Damage && e.source == Some(unit))
            .map(|e| e.amount)
            .sum()
    }

    /// Total mitigated damage taken by one unit
    pub fn damage_taken_by(&self, unit: UnitId) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Damage && e.target == Some(unit))
            .map(|e| e.amount)
            .sum()
    }

    /// Damage dealt per source unit
    pub fn damage_by_source(&self) -> HashMap<UnitId, f32> {
        let mut totals = HashMap::new();
        for entry in self.filter_by_type(CombatLogEventType::Damage) {
            if let Some(source) = entry.source {
                *totals.entry(source).or_insert(0.0) += entry.amount;
            }
        }
        totals
    }

    /// Units that died, in order of death
    pub fn deaths(&self) -> Vec<UnitId> {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Death)
            .filter_map(|e| e.target)
            .collect()
    }

    /// Render the report as text: a JSON metadata header followed by one line per entry.
    pub fn render(&self, metadata: &MatchMetadata) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = String::new();
        writeln!(out, "# boardsim combat log")?;
        writeln!(out, "{}", serde_json::to_string_pretty(metadata)?)?;
        writeln!(out)?;
        for entry in &self.entries {
            writeln!(
                out,
                "[{:>8.3}] {:?}: {}",
                entry.timestamp, entry.event_type, entry.message
            )?;
        }
        Ok(out)
    }

    /// Save the report to `output_path`, or to a timestamp-named file in the
    /// working directory. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &MatchMetadata,
        output_path: Option<&str>,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let filename = match output_path {
            Some(path) => path.to_string(),
            None => {
                let secs = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)?
                    .as_secs();
                format!("boardsim_log_{}.txt", secs)
            }
        };
        fs::write(&filename, self.render(metadata)?)?;
        Ok(filename)
    }
}
