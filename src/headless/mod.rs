//! Headless mode for automated testing
//!
//! Runs a single board round from a JSON scenario without any graphical
//! output, suitable for automated testing and balance sweeps.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- demos/skirmish.json --output round.txt
//! ```
//!
//! ## JSON Scenario
//!
//! ```json
//! {
//!   "units": [
//!     { "template": "Knight", "team": "Player", "slot": 0 },
//!     { "template": "Brute", "team": "Enemy", "star_level": 2 }
//!   ],
//!   "max_duration_secs": 90,
//!   "random_seed": 7
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod runner;
pub mod templates;

pub use adapters::{DirectMover, LoggingAnimator};
pub use config::{ScenarioConfig, ScenarioUnit};
pub use runner::{
    build_headless_app, build_world, run_headless_match, run_to_completion, simulate_round,
    MatchResult, Participant, UnitResult,
};
pub use templates::{UnitTemplate, UnitTemplates};
