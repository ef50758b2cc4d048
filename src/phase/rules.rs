//! Game rules snapshot
//!
//! Read-only view of the host's game rules. Several transitions require it;
//! when the host cannot provide one the transition is aborted.

use serde::{Deserialize, Serialize};

/// Host game rules at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSnapshot {
    /// A warmup period is running
    pub warmup_period: bool,
    /// The match is paused
    pub paused: bool,
    /// The team intro sequence is enabled
    pub team_intro_period: bool,
    /// Teams swap on the next restart
    pub swap_sides_on_restart: bool,
    /// The live match has started
    pub match_started: bool,
    /// Number of match restarts so far
    pub restarts: u32,
}

impl RulesSnapshot {
    /// Hand-written dump for the `print_rules` console command.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("warmup_period: {}", self.warmup_period),
            format!("paused: {}", self.paused),
            format!("team_intro_period: {}", self.team_intro_period),
            format!("swap_sides_on_restart: {}", self.swap_sides_on_restart),
            format!("match_started: {}", self.match_started),
            format!("restarts: {}", self.restarts),
        ]
    }
}
