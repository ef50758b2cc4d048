//! Reference host that records intents instead of driving a game server.

use std::io::Write;

use crate::error::HostError;
use crate::phase::{Intent, RulesSnapshot};

use super::Host;

/// Writes every intent as one JSON line and mirrors the game rules the
/// intents would change on a real server.
#[derive(Debug)]
pub struct SimulatedHost<W: Write> {
    writer: W,
    rules: RulesSnapshot,
    rules_available: bool,
}

impl<W: Write> SimulatedHost<W> {
    /// Creates a host writing to `writer`, with rules available.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            rules: RulesSnapshot {
                team_intro_period: true,
                ..RulesSnapshot::default()
            },
            rules_available: true,
        }
    }

    /// Makes the rules snapshot available or unavailable.
    pub const fn set_rules_available(&mut self, available: bool) {
        self.rules_available = available;
    }

    /// The mirrored rules, regardless of availability.
    pub const fn mirrored_rules(&self) -> &RulesSnapshot {
        &self.rules
    }

    /// Consumes the host, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn mirror(&mut self, intent: &Intent) {
        let rules = &mut self.rules;
        match intent {
            Intent::StartWarmup { .. } => rules.warmup_period = true,
            Intent::EndWarmup => rules.warmup_period = false,
            Intent::PauseMatch => rules.paused = true,
            Intent::UnpauseMatch { .. } => rules.paused = false,
            Intent::SkipTeamIntro => rules.team_intro_period = false,
            Intent::RestartMatch { swap_sides, .. } => {
                rules.swap_sides_on_restart = *swap_sides;
                rules.warmup_period = false;
                rules.match_started = true;
                rules.restarts += 1;
            }
            _ => {}
        }
    }
}

impl<W: Write> Host for SimulatedHost<W> {
    fn rules(&self) -> Option<RulesSnapshot> {
        self.rules_available.then_some(self.rules)
    }

    fn execute(&mut self, intent: &Intent) -> Result<(), HostError> {
        self.mirror(intent);
        let line = serde_json::to_string(intent)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
