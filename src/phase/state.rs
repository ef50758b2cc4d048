//! Match state representation
//!
//! Phase, knife winner and side display names change together through the
//! transition methods below, so `knife_winner` is present exactly when the
//! phase is `PostKnifeWarmup` or `Live`.

use std::fmt;

use serde::Serialize;

use crate::config::schema::MatchConfig;
use crate::model::SideOrdinal;

/// Match lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Nothing happening; initial and reset target.
    #[default]
    Idle,
    /// Warmup before the knife round.
    PreKnifeWarmup,
    /// Sudden-death round deciding who picks sides.
    KnifeRound,
    /// Short warmup while the knife winner chooses.
    PostKnifeWarmup,
    /// The live match.
    Live,
}

impl MatchPhase {
    /// All phases, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::PreKnifeWarmup,
        Self::KnifeRound,
        Self::PostKnifeWarmup,
        Self::Live,
    ];

    /// Stable snake-case name, used for logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PreKnifeWarmup => "pre_knife_warmup",
            Self::KnifeRound => "knife_round",
            Self::PostKnifeWarmup => "post_knife_warmup",
            Self::Live => "live",
        }
    }

    /// Returns `true` for phases where a knife winner must be recorded.
    #[must_use]
    pub const fn has_knife_winner(self) -> bool {
        matches!(self, Self::PostKnifeWarmup | Self::Live)
    }

    /// Phases where a paused match may resume automatically.
    #[must_use]
    pub const fn allows_resume(self) -> bool {
        matches!(self, Self::KnifeRound | Self::PostKnifeWarmup | Self::Live)
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable match state, owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    phase: MatchPhase,
    knife_winner: Option<SideOrdinal>,
    side_names: [String; 2],
    paused: bool,
}

impl MatchState {
    /// Creates the reset state: idle, no winner, configured team names.
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            phase: MatchPhase::Idle,
            knife_winner: None,
            side_names: SideOrdinal::ALL.map(|ordinal| config.side_name(ordinal)),
            paused: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Knife round winner; set only after the knife round.
    #[must_use]
    pub const fn knife_winner(&self) -> Option<SideOrdinal> {
        self.knife_winner
    }

    /// Display name currently shown for a side.
    #[must_use]
    pub fn side_name(&self, ordinal: SideOrdinal) -> &str {
        &self.side_names[ordinal.index()]
    }

    /// Whether the engine has paused the match.
    #[must_use]
    pub const fn paused(&self) -> bool {
        self.paused
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    pub(crate) const fn enter_pre_knife_warmup(&mut self) {
        self.phase = MatchPhase::PreKnifeWarmup;
        self.knife_winner = None;
    }

    pub(crate) const fn enter_knife_round(&mut self) {
        self.phase = MatchPhase::KnifeRound;
        self.knife_winner = None;
    }

    pub(crate) const fn enter_post_knife_warmup(&mut self, winner: SideOrdinal) {
        self.phase = MatchPhase::PostKnifeWarmup;
        self.knife_winner = Some(winner);
        // the knife round cannot end while the host is paused
        self.paused = false;
    }

    /// Moves to `Live`, swapping the side display names if requested.
    pub(crate) fn go_live(&mut self, swap_names: bool) {
        debug_assert!(self.knife_winner.is_some());
        self.phase = MatchPhase::Live;
        self.paused = false;
        if swap_names {
            self.side_names.swap(0, 1);
        }
    }

    pub(crate) fn swap_side_names(&mut self) {
        self.side_names.swap(0, 1);
    }

    pub(crate) const fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Full reset to defaults.
    pub(crate) fn reset(&mut self, config: &MatchConfig) {
        *self = Self::new(config);
    }

    /// Hand-written dump for the `print_state` console command.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let winner = self
            .knife_winner
            .map_or_else(|| "none".to_string(), |w| w.to_string());
        vec![
            format!("phase: {}", self.phase),
            format!("knife_winner: {winner}"),
            format!("side1_display_name: {}", self.side_names[0]),
            format!("side2_display_name: {}", self.side_names[1]),
            format!("paused: {}", self.paused),
        ]
    }
}
