//! Outbound intents
//!
//! Side effects the engine asks the host to perform. The engine never
//! performs them itself; hosts execute them fire-and-forget.

use serde::Serialize;

use crate::model::{Identity, SideOrdinal, Team, TeamLabel};

use super::event::Callback;

/// A side effect requested by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Start a warmup period of the given length.
    StartWarmup {
        /// Warmup length
        duration_secs: u32,
    },
    /// End the running warmup.
    EndWarmup,
    /// Pause the match.
    PauseMatch,
    /// Unpause the match after a countdown.
    UnpauseMatch {
        /// Countdown before play resumes
        after_secs: f64,
    },
    /// Restart the match, optionally swapping sides.
    RestartMatch {
        /// Swap teams on restart
        swap_sides: bool,
        /// Delay before restart
        delay_secs: f64,
    },
    /// Set the display name shown for a side.
    SetSideDisplayName {
        /// Side
        ordinal: SideOrdinal,
        /// Name
        name: String,
    },
    /// Chat message to everyone.
    Broadcast {
        /// Message text
        text: String,
    },
    /// Chat message to one participant.
    Message {
        /// Recipient
        identity: Identity,
        /// Message text
        text: String,
    },
    /// Centre-screen message to one participant.
    CenterMessage {
        /// Recipient
        identity: Identity,
        /// Message text
        text: String,
    },
    /// Centre-screen alert to everyone.
    CenterAlert {
        /// Alert text
        text: String,
    },
    /// Place a participant on a team.
    AssignTeam {
        /// Participant
        identity: Identity,
        /// Team
        team: Team,
    },
    /// Remove everything except the knife.
    StripLoadout {
        /// Participant
        identity: Identity,
    },
    /// Skip the team intro sequence.
    SkipTeamIntro,
    /// Suppress the host's default broadcast for the current event.
    SuppressBroadcast,
    /// End the current round.
    TerminateRound {
        /// Delay before the round ends
        delay_secs: f64,
        /// Winning team
        winner: TeamLabel,
    },
    /// Fire `callback` after a delay.
    ScheduleCallback {
        /// Delay
        delay_secs: f64,
        /// Callback to fire
        callback: Callback,
    },
    /// Lines to print on the operator console.
    ConsoleOutput {
        /// Output lines
        lines: Vec<String>,
    },
}

impl Intent {
    /// Stable kind name, for logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StartWarmup { .. } => "start_warmup",
            Self::EndWarmup => "end_warmup",
            Self::PauseMatch => "pause_match",
            Self::UnpauseMatch { .. } => "unpause_match",
            Self::RestartMatch { .. } => "restart_match",
            Self::SetSideDisplayName { .. } => "set_side_display_name",
            Self::Broadcast { .. } => "broadcast",
            Self::Message { .. } => "message",
            Self::CenterMessage { .. } => "center_message",
            Self::CenterAlert { .. } => "center_alert",
            Self::AssignTeam { .. } => "assign_team",
            Self::StripLoadout { .. } => "strip_loadout",
            Self::SkipTeamIntro => "skip_team_intro",
            Self::SuppressBroadcast => "suppress_broadcast",
            Self::TerminateRound { .. } => "terminate_round",
            Self::ScheduleCallback { .. } => "schedule_callback",
            Self::ConsoleOutput { .. } => "console_output",
        }
    }
}
