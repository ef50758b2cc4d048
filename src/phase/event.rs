//! Engine inputs
//!
//! Everything that can drive the engine: host events, operator commands and
//! scheduled callbacks. All three are serde-tagged so scripts and logs can
//! carry them as JSON.

use serde::{Deserialize, Serialize};

use crate::model::{Identity, SideOrdinal, TeamLabel};

/// An event reported by the game host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// The server started or stopped idling.
    HibernationChanged {
        /// `true` when the server goes idle
        hibernating: bool,
    },
    /// The current map ended.
    MapEnded,
    /// A participant started connecting.
    ParticipantConnecting {
        /// Stable identity
        identity: Identity,
        /// Remote address, possibly with port
        address: String,
        /// Host-local slot
        #[serde(default)]
        slot: u32,
    },
    /// A participant finished connecting.
    ParticipantConnected {
        /// Stable identity
        identity: Identity,
    },
    /// A participant left.
    ParticipantDisconnected {
        /// Stable identity
        identity: Identity,
    },
    /// A round started.
    RoundStarted,
    /// A round ended.
    RoundEnded {
        /// Winning side
        winner: SideOrdinal,
    },
    /// The host announced a warmup period.
    WarmupAnnounced,
    /// The warmup period ended.
    WarmupEnded,
    /// The host announced the start of the match.
    MatchStartAnnounced,
    /// Halftime began.
    HalftimeStarted,
    /// Sides were switched.
    SideSwitched,
    /// The bomb was planted.
    BombPlanted,
    /// The team intro sequence is about to play.
    TeamIntroStarting,
}

impl MatchEvent {
    /// Stable kind name, for logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HibernationChanged { .. } => "hibernation_changed",
            Self::MapEnded => "map_ended",
            Self::ParticipantConnecting { .. } => "participant_connecting",
            Self::ParticipantConnected { .. } => "participant_connected",
            Self::ParticipantDisconnected { .. } => "participant_disconnected",
            Self::RoundStarted => "round_started",
            Self::RoundEnded { .. } => "round_ended",
            Self::WarmupAnnounced => "warmup_announced",
            Self::WarmupEnded => "warmup_ended",
            Self::MatchStartAnnounced => "match_start_announced",
            Self::HalftimeStarted => "halftime_started",
            Self::SideSwitched => "side_switched",
            Self::BombPlanted => "bomb_planted",
            Self::TeamIntroStarting => "team_intro_starting",
        }
    }

    /// Returns `true` for events that fully reset the match.
    #[must_use]
    pub const fn is_reset(&self) -> bool {
        matches!(
            self,
            Self::HibernationChanged { hibernating: true } | Self::MapEnded
        )
    }
}

/// A command issued by a participant or the server operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// Knife winner picks the team to start on (`!ct` / `!t`).
    ChooseSide {
        /// Participant issuing the command
        issuer: Identity,
        /// Chosen team
        side: TeamLabel,
    },
    /// Dump match state and participants.
    PrintState,
    /// Dump the host's rules snapshot.
    PrintRules,
    /// Force the knife round to end with the given winner.
    EndKnifeRound {
        /// Team to declare the winner
        winner: TeamLabel,
    },
}

impl OperatorCommand {
    /// Stable kind name, for logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ChooseSide { .. } => "choose_side",
            Self::PrintState => "print_state",
            Self::PrintRules => "print_rules",
            Self::EndKnifeRound { .. } => "end_knife_round",
        }
    }
}

/// A deferred engine callback. Carries identities, never handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum Callback {
    /// Start the short warmup after the knife round.
    StartPostKnifeWarmup,
    /// Unpause if enough participants are back.
    ResumeIfReady,
    /// Complete a disconnect unless the participant came back.
    FinalizeDisconnect {
        /// Participant that left
        identity: Identity,
    },
    /// Centre-screen warmup reminder for a new participant.
    WarmupReminder {
        /// Participant to remind
        identity: Identity,
    },
}

impl Callback {
    /// Stable kind name, for logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StartPostKnifeWarmup => "start_post_knife_warmup",
            Self::ResumeIfReady => "resume_if_ready",
            Self::FinalizeDisconnect { .. } => "finalize_disconnect",
            Self::WarmupReminder { .. } => "warmup_reminder",
        }
    }
}

/// Any engine input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Host event
    Event(MatchEvent),
    /// Operator command
    Command(OperatorCommand),
    /// Fired callback
    Timer(Callback),
}

impl Input {
    /// Stable kind name of the wrapped input.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Event(event) => event.kind(),
            Self::Command(command) => command.kind(),
            Self::Timer(callback) => callback.kind(),
        }
    }
}

impl From<MatchEvent> for Input {
    fn from(event: MatchEvent) -> Self {
        Self::Event(event)
    }
}

impl From<OperatorCommand> for Input {
    fn from(command: OperatorCommand) -> Self {
        Self::Command(command)
    }
}

impl From<Callback> for Input {
    fn from(callback: Callback) -> Self {
        Self::Timer(callback)
    }
}
