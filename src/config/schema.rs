//! Configuration schema
//!
//! Typed description of a match: teams, stations (seats identified by
//! network addresses), the two live-match sides, warmup durations, the
//! minimum participant threshold, timing constants and message templates.
//! Deserialized once at startup and shared read-only as `Arc<MatchConfig>`.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::model::{SideOrdinal, TeamLabel};

// ============================================================================
// Root
// ============================================================================

/// Root configuration for one match session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Optional tournament metadata (informational only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentInfo>,

    /// Team roster referenced by sides.
    pub teams: Vec<TeamEntry>,

    /// Stations (physical seats) in configured order.
    pub stations: Vec<Station>,

    /// The two live-match sides.
    pub sides: Vec<Side>,

    /// Warmup durations.
    #[serde(default)]
    pub warmup: WarmupConfig,

    /// Minimum number of connected side members before play proceeds unpaused.
    #[serde(default = "default_min_participants")]
    pub min_participants: usize,

    /// Delays used for scheduled callbacks and host commands.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Chat and centre-screen message templates.
    #[serde(default)]
    pub messages: MessageConfig,
}

const fn default_min_participants() -> usize {
    10
}

impl MatchConfig {
    /// Returns the side with the given ordinal.
    #[must_use]
    pub fn side(&self, ordinal: SideOrdinal) -> Option<&Side> {
        self.sides.iter().find(|s| s.ordinal == ordinal)
    }

    /// Returns the side whose default team is `label`.
    #[must_use]
    pub fn side_by_label(&self, label: TeamLabel) -> Option<&Side> {
        self.sides.iter().find(|s| s.default_team == label)
    }

    /// Returns the station with the given id.
    #[must_use]
    pub fn station(&self, id: u32) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Returns the team with the given id.
    #[must_use]
    pub fn team(&self, id: u32) -> Option<&TeamEntry> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Display name of a side's team, or `"side N"` when unresolved.
    #[must_use]
    pub fn side_name(&self, ordinal: SideOrdinal) -> String {
        self.side(ordinal)
            .filter(|s| !s.team_name.is_empty())
            .map_or_else(|| ordinal.to_string(), |s| s.team_name.clone())
    }

    /// Fills each side's `team_name` from the team roster.
    ///
    /// Sides whose `team_id` is unknown keep an empty name; the validator
    /// reports those.
    pub fn resolve_team_names(&mut self) {
        for side in &mut self.sides {
            if let Some(team) = self.teams.iter().find(|t| t.id == side.team_id) {
                side.team_name.clone_from(&team.name);
            }
        }
    }
}

impl Default for MatchConfig {
    /// Template configuration written by `matchwarden init`.
    fn default() -> Self {
        let mut config = Self {
            tournament: Some(TournamentInfo::default()),
            teams: vec![
                TeamEntry {
                    id: 1,
                    name: "Team Liquid".to_string(),
                },
                TeamEntry {
                    id: 2,
                    name: "NaVi".to_string(),
                },
            ],
            stations: vec![
                Station {
                    id: 1,
                    name: "Cabin A".to_string(),
                    active: true,
                    addresses: vec![
                        IpAddr::from([192, 168, 1, 10]),
                        IpAddr::from([192, 168, 1, 11]),
                    ],
                },
                Station {
                    id: 2,
                    name: "Cabin B".to_string(),
                    active: true,
                    addresses: vec![
                        IpAddr::from([192, 168, 1, 20]),
                        IpAddr::from([192, 168, 1, 21]),
                    ],
                },
            ],
            sides: vec![
                Side {
                    ordinal: SideOrdinal::One,
                    station_id: 1,
                    default_team: TeamLabel::Ct,
                    team_id: 1,
                    team_name: String::new(),
                },
                Side {
                    ordinal: SideOrdinal::Two,
                    station_id: 2,
                    default_team: TeamLabel::T,
                    team_id: 2,
                    team_name: String::new(),
                },
            ],
            warmup: WarmupConfig::default(),
            min_participants: default_min_participants(),
            timing: TimingConfig::default(),
            messages: MessageConfig::default(),
        };
        config.resolve_team_names();
        config
    }
}

// ============================================================================
// Tournament / Teams
// ============================================================================

/// Tournament metadata carried for operator display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    /// Tournament id
    #[serde(default)]
    pub id: u32,
    /// Tournament name
    #[serde(default)]
    pub name: String,
    /// Free-form start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Free-form end date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl Default for TournamentInfo {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Kings Championship".to_string(),
            date_from: None,
            date_to: None,
        }
    }
}

/// A team in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Team id referenced by sides
    pub id: u32,
    /// Display name
    pub name: String,
}

// ============================================================================
// Stations / Sides
// ============================================================================

/// A physical seat identified by the network addresses allowed to play from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Station id referenced by sides
    pub id: u32,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Inactive stations never match an address
    #[serde(default = "default_true")]
    pub active: bool,
    /// Allowed addresses (without port)
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
}

const fn default_true() -> bool {
    true
}

/// One of the two live-match sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    /// Side ordinal (1 or 2)
    pub ordinal: SideOrdinal,
    /// Station whose participants play on this side
    pub station_id: u32,
    /// Team label the side starts on
    pub default_team: TeamLabel,
    /// Team roster id
    pub team_id: u32,
    /// Team display name, resolved from the roster at load time
    #[serde(default, skip_serializing)]
    pub team_name: String,
}

// ============================================================================
// Durations / Timing
// ============================================================================

/// Warmup durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupConfig {
    /// Warmup before the knife round
    #[serde(default = "default_pre_knife_secs")]
    pub pre_knife_secs: u32,
    /// Short warmup after the knife round, while the winner chooses
    #[serde(default = "default_post_knife_secs")]
    pub post_knife_secs: u32,
}

const fn default_pre_knife_secs() -> u32 {
    420
}

const fn default_post_knife_secs() -> u32 {
    60
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            pre_knife_secs: default_pre_knife_secs(),
            post_knife_secs: default_post_knife_secs(),
        }
    }
}

/// Delays for scheduled callbacks and host commands, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between knife round end and the post-knife warmup start
    pub knife_result_delay_secs: f64,
    /// Delay passed to the match restart after side choice
    pub restart_delay_secs: f64,
    /// Delay passed to a forced knife round termination
    pub terminate_round_delay_secs: f64,
    /// Delay before the centre-screen warmup reminder to a new participant
    pub warmup_reminder_delay_secs: f64,
    /// Time a disconnecting participant has to come back before being marked gone
    pub disconnect_grace_secs: f64,
    /// Delay between reaching the threshold and the resume check
    pub resume_delay_secs: f64,
    /// Countdown passed to the unpause command
    pub unpause_countdown_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            knife_result_delay_secs: 3.0,
            restart_delay_secs: 1.0,
            terminate_round_delay_secs: 1.0,
            warmup_reminder_delay_secs: 5.0,
            disconnect_grace_secs: 0.0,
            resume_delay_secs: 5.0,
            unpause_countdown_secs: 3.0,
        }
    }
}

impl TimingConfig {
    /// Named values, for validation.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("knife_result_delay_secs", self.knife_result_delay_secs),
            ("restart_delay_secs", self.restart_delay_secs),
            ("terminate_round_delay_secs", self.terminate_round_delay_secs),
            ("warmup_reminder_delay_secs", self.warmup_reminder_delay_secs),
            ("disconnect_grace_secs", self.disconnect_grace_secs),
            ("resume_delay_secs", self.resume_delay_secs),
            ("unpause_countdown_secs", self.unpause_countdown_secs),
        ]
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Message templates. `{team}` is replaced with a team display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Prefix prepended to chat messages
    pub prefix: String,
    /// Chat message to a participant joining during the pre-knife warmup
    pub pre_knife_warmup: String,
    /// Delayed centre-screen reminder during the pre-knife warmup
    pub pre_knife_reminder: String,
    /// Broadcast when the knife round starts
    pub knife_round_started: String,
    /// Broadcast naming the knife round winner
    pub choose_side: String,
    /// Broadcast explaining the side choice commands
    pub choose_side_hint: String,
    /// Broadcast when the live match starts
    pub good_luck: String,
    /// Centre alert when the bomb is planted
    pub bomb_planted: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            prefix: "[KINGS]".to_string(),
            pre_knife_warmup: "Warmup before the knife round!".to_string(),
            pre_knife_reminder: "Warmup before the knife round".to_string(),
            knife_round_started: "Knife round started".to_string(),
            choose_side: "{team} choose your side".to_string(),
            choose_side_hint: "Type !ct or !t".to_string(),
            good_luck: "Good luck, have fun!".to_string(),
            bomb_planted: "Bomb planted. 40 seconds to detonation".to_string(),
        }
    }
}

impl MessageConfig {
    /// Prepends the configured prefix to a chat line.
    #[must_use]
    pub fn chat(&self, text: &str) -> String {
        if self.prefix.is_empty() {
            text.to_string()
        } else {
            format!("{}: {text}", self.prefix)
        }
    }

    /// Renders a template, substituting `{team}`.
    #[must_use]
    pub fn render(template: &str, team: &str) -> String {
        template.replace("{team}", team)
    }
}
