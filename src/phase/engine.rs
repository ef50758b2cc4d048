//! Match engine orchestration
//!
//! The `MatchEngine` owns the match state and the participant registry and
//! turns every input into a (possibly empty) list of intents. Dispatch is
//! explicit on `(phase, input)`: each pair is either a transition or a
//! logged no-op.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::schema::{MatchConfig, MessageConfig};
use crate::model::{Identity, SideOrdinal, Team, TeamLabel};
use crate::participant::{ConnectOutcome, ConnectionState, ParticipantRegistry};

use super::event::{Callback, Input, MatchEvent, OperatorCommand};
use super::intent::Intent;
use super::rules::RulesSnapshot;
use super::state::{MatchPhase, MatchState};

/// Match phase state machine.
///
/// Single owner of [`MatchState`] and [`ParticipantRegistry`]. Handlers run
/// to completion and never perform side effects themselves.
#[derive(Debug)]
pub struct MatchEngine {
    config: Arc<MatchConfig>,
    state: MatchState,
    registry: ParticipantRegistry,
}

impl MatchEngine {
    /// Creates an idle engine for the given configuration.
    #[must_use]
    pub fn new(config: Arc<MatchConfig>) -> Self {
        let state = MatchState::new(&config);
        Self {
            config,
            state,
            registry: ParticipantRegistry::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the current match state.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Returns the participant registry.
    #[must_use]
    pub const fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    /// Handles any input.
    pub fn handle(&mut self, input: &Input, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        match input {
            Input::Event(event) => self.on_event(event, rules),
            Input::Command(command) => self.on_command(command, rules),
            Input::Timer(callback) => self.on_timer(callback),
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Handles a host event.
    pub fn on_event(&mut self, event: &MatchEvent, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        use MatchEvent as E;
        use MatchPhase as P;

        let phase = self.state.phase();
        let kind = event.kind();
        debug!(%phase, event = kind, "handling event");

        match (phase, event) {
            (_, E::HibernationChanged { hibernating: true } | E::MapEnded) => {
                self.reset(kind);
                Vec::new()
            }
            (_, E::HibernationChanged { hibernating: false }) => {
                ignored(phase, kind, "server resumed from hibernation")
            }

            (
                _,
                E::ParticipantConnecting {
                    identity,
                    address,
                    slot,
                },
            ) => {
                self.registry.on_connecting(*identity, address, *slot);
                Vec::new()
            }
            (_, E::ParticipantConnected { identity }) => self.participant_connected(*identity),
            (_, E::ParticipantDisconnected { identity }) => {
                self.participant_disconnected(*identity)
            }

            (_, E::BombPlanted) => vec![
                Intent::SuppressBroadcast,
                Intent::CenterAlert {
                    text: self.config.messages.bomb_planted.clone(),
                },
            ],
            (P::KnifeRound, E::TeamIntroStarting) => {
                vec![Intent::SuppressBroadcast, Intent::SkipTeamIntro]
            }
            (_, E::TeamIntroStarting) => vec![Intent::SuppressBroadcast],

            (P::PreKnifeWarmup, E::WarmupEnded) => self.pre_knife_warmup_ended(rules),
            (P::PostKnifeWarmup, E::WarmupEnded) => {
                self.state.go_live(false);
                info!(from = %phase, to = %P::Live, "post-knife warmup ended without a side choice");
                Vec::new()
            }

            (P::KnifeRound, E::RoundStarted) => self.knife_round_started(rules),
            (P::KnifeRound, E::RoundEnded { winner }) => self.knife_round_ended(*winner),
            (P::PostKnifeWarmup, E::WarmupAnnounced) => self.announce_side_choice(),

            (P::Live, E::RoundStarted) => self.live_round_started(rules),
            (P::Live, E::MatchStartAnnounced) => vec![Intent::Broadcast {
                text: self.config.messages.chat(&self.config.messages.good_luck),
            }],
            (P::Live, E::HalftimeStarted) => {
                self.state.swap_side_names();
                info!("halftime: side display names swapped");
                self.side_name_intents()
            }
            (P::Live, E::SideSwitched) => {
                if rules.is_none() {
                    return aborted(phase, kind, "rules snapshot");
                }
                self.side_name_intents()
            }

            (
                _,
                E::RoundStarted
                | E::RoundEnded { .. }
                | E::WarmupAnnounced
                | E::WarmupEnded
                | E::MatchStartAnnounced
                | E::HalftimeStarted
                | E::SideSwitched,
            ) => ignored(phase, kind, "no transition defined for this phase"),
        }
    }

    fn reset(&mut self, kind: &str) {
        let previous = self.state.phase();
        let participants = self.registry.len();
        self.state.reset(&self.config);
        self.registry.clear();
        info!(from = %previous, trigger = kind, participants, "match state reset");
    }

    fn participant_connected(&mut self, identity: Identity) -> Vec<Intent> {
        let (team, newly_resolved) = match self.registry.on_connect_full(identity, &self.config) {
            ConnectOutcome::NotFound => {
                debug!(%identity, "no connecting record; routing to spectators");
                return vec![Intent::AssignTeam {
                    identity,
                    team: Team::Spectator,
                }];
            }
            ConnectOutcome::Connected {
                duplicate: true, ..
            } => {
                debug!(%identity, "duplicate full connect dropped");
                return Vec::new();
            }
            ConnectOutcome::Connected {
                team,
                newly_resolved,
                reconnected,
                ..
            } => {
                if reconnected {
                    info!(%identity, %team, "participant reconnected");
                }
                (team, newly_resolved)
            }
        };

        let Some(label) = team
            .side()
            .and_then(|ordinal| self.config.side(ordinal))
            .map(|side| side.default_team)
        else {
            info!(%identity, "participant is not on any side; routing to spectators");
            return vec![Intent::AssignTeam {
                identity,
                team: Team::Spectator,
            }];
        };

        let mut intents = Vec::new();
        if newly_resolved {
            intents.push(Intent::AssignTeam {
                identity,
                team: label.into(),
            });
        }

        match self.state.phase() {
            MatchPhase::Idle => {
                self.state.enter_pre_knife_warmup();
                info!(%identity, from = %MatchPhase::Idle, to = %MatchPhase::PreKnifeWarmup, "first participant connected");
                intents.push(Intent::StartWarmup {
                    duration_secs: self.config.warmup.pre_knife_secs,
                });
                intents.extend(self.welcome(identity));
            }
            MatchPhase::PreKnifeWarmup => intents.extend(self.welcome(identity)),
            MatchPhase::KnifeRound => intents.push(Intent::StripLoadout { identity }),
            MatchPhase::PostKnifeWarmup | MatchPhase::Live => {}
        }

        self.maybe_schedule_resume(&mut intents);
        intents
    }

    fn welcome(&self, identity: Identity) -> [Intent; 2] {
        let messages = &self.config.messages;
        [
            Intent::Message {
                identity,
                text: messages.chat(&messages.pre_knife_warmup),
            },
            Intent::ScheduleCallback {
                delay_secs: self.config.timing.warmup_reminder_delay_secs,
                callback: Callback::WarmupReminder { identity },
            },
        ]
    }

    fn participant_disconnected(&mut self, identity: Identity) -> Vec<Intent> {
        if self.registry.get(identity).is_none() {
            debug!(%identity, "disconnect for unknown participant ignored");
            return Vec::new();
        }

        self.registry.on_disconnect(identity);
        let grace = self.config.timing.disconnect_grace_secs;
        if grace > 0.0 {
            vec![Intent::ScheduleCallback {
                delay_secs: grace,
                callback: Callback::FinalizeDisconnect { identity },
            }]
        } else {
            self.registry.finalize_disconnect(identity);
            debug!(%identity, "participant left");
            Vec::new()
        }
    }

    fn pre_knife_warmup_ended(&mut self, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        self.state.enter_knife_round();
        info!(
            from = %MatchPhase::PreKnifeWarmup,
            to = %MatchPhase::KnifeRound,
            active = self.registry.active_count(),
            "pre-knife warmup ended"
        );
        let mut intents = Vec::new();
        self.maybe_pause(rules, &mut intents);
        intents
    }

    fn knife_round_started(&mut self, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        if rules.is_none() {
            return aborted(MatchPhase::KnifeRound, "round_started", "rules snapshot");
        }

        let mut intents = vec![Intent::SkipTeamIntro];
        intents.extend(
            self.registry
                .active_identities()
                .map(|identity| Intent::StripLoadout { identity }),
        );
        intents.push(Intent::Broadcast {
            text: self
                .config
                .messages
                .chat(&self.config.messages.knife_round_started),
        });
        self.maybe_pause(rules, &mut intents);
        intents
    }

    fn knife_round_ended(&mut self, winner: SideOrdinal) -> Vec<Intent> {
        self.state.enter_post_knife_warmup(winner);
        info!(
            from = %MatchPhase::KnifeRound,
            to = %MatchPhase::PostKnifeWarmup,
            %winner,
            team = self.state.side_name(winner),
            "knife round won"
        );
        vec![Intent::ScheduleCallback {
            delay_secs: self.config.timing.knife_result_delay_secs,
            callback: Callback::StartPostKnifeWarmup,
        }]
    }

    fn announce_side_choice(&self) -> Vec<Intent> {
        let Some(winner) = self.state.knife_winner() else {
            return aborted(MatchPhase::PostKnifeWarmup, "warmup_announced", "knife winner");
        };
        let messages = &self.config.messages;
        let prompt = MessageConfig::render(&messages.choose_side, self.state.side_name(winner));
        vec![
            Intent::Broadcast {
                text: messages.chat(&prompt),
            },
            Intent::Broadcast {
                text: messages.chat(&messages.choose_side_hint),
            },
        ]
    }

    fn live_round_started(&mut self, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        if rules.is_none() {
            return aborted(MatchPhase::Live, "round_started", "rules snapshot");
        }
        let mut intents = Vec::new();
        self.maybe_pause(rules, &mut intents);
        intents
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Handles an operator command.
    pub fn on_command(
        &mut self,
        command: &OperatorCommand,
        rules: Option<&RulesSnapshot>,
    ) -> Vec<Intent> {
        debug!(phase = %self.state.phase(), command = command.kind(), "handling command");
        match command {
            OperatorCommand::ChooseSide { issuer, side } => self.choose_side(*issuer, *side, rules),
            OperatorCommand::PrintState => vec![Intent::ConsoleOutput {
                lines: self.describe(),
            }],
            OperatorCommand::PrintRules => rules.map_or_else(
                || aborted(self.state.phase(), command.kind(), "rules snapshot"),
                |rules| {
                    vec![Intent::ConsoleOutput {
                        lines: rules.describe(),
                    }]
                },
            ),
            OperatorCommand::EndKnifeRound { winner } => self.end_knife_round(*winner, rules),
        }
    }

    fn choose_side(
        &mut self,
        issuer: Identity,
        choice: TeamLabel,
        rules: Option<&RulesSnapshot>,
    ) -> Vec<Intent> {
        let phase = self.state.phase();
        if phase != MatchPhase::PostKnifeWarmup {
            return ignored(phase, "choose_side", "side choice only follows a knife round");
        }
        let Some(winner) = self.state.knife_winner() else {
            return aborted(phase, "choose_side", "knife winner");
        };

        let issuer_side = self
            .registry
            .get(issuer)
            .filter(|p| p.connection == ConnectionState::Connected)
            .and_then(|p| p.side());
        if issuer_side != Some(winner) {
            debug!(%issuer, %winner, ?issuer_side, "side choice from outside the winning side");
            return ignored(phase, "choose_side", "issuer is not a connected member of the winning side");
        }

        if rules.is_none() {
            return aborted(phase, "choose_side", "rules snapshot");
        }
        let Some(winning_side) = self.config.side(winner) else {
            return aborted(phase, "choose_side", "winning side configuration");
        };

        let swap = winning_side.default_team != choice;
        self.state.go_live(swap);
        info!(%issuer, %winner, %choice, swap, from = %phase, to = %MatchPhase::Live, "side chosen");

        let mut intents = vec![Intent::EndWarmup];
        if swap {
            intents.extend(self.side_name_intents());
        }
        intents.push(Intent::RestartMatch {
            swap_sides: swap,
            delay_secs: self.config.timing.restart_delay_secs,
        });
        intents
    }

    fn end_knife_round(&self, winner: TeamLabel, rules: Option<&RulesSnapshot>) -> Vec<Intent> {
        let phase = self.state.phase();
        if phase != MatchPhase::KnifeRound {
            return ignored(phase, "end_knife_round", "no knife round in progress");
        }
        if rules.is_none() {
            return aborted(phase, "end_knife_round", "rules snapshot");
        }
        let side = self.config.side_by_label(winner).map(|s| s.ordinal);
        info!(%winner, ?side, "knife round terminated by operator");
        vec![Intent::TerminateRound {
            delay_secs: self.config.timing.terminate_round_delay_secs,
            winner,
        }]
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Handles a fired callback. Guards are re-checked at fire time.
    pub fn on_timer(&mut self, callback: &Callback) -> Vec<Intent> {
        let phase = self.state.phase();
        let kind = callback.kind();
        match callback {
            Callback::StartPostKnifeWarmup => {
                if phase != MatchPhase::PostKnifeWarmup {
                    return ignored(phase, kind, "stale callback");
                }
                vec![Intent::StartWarmup {
                    duration_secs: self.config.warmup.post_knife_secs,
                }]
            }
            Callback::ResumeIfReady => {
                if !self.state.paused() || !phase.allows_resume() || self.below_threshold() {
                    return ignored(phase, kind, "resume conditions no longer hold");
                }
                self.state.set_paused(false);
                info!(%phase, active = self.registry.active_count(), "resuming match");
                vec![Intent::UnpauseMatch {
                    after_secs: self.config.timing.unpause_countdown_secs,
                }]
            }
            Callback::FinalizeDisconnect { identity } => {
                if self.registry.finalize_disconnect(*identity) {
                    debug!(%identity, "participant left");
                } else {
                    debug!(%identity, "participant came back or is unknown");
                }
                Vec::new()
            }
            Callback::WarmupReminder { identity } => {
                let connected = self
                    .registry
                    .get(*identity)
                    .is_some_and(|p| p.connection == ConnectionState::Connected);
                if phase != MatchPhase::PreKnifeWarmup || !connected {
                    return ignored(phase, kind, "stale callback");
                }
                vec![Intent::CenterMessage {
                    identity: *identity,
                    text: self.config.messages.pre_knife_reminder.clone(),
                }]
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn below_threshold(&self) -> bool {
        self.registry.active_count() < self.config.min_participants
    }

    /// Pauses when short-handed and the host is not already paused.
    ///
    /// The host's rules win over the engine's own flag, which goes stale
    /// whenever the host is unpaused without a `ResumeIfReady`.
    fn maybe_pause(&mut self, rules: Option<&RulesSnapshot>, intents: &mut Vec<Intent>) {
        let host_paused = rules.map_or(self.state.paused(), |r| r.paused);
        if !host_paused {
            self.state.set_paused(false);
        }
        if self.below_threshold() && !host_paused {
            self.state.set_paused(true);
            info!(
                phase = %self.state.phase(),
                active = self.registry.active_count(),
                required = self.config.min_participants,
                "too few participants; pausing"
            );
            intents.push(Intent::PauseMatch);
        }
    }

    fn maybe_schedule_resume(&self, intents: &mut Vec<Intent>) {
        if self.state.paused() && self.state.phase().allows_resume() && !self.below_threshold() {
            intents.push(Intent::ScheduleCallback {
                delay_secs: self.config.timing.resume_delay_secs,
                callback: Callback::ResumeIfReady,
            });
        }
    }

    fn side_name_intents(&self) -> Vec<Intent> {
        SideOrdinal::ALL
            .iter()
            .map(|&ordinal| Intent::SetSideDisplayName {
                ordinal,
                name: self.state.side_name(ordinal).to_string(),
            })
            .collect()
    }

    /// State plus one line per participant.
    fn describe(&self) -> Vec<String> {
        let mut lines = self.state.describe();
        lines.push(format!(
            "participants: {} ({} active)",
            self.registry.len(),
            self.registry.active_count()
        ));
        lines.extend(self.registry.iter().map(|p| format!("  {}", p.describe())));
        lines
    }
}

fn ignored(phase: MatchPhase, input: &str, reason: &str) -> Vec<Intent> {
    debug!(%phase, input, reason, "input ignored");
    Vec::new()
}

fn aborted(phase: MatchPhase, input: &str, missing: &str) -> Vec<Intent> {
    warn!(%phase, input, missing, "transition aborted: collaborator data unavailable");
    Vec::new()
}
