//! Participant registry
//!
//! Tracks every participant seen since the last reset, keyed by stable
//! identity. Slots and addresses may change across reconnects; the cached
//! side assignment never does.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::config::schema::MatchConfig;
use crate::model::{AssignedTeam, Identity, SideOrdinal};

use super::resolver::{SideResolution, resolve_side};

// ============================================================================
// Participant
// ============================================================================

/// Connection lifecycle of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Record exists but the participant never reached any connect stage.
    #[default]
    NeverConnected,
    /// First connection attempt in progress.
    Connecting,
    /// Fully connected.
    Connected,
    /// Known participant connecting again.
    Reconnecting,
    /// Left; may still come back within the grace period.
    Disconnecting,
    /// Left for good.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NeverConnected => "never_connected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
        })
    }
}

/// A tracked participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Stable identity
    pub identity: Identity,
    /// Last seen address, possibly with port
    pub address: String,
    /// Host-local slot; changes across reconnects
    pub slot: u32,
    /// Connection lifecycle state
    pub connection: ConnectionState,
    /// Cached assignment; `None` until the first full connect
    pub assigned_team: Option<AssignedTeam>,
}

impl Participant {
    /// Returns `true` if connected and assigned to a side.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.connection == ConnectionState::Connected && self.side().is_some()
    }

    /// Returns the assigned side, if any.
    #[must_use]
    pub fn side(&self) -> Option<SideOrdinal> {
        self.assigned_team.and_then(AssignedTeam::side)
    }

    /// One-line human-readable dump.
    #[must_use]
    pub fn describe(&self) -> String {
        let team = self
            .assigned_team
            .map_or_else(|| "unresolved".to_string(), |t| t.to_string());
        format!(
            "participant {} slot={} address={} connection={} team={}",
            self.identity, self.slot, self.address, self.connection, team
        )
    }
}

/// Outcome of a full connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// No record for this identity; route to spectators.
    NotFound,
    /// Promoted to connected.
    Connected {
        /// Assignment after the connect
        team: AssignedTeam,
        /// Assignment was computed by this call
        newly_resolved: bool,
        /// Participant was previously connected or leaving
        reconnected: bool,
        /// Already connected; nothing changed
        duplicate: bool,
    },
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of participants in identity order.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: BTreeMap<Identity, Participant>,
}

impl ParticipantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a connection attempt.
    ///
    /// Unknown identities get a new `Connecting` record. Known identities
    /// have slot and address refreshed and move to `Reconnecting`; their
    /// assignment is kept.
    pub fn on_connecting(&mut self, identity: Identity, address: &str, slot: u32) {
        match self.participants.get_mut(&identity) {
            Some(participant) => {
                debug!(%identity, old_slot = participant.slot, slot, "participant reconnecting");
                participant.slot = slot;
                address.clone_into(&mut participant.address);
                participant.connection = ConnectionState::Reconnecting;
            }
            None => {
                debug!(%identity, address, slot, "participant connecting");
                self.participants.insert(
                    identity,
                    Participant {
                        identity,
                        address: address.to_string(),
                        slot,
                        connection: ConnectionState::Connecting,
                        assigned_team: None,
                    },
                );
            }
        }
    }

    /// Promotes a participant to `Connected`, resolving its side on first use.
    pub fn on_connect_full(&mut self, identity: Identity, config: &MatchConfig) -> ConnectOutcome {
        let Some(participant) = self.participants.get_mut(&identity) else {
            debug!(%identity, "full connect without a connecting record");
            return ConnectOutcome::NotFound;
        };

        let previous = participant.connection;
        let duplicate = previous == ConnectionState::Connected;
        if matches!(
            previous,
            ConnectionState::Disconnecting | ConnectionState::Disconnected
        ) {
            // host skipped the connecting notification
            debug!(%identity, from = %previous, "full connect while leaving; reconnecting first");
            participant.connection = ConnectionState::Reconnecting;
        }
        let reconnected = participant.connection == ConnectionState::Reconnecting;
        participant.connection = ConnectionState::Connected;

        let newly_resolved = participant.assigned_team.is_none();
        let team = match participant.assigned_team {
            Some(team) => team,
            None => {
                let team = match resolve_side(&participant.address, config) {
                    SideResolution::Assigned(side) => AssignedTeam::Side(side.ordinal),
                    SideResolution::Unassigned => AssignedTeam::Spectator,
                };
                debug!(%identity, address = %participant.address, %team, "resolved participant");
                participant.assigned_team = Some(team);
                team
            }
        };

        ConnectOutcome::Connected {
            team,
            newly_resolved,
            reconnected,
            duplicate,
        }
    }

    /// Marks a participant as leaving. Unknown identities are ignored.
    pub fn on_disconnect(&mut self, identity: Identity) {
        if let Some(participant) = self.participants.get_mut(&identity) {
            participant.connection = ConnectionState::Disconnecting;
        } else {
            debug!(%identity, "disconnect for unknown participant");
        }
    }

    /// Completes a disconnect. Only `Disconnecting` participants are affected.
    ///
    /// Returns `true` if the state changed.
    pub fn finalize_disconnect(&mut self, identity: Identity) -> bool {
        match self.participants.get_mut(&identity) {
            Some(participant) if participant.connection == ConnectionState::Disconnecting => {
                participant.connection = ConnectionState::Disconnected;
                true
            }
            _ => false,
        }
    }

    /// Removes every participant.
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Returns the participant with the given identity.
    #[must_use]
    pub fn get(&self, identity: Identity) -> Option<&Participant> {
        self.participants.get(&identity)
    }

    /// Number of tracked participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if no participant is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Number of connected participants assigned to a side.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.participants.values().filter(|p| p.is_active()).count()
    }

    /// Identities of connected participants assigned to a side.
    pub fn active_identities(&self) -> impl Iterator<Item = Identity> + '_ {
        self.participants
            .values()
            .filter(|p| p.is_active())
            .map(|p| p.identity)
    }

    /// Iterates participants in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }
}
