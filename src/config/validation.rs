//! Configuration validation
//!
//! Semantic validation of a deserialized `MatchConfig`. Validation collects
//! ALL errors (doesn't stop at first) so an operator can fix a broken
//! configuration in one pass.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use crate::config::schema::{MatchConfig, Side, Station, TeamEntry};
use crate::error::{Severity, ValidationIssue};

/// Longest accepted `timing.*` delay: one day.
pub const MAX_DELAY_SECS: f64 = 86_400.0;

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &MatchConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_tournament(config);
        self.validate_teams(&config.teams);
        self.validate_stations(&config.stations);
        self.validate_sides(config);
        self.validate_durations(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn validate_tournament(&mut self, config: &MatchConfig) {
        if let Some(tournament) = &config.tournament {
            if tournament.name.trim().is_empty() {
                self.add_warning("tournament.name", "Tournament name is empty");
            }
        }
    }

    fn validate_teams(&mut self, teams: &[TeamEntry]) {
        let mut seen = HashSet::new();
        for (i, team) in teams.iter().enumerate() {
            if !seen.insert(team.id) {
                self.add_error(
                    &format!("teams[{i}].id"),
                    &format!("Duplicate team id {}", team.id),
                );
            }
            if team.name.trim().is_empty() {
                self.add_error(&format!("teams[{i}].name"), "Team name cannot be empty");
            }
        }
    }

    fn validate_stations(&mut self, stations: &[Station]) {
        if stations.is_empty() {
            self.add_error("stations", "At least one station is required");
            return;
        }

        let mut ids = HashSet::new();
        let mut owners: HashMap<IpAddr, u32> = HashMap::new();

        for (i, station) in stations.iter().enumerate() {
            let path = format!("stations[{i}]");

            if !ids.insert(station.id) {
                self.add_error(
                    &format!("{path}.id"),
                    &format!("Duplicate station id {}", station.id),
                );
            }

            if station.name.trim().is_empty() {
                self.add_warning(&format!("{path}.name"), "Station has no display name");
            }

            if station.addresses.is_empty() {
                self.add_error(
                    &format!("{path}.addresses"),
                    &format!("Station {} has no allowed addresses", station.id),
                );
            }

            if !station.active {
                continue;
            }
            for address in &station.addresses {
                match owners.get(address) {
                    Some(&owner) if owner != station.id => self.add_error(
                        &format!("{path}.addresses"),
                        &format!(
                            "Address {address} is claimed by active stations {owner} and {}",
                            station.id
                        ),
                    ),
                    Some(_) => {}
                    None => {
                        owners.insert(*address, station.id);
                    }
                }
            }
        }
    }

    fn validate_sides(&mut self, config: &MatchConfig) {
        let sides = &config.sides;
        if sides.len() != 2 {
            self.add_error(
                "sides",
                &format!("Exactly two sides are required, found {}", sides.len()),
            );
        }

        let mut ordinals = HashSet::new();
        let mut stations = HashSet::new();
        for (i, side) in sides.iter().enumerate() {
            let path = format!("sides[{i}]");

            if !ordinals.insert(side.ordinal) {
                self.add_error(
                    &format!("{path}.ordinal"),
                    &format!("Duplicate side ordinal {}", side.ordinal.number()),
                );
            }

            self.validate_side_station(config, side, &path);
            if !stations.insert(side.station_id) {
                self.add_error(
                    &format!("{path}.station_id"),
                    &format!("Station {} is used by both sides", side.station_id),
                );
            }

            if config.team(side.team_id).is_none() {
                self.add_error(
                    &format!("{path}.team_id"),
                    &format!("Side references unknown team {}", side.team_id),
                );
            }
        }

        if let [first, second] = sides.as_slice()
            && first.default_team == second.default_team
        {
            self.add_error(
                "sides",
                &format!(
                    "Both sides default to {}; one must start CT and the other T",
                    first.default_team
                ),
            );
        }
    }

    fn validate_side_station(&mut self, config: &MatchConfig, side: &Side, path: &str) {
        match config.station(side.station_id) {
            None => self.add_error(
                &format!("{path}.station_id"),
                &format!("Side references unknown station {}", side.station_id),
            ),
            Some(station) if !station.active => self.add_warning(
                &format!("{path}.station_id"),
                &format!(
                    "Station {} is inactive; nobody will resolve to {}",
                    station.id, side.ordinal
                ),
            ),
            Some(_) => {}
        }
    }

    fn validate_durations(&mut self, config: &MatchConfig) {
        if config.min_participants == 0 {
            self.add_warning(
                "min_participants",
                "Minimum participants is 0; the match will never pause",
            );
        }

        if config.warmup.pre_knife_secs == 0 {
            self.add_warning(
                "warmup.pre_knife_secs",
                "Pre-knife warmup is 0 seconds; the knife round starts immediately",
            );
        }

        for (name, value) in config.timing.entries() {
            if !value.is_finite() || value < 0.0 {
                self.add_error(
                    &format!("timing.{name}"),
                    &format!("Delay must be a non-negative number of seconds, got {value}"),
                );
            } else if value > MAX_DELAY_SECS {
                self.add_error(
                    &format!("timing.{name}"),
                    &format!("Delay must be at most {MAX_DELAY_SECS} seconds, got {value}"),
                );
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
