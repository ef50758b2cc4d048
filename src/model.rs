//! Shared vocabulary types
//!
//! Identities, side ordinals and team labels are used by the configuration,
//! the participant registry and the match engine alike.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable participant identity (platform account id).
///
/// This is the reconnection key: local slots churn across reconnects, the
/// identity does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub u64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two live-match sides.
///
/// Serialized as the bare number `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SideOrdinal {
    /// Side 1
    One,
    /// Side 2
    Two,
}

impl SideOrdinal {
    /// Both ordinals in order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Returns the numeric ordinal.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Returns the other side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based index, for two-element arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl TryFrom<u8> for SideOrdinal {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("side ordinal must be 1 or 2, got {other}")),
        }
    }
}

impl From<SideOrdinal> for u8 {
    fn from(value: SideOrdinal) -> Self {
        value.number()
    }
}

impl fmt::Display for SideOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side {}", self.number())
    }
}

/// A playable team label, as used for default sides and side choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamLabel {
    /// Counter-terrorists
    #[serde(rename = "CT", alias = "ct")]
    Ct,
    /// Terrorists
    #[serde(rename = "T", alias = "t")]
    T,
}

impl TeamLabel {
    /// Parses `ct`/`t` case-insensitively, with an optional leading `!`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let word = input.strip_prefix('!').unwrap_or(input);
        if word.eq_ignore_ascii_case("ct") {
            Some(Self::Ct)
        } else if word.eq_ignore_ascii_case("t") {
            Some(Self::T)
        } else {
            None
        }
    }

    /// Returns the opposite label.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Ct => Self::T,
            Self::T => Self::Ct,
        }
    }
}

impl fmt::Display for TeamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ct => "CT",
            Self::T => "T",
        })
    }
}

/// The in-game team a host should place a participant on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Counter-terrorists
    #[serde(rename = "CT")]
    Ct,
    /// Terrorists
    #[serde(rename = "T")]
    T,
    /// Spectators (unauthorized viewers)
    #[serde(rename = "Spectator")]
    Spectator,
}

impl From<TeamLabel> for Team {
    fn from(label: TeamLabel) -> Self {
        match label {
            TeamLabel::Ct => Self::Ct,
            TeamLabel::T => Self::T,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ct => "CT",
            Self::T => "T",
            Self::Spectator => "Spectator",
        })
    }
}

/// A participant's resolved assignment, cached once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedTeam {
    /// Member of one of the two live-match sides
    Side(SideOrdinal),
    /// Not a recognized match participant
    Spectator,
}

impl AssignedTeam {
    /// Returns the side ordinal, if this is a side assignment.
    #[must_use]
    pub const fn side(self) -> Option<SideOrdinal> {
        match self {
            Self::Side(ordinal) => Some(ordinal),
            Self::Spectator => None,
        }
    }
}

impl fmt::Display for AssignedTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Side(ordinal) => write!(f, "{ordinal}"),
            Self::Spectator => f.write_str("spectator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_ordinal_from_number() {
        assert_eq!(SideOrdinal::try_from(1).unwrap(), SideOrdinal::One);
        assert_eq!(SideOrdinal::try_from(2).unwrap(), SideOrdinal::Two);
        assert!(SideOrdinal::try_from(0).is_err());
        assert!(SideOrdinal::try_from(3).is_err());
    }

    #[test]
    fn side_ordinal_serde_is_numeric() {
        let json = serde_json::to_string(&SideOrdinal::Two).unwrap();
        assert_eq!(json, "2");
        let parsed: SideOrdinal = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, SideOrdinal::One);
        assert!(serde_json::from_str::<SideOrdinal>("7").is_err());
    }

    #[test]
    fn side_ordinal_other() {
        assert_eq!(SideOrdinal::One.other(), SideOrdinal::Two);
        assert_eq!(SideOrdinal::Two.other(), SideOrdinal::One);
    }

    #[test]
    fn team_label_parse() {
        assert_eq!(TeamLabel::parse("ct"), Some(TeamLabel::Ct));
        assert_eq!(TeamLabel::parse("!CT"), Some(TeamLabel::Ct));
        assert_eq!(TeamLabel::parse("T"), Some(TeamLabel::T));
        assert_eq!(TeamLabel::parse("!t"), Some(TeamLabel::T));
        assert_eq!(TeamLabel::parse("spec"), None);
        assert_eq!(TeamLabel::parse(""), None);
    }

    #[test]
    fn team_label_serde_accepts_both_cases() {
        let upper: TeamLabel = serde_yaml::from_str("CT").unwrap();
        let lower: TeamLabel = serde_yaml::from_str("t").unwrap();
        assert_eq!(upper, TeamLabel::Ct);
        assert_eq!(lower, TeamLabel::T);
        assert_eq!(serde_json::to_string(&TeamLabel::T).unwrap(), "\"T\"");
    }

    #[test]
    fn team_from_label() {
        assert_eq!(Team::from(TeamLabel::Ct), Team::Ct);
        assert_eq!(Team::from(TeamLabel::T), Team::T);
    }

    #[test]
    fn assigned_team_side() {
        assert_eq!(
            AssignedTeam::Side(SideOrdinal::Two).side(),
            Some(SideOrdinal::Two)
        );
        assert_eq!(AssignedTeam::Spectator.side(), None);
        assert_eq!(AssignedTeam::Spectator.to_string(), "spectator");
        assert_eq!(AssignedTeam::Side(SideOrdinal::One).to_string(), "side 1");
    }
}
