//! Operator console parsing
//!
//! Turns a console or chat line into an [`OperatorCommand`]. Lines are
//! split shell-style so quoted arguments survive.

use crate::error::ScriptError;
use crate::model::{Identity, TeamLabel};
use crate::phase::OperatorCommand;

/// Every recognized command word.
pub const COMMANDS: [&str; 8] = [
    "!ct",
    "!t",
    "ct",
    "t",
    "print_state",
    "print_gr",
    "print_rules",
    "end_round",
];

/// Parses a console line.
///
/// `issuer` is required for side choice (`!ct`, `!t`).
///
/// # Errors
///
/// Returns `UnknownCommand` (with a suggestion when one is close) or
/// `MissingArgument`.
pub fn parse_console(line: &str, issuer: Option<Identity>) -> Result<OperatorCommand, ScriptError> {
    let words = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(str::to_owned).collect());
    let Some((command, args)) = words.split_first() else {
        return Err(ScriptError::MissingArgument {
            command: String::new(),
            argument: "a command word".to_string(),
        });
    };
    let word = command.to_ascii_lowercase();

    match word.as_str() {
        "!ct" | "ct" | "!t" | "t" => {
            let side = TeamLabel::parse(&word).ok_or_else(|| unknown(&word))?;
            let issuer = issuer.ok_or_else(|| ScriptError::MissingArgument {
                command: word.clone(),
                argument: "an issuer identity".to_string(),
            })?;
            Ok(OperatorCommand::ChooseSide { issuer, side })
        }
        "print_state" => Ok(OperatorCommand::PrintState),
        "print_gr" | "print_rules" => Ok(OperatorCommand::PrintRules),
        "end_round" => {
            let winner = args
                .first()
                .and_then(|arg| TeamLabel::parse(arg))
                .ok_or_else(|| ScriptError::MissingArgument {
                    command: word.clone(),
                    argument: "a winner of 'ct' or 't'".to_string(),
                })?;
            Ok(OperatorCommand::EndKnifeRound { winner })
        }
        _ => Err(unknown(&word)),
    }
}

fn unknown(word: &str) -> ScriptError {
    ScriptError::UnknownCommand {
        input: word.to_string(),
        suggestion: suggest_command(word),
    }
}

/// Closest command word, if its Damerau-Levenshtein distance is ≤ 3.
#[must_use]
pub fn suggest_command(input: &str) -> Option<String> {
    COMMANDS
        .iter()
        .map(|c| (*c, strsim::damerau_levenshtein(input, c)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_choice_needs_issuer() {
        assert_eq!(
            parse_console("!ct", Some(Identity(4))).unwrap(),
            OperatorCommand::ChooseSide {
                issuer: Identity(4),
                side: TeamLabel::Ct
            }
        );
        assert_eq!(
            parse_console("T", Some(Identity(4))).unwrap(),
            OperatorCommand::ChooseSide {
                issuer: Identity(4),
                side: TeamLabel::T
            }
        );
        assert!(matches!(
            parse_console("!t", None),
            Err(ScriptError::MissingArgument { .. })
        ));
    }

    #[test]
    fn print_commands() {
        assert_eq!(
            parse_console("print_state", None).unwrap(),
            OperatorCommand::PrintState
        );
        assert_eq!(
            parse_console("print_gr", None).unwrap(),
            OperatorCommand::PrintRules
        );
        assert_eq!(
            parse_console("  print_rules  ", None).unwrap(),
            OperatorCommand::PrintRules
        );
    }

    #[test]
    fn end_round_takes_winner() {
        assert_eq!(
            parse_console("end_round ct", None).unwrap(),
            OperatorCommand::EndKnifeRound {
                winner: TeamLabel::Ct
            }
        );
        assert_eq!(
            parse_console("end_round \"T\"", None).unwrap(),
            OperatorCommand::EndKnifeRound {
                winner: TeamLabel::T
            }
        );
        assert!(matches!(
            parse_console("end_round", None),
            Err(ScriptError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_console("end_round spec", None),
            Err(ScriptError::MissingArgument { .. })
        ));
    }

    #[test]
    fn unknown_command_suggests() {
        let err = parse_console("print_stat", None).unwrap_err();
        match &err {
            ScriptError::UnknownCommand { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("print_state"));
            }
            other => panic!("expected unknown command, got {other:?}"),
        }
        assert!(err.to_string().contains("did you mean 'print_state'"));
    }

    #[test]
    fn far_off_command_has_no_suggestion() {
        assert!(suggest_command("restart_everything_now").is_none());
    }

    #[test]
    fn empty_line_rejected() {
        assert!(parse_console("   ", None).is_err());
    }
}
