//! Event scripts
//!
//! A script drives a session from a file or stdin. Each step is a JSON
//! object, one per line (blank lines and `#` comments are skipped), or an
//! item of a YAML list:
//!
//! ```text
//! {"event": "participant_connecting", "identity": 7, "address": "10.0.0.1:27005"}
//! {"command": "print_state"}
//! {"console": "!ct", "issuer": 7}
//! {"advance": "3s"}
//! {"rules_available": false}
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScriptError;
use crate::model::Identity;
use crate::phase::{Input, MatchEvent, OperatorCommand};

use super::console::parse_console;

/// One resolved script step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Feed an input to the engine.
    Input(Input),
    /// Move logical time forward, firing due callbacks.
    Advance(Duration),
    /// Toggle host rules availability.
    SetRulesAvailable(bool),
}

#[derive(Debug, Deserialize)]
struct ConsoleLine {
    console: String,
    #[serde(default)]
    issuer: Option<Identity>,
}

/// Parses a single script line. Returns `None` for blank and comment lines.
///
/// # Errors
///
/// Returns `ScriptError::Parse` carrying `line` when the line is not a
/// recognized step.
pub fn parse_line(text: &str, line: usize) -> Result<Option<ScriptStep>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text).map_err(|e| parse_error(line, &e))?;
    parse_value(value, line).map(Some)
}

/// Parses a whole script: JSON lines, or a YAML list of steps.
///
/// # Errors
///
/// Returns the first parse error.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let first = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'));

    match first {
        None => Ok(Vec::new()),
        Some(l) if l.starts_with('{') => text
            .lines()
            .enumerate()
            .filter_map(|(i, l)| parse_line(l, i + 1).transpose())
            .collect(),
        Some(_) => {
            let items: Vec<serde_yaml::Value> =
                serde_yaml::from_str(text).map_err(|e| ScriptError::Parse {
                    line: e.location().map_or(0, |l| l.line()),
                    message: e.to_string(),
                })?;
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    let value = serde_json::to_value(item).map_err(|e| parse_error(i + 1, &e))?;
                    parse_value(value, i + 1)
                })
                .collect()
        }
    }
}

fn parse_value(value: Value, line: usize) -> Result<ScriptStep, ScriptError> {
    let Some(object) = value.as_object() else {
        return Err(ScriptError::Parse {
            line,
            message: "expected an object".to_string(),
        });
    };

    if object.contains_key("event") {
        let event: MatchEvent = serde_json::from_value(value).map_err(|e| parse_error(line, &e))?;
        Ok(ScriptStep::Input(Input::Event(event)))
    } else if object.contains_key("command") {
        let command: OperatorCommand =
            serde_json::from_value(value).map_err(|e| parse_error(line, &e))?;
        Ok(ScriptStep::Input(Input::Command(command)))
    } else if object.contains_key("console") {
        let console: ConsoleLine = serde_json::from_value(value).map_err(|e| parse_error(line, &e))?;
        let command = parse_console(&console.console, console.issuer).map_err(|e| {
            ScriptError::Parse {
                line,
                message: e.to_string(),
            }
        })?;
        Ok(ScriptStep::Input(Input::Command(command)))
    } else if let Some(advance) = object.get("advance") {
        let text = advance.as_str().ok_or_else(|| ScriptError::Parse {
            line,
            message: "'advance' must be a duration string such as \"3s\"".to_string(),
        })?;
        let duration = humantime::parse_duration(text)
            .map_err(|_| ScriptError::InvalidDuration(text.to_string()))?;
        Ok(ScriptStep::Advance(duration))
    } else if let Some(available) = object.get("rules_available") {
        available
            .as_bool()
            .map(ScriptStep::SetRulesAvailable)
            .ok_or_else(|| ScriptError::Parse {
                line,
                message: "'rules_available' must be a boolean".to_string(),
            })
    } else {
        Err(ScriptError::Parse {
            line,
            message: "expected one of 'event', 'command', 'console', 'advance', 'rules_available'"
                .to_string(),
        })
    }
}

fn parse_error(line: usize, error: &impl std::fmt::Display) -> ScriptError {
    ScriptError::Parse {
        line,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SideOrdinal, TeamLabel};

    #[test]
    fn parses_each_step_kind() {
        let script = r#"
# knife flow
{"event": "round_ended", "winner": 1}
{"command": "print_state"}

{"console": "!t", "issuer": 5}
{"advance": "3s 500ms"}
{"rules_available": false}
"#;
        let steps = parse_script(script).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Input(Input::Event(MatchEvent::RoundEnded {
                    winner: SideOrdinal::One
                })),
                ScriptStep::Input(Input::Command(OperatorCommand::PrintState)),
                ScriptStep::Input(Input::Command(OperatorCommand::ChooseSide {
                    issuer: Identity(5),
                    side: TeamLabel::T
                })),
                ScriptStep::Advance(Duration::from_millis(3500)),
                ScriptStep::SetRulesAvailable(false),
            ]
        );
    }

    #[test]
    fn parses_yaml_list() {
        let script = r"
- event: participant_connecting
  identity: 1
  address: 10.0.0.1:27005
- advance: 1s
- console: end_round ct
";
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1], ScriptStep::Advance(Duration::from_secs(1)));
        assert_eq!(
            steps[2],
            ScriptStep::Input(Input::Command(OperatorCommand::EndKnifeRound {
                winner: TeamLabel::Ct
            }))
        );
    }

    #[test]
    fn error_carries_line_number() {
        let script = "{\"command\": \"print_state\"}\n{\"event\": \"round_ended\", \"winner\": 3}\n";
        match parse_script(script).unwrap_err() {
            ScriptError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_shape_rejected() {
        assert!(matches!(
            parse_line(r#"{"wat": 1}"#, 4),
            Err(ScriptError::Parse { line: 4, .. })
        ));
        assert!(parse_line("[1, 2]", 1).is_err());
        assert!(parse_line("{not json", 1).is_err());
    }

    #[test]
    fn bad_duration_rejected() {
        assert!(matches!(
            parse_line(r#"{"advance": "soon"}"#, 1),
            Err(ScriptError::InvalidDuration(_))
        ));
    }

    #[test]
    fn console_errors_become_parse_errors() {
        let err = parse_line(r#"{"console": "prnt_state"}"#, 9).unwrap_err();
        assert!(err.to_string().contains("line 9"), "{err}");
        assert!(err.to_string().contains("print_state"), "{err}");
    }

    #[test]
    fn blank_and_comment_lines_skipped() {
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("# note", 2).unwrap(), None);
        assert!(parse_script("").unwrap().is_empty());
    }
}
