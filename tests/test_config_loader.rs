//! Configuration loading against the fixture files.

mod common;

use std::path::Path;

use common::fixture_path;

use matchwarden::config::{ConfigLoader, LoaderOptions, MatchConfig};
use matchwarden::config::loader::write_default;
use matchwarden::error::{ConfigError, ExitCode, MatchWardenError};
use matchwarden::model::SideOrdinal;

#[test]
fn fixture_loads_with_team_names() {
    let result = ConfigLoader::with_defaults()
        .load(&fixture_path("match.yaml"))
        .unwrap();
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);

    let config = result.config;
    assert_eq!(config.min_participants, 2);
    assert_eq!(config.side_name(SideOrdinal::One), "Alpha");
    assert_eq!(config.side_name(SideOrdinal::Two), "Bravo");
    assert!(!config.stations[2].active);
    assert_eq!(
        config.tournament.as_ref().map(|t| t.name.as_str()),
        Some("Kings Cup")
    );
    // untouched sections fall back to defaults
    assert!((config.timing.knife_result_delay_secs - 3.0).abs() < f64::EPSILON);
    assert_eq!(config.messages.prefix, "[KINGS]");
}

#[test]
fn bad_sides_reports_every_issue() {
    let err = ConfigLoader::with_defaults()
        .load(&fixture_path("bad_sides.yaml"))
        .unwrap_err();

    let ConfigError::ValidationError { errors, .. } = &err else {
        panic!("expected validation error, got {err}");
    };
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    for expected in [
        "teams[1].id",
        "teams[1].name",
        "stations[0].addresses",
        "sides[1].ordinal",
        "sides[1].station_id",
        "sides[1].team_id",
        "timing.restart_delay_secs",
    ] {
        assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
    }
    assert!(
        errors.iter().any(|e| e.message.contains("Both sides default to CT")),
        "errors: {errors:?}"
    );

    let err: MatchWardenError = err.into();
    assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
}

#[test]
fn comment_only_file_is_empty() {
    let err = ConfigLoader::with_defaults()
        .load(&fixture_path("empty.yaml"))
        .unwrap_err();
    assert!(
        matches!(&err, ConfigError::ParseError { message, .. } if message.contains("empty")),
        "got {err}"
    );
}

#[test]
fn missing_file() {
    let err = ConfigLoader::with_defaults()
        .load(Path::new("/definitely/not/here.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile { .. }));
}

#[test]
fn oversized_file_is_rejected() {
    let loader = ConfigLoader::new(LoaderOptions {
        max_config_size: 64,
        ..LoaderOptions::default()
    });
    let err = loader.load(&fixture_path("match.yaml")).unwrap_err();
    assert!(
        matches!(&err, ConfigError::InvalidValue { field, .. } if field == "file_size"),
        "got {err}"
    );
}

#[test]
fn written_default_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matchwarden.yaml");

    write_default(&path, false).unwrap();
    let loaded = ConfigLoader::with_defaults().load(&path).unwrap();
    assert_eq!(*loaded.config, MatchConfig::default());

    let err = write_default(&path, false).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists { .. }));
    write_default(&path, true).unwrap();
}

#[test]
fn strict_mode_rejects_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warn.yaml");
    let text = std::fs::read_to_string(fixture_path("match.yaml"))
        .unwrap()
        .replace("min_participants: 2", "min_participants: 0");
    std::fs::write(&path, text).unwrap();

    let lenient = ConfigLoader::with_defaults().load(&path).unwrap();
    assert_eq!(lenient.warnings.len(), 1);
    assert_eq!(lenient.warnings[0].location.as_deref(), Some("min_participants"));

    let strict = ConfigLoader::new(LoaderOptions {
        strict: true,
        ..LoaderOptions::default()
    });
    assert!(matches!(
        strict.load(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}
