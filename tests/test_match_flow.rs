//! End-to-end match flows through the engine and an in-memory session.

mod common;

use common::{
    RULES, config_with_threshold, event, fixture_config, fixture_path, join, kinds, session,
    written_intents,
};

use matchwarden::host::parse_script;
use matchwarden::model::{Identity, SideOrdinal, Team, TeamLabel};
use matchwarden::participant::resolve_side;
use matchwarden::phase::{Input, Intent, MatchEngine, MatchEvent, MatchPhase, OperatorCommand};

const CABIN_A: &str = "10.0.0.1:27005";
const CABIN_B: &str = "10.0.0.2:27005";

fn to_knife_round(engine: &mut MatchEngine) {
    join(engine, 1, CABIN_A);
    join(engine, 2, CABIN_B);
    event(engine, MatchEvent::WarmupEnded);
    assert_eq!(engine.phase(), MatchPhase::KnifeRound);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn station_address_resolves_to_its_side() {
    let config = fixture_config();

    let side = resolve_side(CABIN_A, &config).side().expect("cabin A is a side");
    assert_eq!(side.ordinal, SideOrdinal::One);
    assert_eq!(side.default_team, TeamLabel::Ct);

    let mut engine = MatchEngine::new(config);
    let intents = join(&mut engine, 7, CABIN_A);
    assert_eq!(
        intents[0],
        Intent::AssignTeam {
            identity: Identity(7),
            team: Team::Ct,
        }
    );
}

#[test]
fn knife_round_end_records_winner() {
    let mut engine = MatchEngine::new(fixture_config());
    to_knife_round(&mut engine);

    event(
        &mut engine,
        MatchEvent::RoundEnded {
            winner: SideOrdinal::Two,
        },
    );

    assert_eq!(engine.phase(), MatchPhase::PostKnifeWarmup);
    assert_eq!(engine.state().knife_winner(), Some(SideOrdinal::Two));
}

#[test]
fn terrorist_winner_choosing_ct_swaps_and_goes_live() {
    let mut engine = MatchEngine::new(fixture_config());
    to_knife_round(&mut engine);
    event(
        &mut engine,
        MatchEvent::RoundEnded {
            winner: SideOrdinal::Two,
        },
    );

    let intents = engine.handle(
        &Input::Command(OperatorCommand::ChooseSide {
            issuer: Identity(2),
            side: TeamLabel::Ct,
        }),
        Some(&RULES),
    );

    assert_eq!(engine.phase(), MatchPhase::Live);
    assert!(intents.contains(&Intent::RestartMatch {
        swap_sides: true,
        delay_secs: 1.0,
    }));
    assert_eq!(engine.state().side_name(SideOrdinal::One), "Bravo");
    assert_eq!(engine.state().side_name(SideOrdinal::Two), "Alpha");
}

#[test]
fn short_handed_warmup_end_pauses_into_knife_round() {
    let mut engine = MatchEngine::new(config_with_threshold(10));
    join(&mut engine, 1, CABIN_A);
    join(&mut engine, 2, "10.0.0.11:27005");
    join(&mut engine, 3, CABIN_B);
    join(&mut engine, 4, CABIN_B);
    assert_eq!(engine.registry().active_count(), 4);

    let intents = event(&mut engine, MatchEvent::WarmupEnded);

    assert_eq!(intents, vec![Intent::PauseMatch]);
    assert_eq!(engine.phase(), MatchPhase::KnifeRound);
    assert!(engine.state().paused());
}

#[test]
fn knife_round_pause_still_pauses_short_handed_live_rounds() {
    let mut engine = MatchEngine::new(config_with_threshold(10));
    join(&mut engine, 1, CABIN_A);
    join(&mut engine, 2, "10.0.0.11:27005");
    join(&mut engine, 3, CABIN_B);
    join(&mut engine, 4, CABIN_B);
    assert_eq!(
        event(&mut engine, MatchEvent::WarmupEnded),
        vec![Intent::PauseMatch]
    );

    // the host was unpaused by hand and the knife round played out
    event(
        &mut engine,
        MatchEvent::RoundEnded {
            winner: SideOrdinal::Two,
        },
    );
    engine.handle(
        &Input::Command(OperatorCommand::ChooseSide {
            issuer: Identity(1),
            side: TeamLabel::Ct,
        }),
        Some(&RULES),
    );
    assert_eq!(engine.phase(), MatchPhase::PostKnifeWarmup);
    engine.handle(
        &Input::Command(OperatorCommand::ChooseSide {
            issuer: Identity(3),
            side: TeamLabel::Ct,
        }),
        Some(&RULES),
    );
    assert_eq!(engine.phase(), MatchPhase::Live);
    assert_eq!(engine.state().side_name(SideOrdinal::One), "Bravo");

    assert_eq!(
        event(&mut engine, MatchEvent::RoundStarted),
        vec![Intent::PauseMatch]
    );
    assert!(engine.state().paused());
}

#[test]
fn hibernation_resets_from_every_phase() {
    let drive: [fn(&mut MatchEngine); 4] = [
        |e| {
            join(e, 1, CABIN_A);
        },
        to_knife_round,
        |e| {
            to_knife_round(e);
            event(
                e,
                MatchEvent::RoundEnded {
                    winner: SideOrdinal::One,
                },
            );
        },
        |e| {
            to_knife_round(e);
            event(
                e,
                MatchEvent::RoundEnded {
                    winner: SideOrdinal::One,
                },
            );
            event(e, MatchEvent::WarmupEnded);
        },
    ];

    for setup in drive {
        let mut engine = MatchEngine::new(fixture_config());
        setup(&mut engine);
        assert_ne!(engine.phase(), MatchPhase::Idle);

        event(&mut engine, MatchEvent::HibernationChanged { hibernating: true });

        assert_eq!(engine.phase(), MatchPhase::Idle);
        assert_eq!(engine.state().knife_winner(), None);
        assert!(!engine.state().paused());
        assert_eq!(engine.state().side_name(SideOrdinal::One), "Alpha");
        assert_eq!(engine.state().side_name(SideOrdinal::Two), "Bravo");
        assert!(engine.registry().is_empty());
    }
}

// ============================================================================
// Session flows
// ============================================================================

#[test]
fn scripted_knife_flow_through_session() {
    let text = std::fs::read_to_string(fixture_path("knife_flow.ndjson")).unwrap();
    let steps = parse_script(&text).unwrap();

    let mut session = session(fixture_config());
    for step in steps {
        session.apply(step);
    }

    assert_eq!(session.engine().phase(), MatchPhase::Live);
    assert_eq!(session.engine().state().knife_winner(), Some(SideOrdinal::Two));
    assert_eq!(session.scheduler().pending(), 0);

    let rules = session.host().mirrored_rules();
    assert!(rules.swap_sides_on_restart);
    assert!(rules.match_started);
    assert!(!rules.team_intro_period);
    assert_eq!(rules.restarts, 1);

    let output = written_intents(&session.into_host().into_writer());
    assert_eq!(
        kinds(&output),
        vec![
            // 101 joins cabin A
            "assign_team",
            "start_warmup",
            "message",
            "schedule_callback",
            // 202 joins cabin B
            "assign_team",
            "message",
            "schedule_callback",
            // 303 is nobody's
            "assign_team",
            // reminders
            "center_message",
            "center_message",
            // knife round
            "skip_team_intro",
            "strip_loadout",
            "strip_loadout",
            "broadcast",
            "suppress_broadcast",
            "center_alert",
            "schedule_callback",
            // post-knife warmup
            "start_warmup",
            "broadcast",
            "broadcast",
            // side choice
            "end_warmup",
            "set_side_display_name",
            "set_side_display_name",
            "restart_match",
            "console_output",
        ]
    );

    assert_eq!(output[0]["team"], "CT");
    assert_eq!(output[4]["team"], "T");
    assert_eq!(output[7]["team"], "Spectator");
    assert_eq!(output[17]["duration_secs"], 60);
    assert!(
        output[18]["text"].as_str().unwrap().contains("Bravo"),
        "side choice prompt should name the winner: {}",
        output[18]
    );
    assert_eq!(output[21]["name"], "Bravo");
    assert_eq!(output[22]["name"], "Alpha");
    assert_eq!(output[23]["swap_sides"], true);
}

#[test]
fn rules_outage_aborts_knife_start_until_restored() {
    let mut session = session(fixture_config());
    let script = r#"
{"event": "participant_connecting", "identity": 1, "address": "10.0.0.1:27005"}
{"event": "participant_connected", "identity": 1}
{"event": "participant_connecting", "identity": 2, "address": "10.0.0.2:27005"}
{"event": "participant_connected", "identity": 2}
{"event": "warmup_ended"}
{"rules_available": false}
{"event": "round_started"}
"#;
    for step in parse_script(script).unwrap() {
        session.apply(step);
    }
    assert_eq!(session.engine().phase(), MatchPhase::KnifeRound);
    let before = session.inputs();

    for step in parse_script("{\"rules_available\": true}\n{\"event\": \"round_started\"}").unwrap()
    {
        session.apply(step);
    }
    assert_eq!(session.inputs(), before + 1);

    let output = written_intents(&session.into_host().into_writer());
    let knife_starts = kinds(&output)
        .iter()
        .filter(|k| **k == "skip_team_intro")
        .count();
    assert_eq!(knife_starts, 1, "only the retried round start strips loadouts");
}

#[test]
fn drop_below_threshold_pauses_then_reconnect_resumes() {
    let mut session = session(fixture_config());
    let script = r#"
{"event": "participant_connecting", "identity": 1, "address": "10.0.0.1:27005", "slot": 1}
{"event": "participant_connected", "identity": 1}
{"event": "participant_connecting", "identity": 2, "address": "10.0.0.2:27005", "slot": 2}
{"event": "participant_connected", "identity": 2}
{"event": "warmup_ended"}
{"event": "participant_disconnected", "identity": 2}
{"event": "round_started"}
{"event": "participant_connecting", "identity": 2, "address": "10.0.0.2:27005", "slot": 5}
{"event": "participant_connected", "identity": 2}
{"advance": "5s"}
"#;
    for step in parse_script(script).unwrap() {
        session.apply(step);
    }

    let engine = session.engine();
    assert_eq!(engine.phase(), MatchPhase::KnifeRound);
    assert!(!engine.state().paused());
    let participant = engine.registry().get(Identity(2)).unwrap();
    assert_eq!(participant.slot, 5);
    assert_eq!(participant.side(), Some(SideOrdinal::Two));

    let output = written_intents(&session.into_host().into_writer());
    let kinds = kinds(&output);
    let pause = kinds.iter().position(|k| *k == "pause_match").unwrap();
    let unpause = kinds.iter().position(|k| *k == "unpause_match").unwrap();
    assert!(pause < unpause);
    assert_eq!(
        kinds.iter().filter(|k| **k == "assign_team").count(),
        2,
        "reconnect keeps the cached assignment"
    );
}

#[test]
fn operator_can_force_knife_result() {
    let mut engine = MatchEngine::new(fixture_config());
    to_knife_round(&mut engine);

    let intents = engine.handle(
        &Input::Command(OperatorCommand::EndKnifeRound {
            winner: TeamLabel::T,
        }),
        Some(&RULES),
    );
    assert_eq!(
        intents,
        vec![Intent::TerminateRound {
            delay_secs: 1.0,
            winner: TeamLabel::T,
        }]
    );
    assert_eq!(engine.phase(), MatchPhase::KnifeRound);

    // The host reports the round end it was asked to produce.
    event(
        &mut engine,
        MatchEvent::RoundEnded {
            winner: SideOrdinal::Two,
        },
    );
    assert_eq!(engine.phase(), MatchPhase::PostKnifeWarmup);
}

#[test]
fn map_end_after_live_starts_over() {
    let mut engine = MatchEngine::new(fixture_config());
    to_knife_round(&mut engine);
    event(
        &mut engine,
        MatchEvent::RoundEnded {
            winner: SideOrdinal::One,
        },
    );
    engine.handle(
        &Input::Command(OperatorCommand::ChooseSide {
            issuer: Identity(1),
            side: TeamLabel::Ct,
        }),
        Some(&RULES),
    );
    assert_eq!(engine.phase(), MatchPhase::Live);
    assert_eq!(engine.state().side_name(SideOrdinal::One), "Alpha");

    event(&mut engine, MatchEvent::MapEnded);
    assert_eq!(engine.phase(), MatchPhase::Idle);

    let intents = join(&mut engine, 1, CABIN_A);
    assert!(matches!(intents[1], Intent::StartWarmup { duration_secs: 420 }));
    assert_eq!(engine.phase(), MatchPhase::PreKnifeWarmup);
}
