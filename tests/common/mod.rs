//! Shared integration-test helpers: fixture paths, in-process sessions and
//! a `matchwarden` child process driven over stdio.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

use matchwarden::config::{ConfigLoader, MatchConfig};
use matchwarden::host::{Session, SimulatedHost};
use matchwarden::model::Identity;
use matchwarden::observability::EventEmitter;
use matchwarden::phase::{Input, Intent, MatchEngine, MatchEvent, RulesSnapshot};

/// Default timeout for reading one intent from a child process.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Rules snapshot of a host in the middle of a warmup.
pub const RULES: RulesSnapshot = RulesSnapshot {
    warmup_period: true,
    paused: false,
    team_intro_period: true,
    swap_sides_on_restart: false,
    match_started: false,
    restarts: 0,
};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads `tests/fixtures/match.yaml`.
pub fn fixture_config() -> Arc<MatchConfig> {
    ConfigLoader::with_defaults()
        .load(&fixture_path("match.yaml"))
        .expect("fixture config should load")
        .config
}

/// Fixture configuration with a different participant threshold.
pub fn config_with_threshold(min_participants: usize) -> Arc<MatchConfig> {
    let mut config = (*fixture_config()).clone();
    config.min_participants = min_participants;
    Arc::new(config)
}

/// Connecting plus connected events for one participant.
pub fn join(engine: &mut MatchEngine, identity: u64, address: &str) -> Vec<Intent> {
    engine.handle(
        &Input::Event(MatchEvent::ParticipantConnecting {
            identity: Identity(identity),
            address: address.to_string(),
            slot: 0,
        }),
        Some(&RULES),
    );
    engine.handle(
        &Input::Event(MatchEvent::ParticipantConnected {
            identity: Identity(identity),
        }),
        Some(&RULES),
    )
}

/// Feeds a host event with rules available.
pub fn event(engine: &mut MatchEngine, event: MatchEvent) -> Vec<Intent> {
    engine.handle(&Input::Event(event), Some(&RULES))
}

/// An in-memory session over the fixture configuration.
pub fn session(config: Arc<MatchConfig>) -> Session<SimulatedHost<Vec<u8>>> {
    Session::new(
        MatchEngine::new(config),
        SimulatedHost::new(Vec::new()),
        EventEmitter::noop(),
    )
}

/// Parses every JSON line a simulated host wrote.
pub fn written_intents(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad intent line {l}: {e}")))
        .collect()
}

/// The `intent` tag of each value.
pub fn kinds(intents: &[Value]) -> Vec<&str> {
    intents
        .iter()
        .filter_map(|v| v.get("intent").and_then(Value::as_str))
        .collect()
}

/// A running `matchwarden run` process.
///
/// The child process is killed on drop via `kill_on_drop(true)`.
pub struct MatchWardenProcess {
    child: Child,
    stdin: Option<tokio::process::ChildStdin>,
    reader: BufReader<tokio::process::ChildStdout>,
}

impl MatchWardenProcess {
    /// Spawns `matchwarden run` against the given configuration fixture.
    pub fn spawn(config: &str) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_matchwarden"))
            .args([
                "--quiet",
                "run",
                "--config",
                fixture_path(config).to_str().expect("non-UTF-8 fixture path"),
                "--tick",
                "20ms",
            ])
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn matchwarden");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin: Some(stdin),
            reader: BufReader::new(stdout),
        }
    }

    /// Writes one script line.
    pub async fn send(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("failed to write to stdin");
        stdin.flush().await.expect("failed to flush stdin");
    }

    /// Reads the next intent line.
    pub async fn read_intent(&mut self, timeout: Duration) -> Value {
        let mut line = String::new();
        let result = tokio::time::timeout(timeout, async {
            loop {
                line.clear();
                let n = self
                    .reader
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                assert!(n > 0, "unexpected EOF from matchwarden");
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return serde_json::from_str::<Value>(trimmed)
                        .unwrap_or_else(|e| panic!("invalid JSON: {e}\nline: {line}"));
                }
            }
        })
        .await;
        result.expect("timed out waiting for an intent")
    }

    /// Reads intents until one with the given tag arrives.
    pub async fn read_until(&mut self, kind: &str) -> Value {
        loop {
            let intent = self.read_intent(DEFAULT_TIMEOUT).await;
            if intent["intent"] == kind {
                return intent;
            }
        }
    }

    /// Closes stdin and waits for the process to exit.
    pub async fn finish(mut self) -> std::process::ExitStatus {
        drop(self.stdin.take());
        tokio::time::timeout(DEFAULT_TIMEOUT, self.child.wait())
            .await
            .expect("matchwarden did not exit after EOF")
            .expect("wait failed")
    }
}

/// Runs the binary to completion with the given arguments.
pub fn run_command(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_matchwarden"))
        .args(args)
        .output()
        .expect("failed to run matchwarden")
}
