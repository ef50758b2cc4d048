//! Real-time session driven by stdin.
//!
//! Script lines are read from stdin as they arrive; the logical clock
//! follows wall time on every tick so scheduled callbacks fire on time.
//! Intents are written to stdout, one JSON object per line.

use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::cli::args::RunArgs;
use crate::error::MatchWardenError;
use crate::host::{Session, SimulatedHost, parse_line};
use crate::observability::events::StopReason;
use crate::phase::MatchEngine;

use super::{event_emitter, load_config};

/// Runs a session until stdin closes or the token is cancelled.
///
/// Malformed lines are logged and skipped; a live session is not stopped
/// by a typo.
///
/// # Errors
///
/// Returns an error if the configuration fails to load, the events file or
/// metrics endpoint cannot be opened, or stdin cannot be read.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), MatchWardenError> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let config = load_config(&args.config)?;
    let emitter = event_emitter(args.events_file.as_deref())?;
    let host = SimulatedHost::new(std::io::stdout());
    let mut session = Session::new(MatchEngine::new(config), host, emitter);
    session.start(&args.config.display().to_string(), "stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(args.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let started = Instant::now();
    let mut line_no = 0;

    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => break StopReason::Interrupted,
            _ = ticker.tick() => catch_up(&mut session, started),
            line = lines.next_line() => {
                let Some(text) = line? else {
                    break StopReason::EndOfInput;
                };
                line_no += 1;
                catch_up(&mut session, started);
                match parse_line(&text, line_no) {
                    Ok(Some(step)) => session.apply(step),
                    Ok(None) => {}
                    Err(error) => tracing::warn!(%error, "skipping script line"),
                }
            }
        }
    };

    session.stop(reason);
    Ok(())
}

/// Moves the logical clock up to the wall-clock time since start.
fn catch_up<W: std::io::Write>(session: &mut Session<SimulatedHost<W>>, started: Instant) {
    let elapsed = started.elapsed();
    let now = session.scheduler().now();
    if elapsed > now {
        session.advance(elapsed - now);
    }
}
