//! Deterministic logical-time replay of a script file.

use crate::cli::args::ReplayArgs;
use crate::error::MatchWardenError;
use crate::host::{Session, SimulatedHost, parse_script};
use crate::observability::events::StopReason;
use crate::phase::MatchEngine;

use super::{event_emitter, load_config};

/// Replays `args.script` against a simulated host writing to stdout.
///
/// # Errors
///
/// Returns an error if the configuration or script cannot be loaded.
/// Unlike `run`, a malformed line fails the whole replay before any step
/// is applied.
pub fn run(args: &ReplayArgs) -> Result<(), MatchWardenError> {
    let config = load_config(&args.config)?;
    let text = std::fs::read_to_string(&args.script)?;
    let steps = parse_script(&text)?;
    tracing::info!(script = %args.script.display(), steps = steps.len(), "replaying script");

    let emitter = event_emitter(args.events_file.as_deref())?;
    let host = SimulatedHost::new(std::io::stdout().lock());
    let mut session = Session::new(MatchEngine::new(config), host, emitter);
    session.start(
        &args.config.display().to_string(),
        &args.script.display().to_string(),
    );

    for step in steps {
        session.apply(step);
    }
    if args.drain {
        let fired = session.drain();
        tracing::debug!(fired, "drained pending callbacks");
    }

    session.stop(StopReason::EndOfInput);
    Ok(())
}
