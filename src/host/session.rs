//! Session loop
//!
//! A `Session` owns the engine, a host, the callback scheduler and the
//! event emitter. Inputs and fired callbacks are handled to completion one
//! at a time on the caller's thread.

use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::observability::events::{Event, EventEmitter, StopReason};
use crate::observability::metrics;
use crate::phase::{Input, Intent, MatchEngine, MatchPhase};

use super::Host;
use super::scheduler::Scheduler;
use super::script::ScriptStep;
use super::simulated::SimulatedHost;

/// Engine, host and scheduler bound together.
#[derive(Debug)]
pub struct Session<H: Host> {
    engine: MatchEngine,
    host: H,
    scheduler: Scheduler,
    emitter: EventEmitter,
    inputs: u64,
}

impl<H: Host> Session<H> {
    /// Creates a session.
    #[must_use]
    pub fn new(engine: MatchEngine, host: H, emitter: EventEmitter) -> Self {
        metrics::set_current_phase(engine.phase());
        Self {
            engine,
            host,
            scheduler: Scheduler::new(),
            emitter,
            inputs: 0,
        }
    }

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of inputs handled, including fired callbacks.
    #[must_use]
    pub const fn inputs(&self) -> u64 {
        self.inputs
    }

    /// Consumes the session, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Emits the session start event and returns the session id.
    pub fn start(&self, config: &str, source: &str) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(%session_id, config, source, "session started");
        self.emitter.emit(Event::SessionStarted {
            timestamp: Utc::now(),
            session_id: session_id.clone(),
            config: config.to_string(),
            source: source.to_string(),
        });
        session_id
    }

    /// Emits the session stop event.
    pub fn stop(&self, reason: StopReason) {
        info!(?reason, inputs = self.inputs, phase = %self.engine.phase(), "session stopped");
        self.emitter.emit(Event::SessionStopped {
            timestamp: Utc::now(),
            reason,
            inputs: self.inputs,
            phase: self.engine.phase(),
        });
    }

    /// Hands one input to the engine and executes the resulting intents.
    ///
    /// Returns the intents issued.
    pub fn dispatch(&mut self, input: Input) -> Vec<Intent> {
        let before = self.engine.phase();
        let rules = self.host.rules();
        let kind = input.kind();

        self.inputs += 1;
        metrics::record_input(kind);

        let intents = self.engine.handle(&input, rules.as_ref());
        let after = self.engine.phase();

        if let Input::Event(event) = &input
            && event.is_reset()
        {
            self.emitter.emit(Event::StateReset {
                timestamp: Utc::now(),
                trigger: kind.to_string(),
                from: before,
            });
        }
        if before != after {
            self.phase_changed(before, after, kind);
        }

        for intent in &intents {
            self.issue(intent);
        }
        metrics::set_participants_active(self.engine.registry().active_count());
        intents
    }

    /// Advances logical time by `by`, firing every callback that comes due.
    /// The clock saturates at `Duration::MAX`.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now().checked_add(by).unwrap_or(Duration::MAX);
        let mut fired = 0;
        while let Some(callback) = self.scheduler.pop_due(until) {
            debug!(kind = callback.kind(), at = ?self.scheduler.now(), "callback fired");
            self.dispatch(Input::Timer(callback));
            fired += 1;
        }
        self.scheduler.advance_to(until);
        fired
    }

    /// Fires every pending callback regardless of its fire time.
    ///
    /// Returns the number of callbacks fired.
    pub fn drain(&mut self) -> usize {
        let mut fired = 0;
        while let Some(at) = self.scheduler.next_due() {
            let delay = at.saturating_sub(self.scheduler.now());
            fired += self.advance(delay);
        }
        fired
    }

    fn phase_changed(&self, from: MatchPhase, to: MatchPhase, trigger: &str) {
        metrics::record_phase_transition(from, to);
        self.emitter.emit(Event::PhaseChanged {
            timestamp: Utc::now(),
            from,
            to,
            trigger: trigger.to_string(),
        });
    }

    fn issue(&mut self, intent: &Intent) {
        let kind = intent.kind();
        metrics::record_intent(kind);
        self.emitter.emit(Event::IntentIssued {
            timestamp: Utc::now(),
            intent: intent.clone(),
        });

        if let Intent::ScheduleCallback {
            delay_secs,
            callback,
        } = intent
        {
            self.scheduler.schedule(*delay_secs, callback.clone());
        }

        if let Err(error) = self.host.execute(intent) {
            warn!(%error, intent = kind, "host failed to execute intent");
        }
    }
}

impl<W: Write> Session<SimulatedHost<W>> {
    /// Applies a script step.
    pub fn apply(&mut self, step: ScriptStep) {
        match step {
            ScriptStep::Input(input) => {
                self.dispatch(input);
            }
            ScriptStep::Advance(by) => {
                self.advance(by);
            }
            ScriptStep::SetRulesAvailable(available) => {
                debug!(available, "rules availability changed");
                self.host.set_rules_available(available);
            }
        }
    }
}
