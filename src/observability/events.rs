//! Structured session event stream.
//!
//! Typed events emitted while a session runs, serialized as JSONL with a
//! monotonically increasing sequence number. Distinct from the intent
//! stream: events describe what the session did, intents what the host
//! should do.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::{Intent, MatchPhase};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a session, tagged with `"type"`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A session started.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Random session id.
        session_id: String,
        /// Configuration file in use.
        config: String,
        /// Script source (`"stdin"` or a path).
        source: String,
    },

    /// The match phase changed.
    PhaseChanged {
        /// When the transition occurred.
        timestamp: DateTime<Utc>,
        /// Previous phase.
        from: MatchPhase,
        /// New phase.
        to: MatchPhase,
        /// Kind of input that caused it.
        trigger: String,
    },

    /// The engine issued an intent.
    IntentIssued {
        /// When the intent was issued.
        timestamp: DateTime<Utc>,
        /// The intent.
        intent: Intent,
    },

    /// Match state and registry were cleared.
    StateReset {
        /// When the reset happened.
        timestamp: DateTime<Utc>,
        /// Kind of input that caused it.
        trigger: String,
        /// Phase before the reset.
        from: MatchPhase,
    },

    /// The session stopped.
    SessionStopped {
        /// When the session stopped.
        timestamp: DateTime<Utc>,
        /// Why it stopped.
        reason: StopReason,
        /// Inputs handled during the session.
        inputs: u64,
        /// Final phase.
        phase: MatchPhase,
    },
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The script ran out of lines.
    EndOfInput,
    /// Interrupted by a signal.
    Interrupted,
    /// A fatal error.
    Error,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are silently dropped: observability must
/// never stop a match.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope { sequence, event };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}
