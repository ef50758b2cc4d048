//! Match phase engine
//!
//! Drives a match through its lifecycle:
//! warmup, knife round, side choice, live play.
//!
//! # Architecture
//!
//! - [`MatchState`]: phase, knife winner, side display names, pause flag
//! - [`MatchEngine`]: `(phase, input)` dispatch producing [`Intent`]s
//! - [`MatchEvent`], [`OperatorCommand`], [`Callback`]: engine inputs
//! - [`RulesSnapshot`]: host game rules required by some transitions

pub mod engine;
pub mod event;
pub mod intent;
pub mod rules;
pub mod state;

pub use engine::MatchEngine;
pub use event::{Callback, Input, MatchEvent, OperatorCommand};
pub use intent::Intent;
pub use rules::RulesSnapshot;
pub use state::{MatchPhase, MatchState};
