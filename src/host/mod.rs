//! Host adapter
//!
//! The engine never touches the game server directly. A [`Host`] supplies
//! the rules snapshot and executes intents; a [`Session`] wires a host to
//! the engine, the callback [`Scheduler`] and the event stream.

pub mod console;
pub mod scheduler;
pub mod script;
pub mod session;
pub mod simulated;

pub use console::parse_console;
pub use scheduler::Scheduler;
pub use script::{ScriptStep, parse_line, parse_script};
pub use session::Session;
pub use simulated::SimulatedHost;

use crate::error::HostError;
use crate::phase::{Intent, RulesSnapshot};

/// A game server as seen by the engine.
pub trait Host {
    /// Current game rules, or `None` when the host cannot provide them.
    fn rules(&self) -> Option<RulesSnapshot>;

    /// Executes an intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent could not be delivered. Sessions log
    /// the failure and keep going.
    fn execute(&mut self, intent: &Intent) -> Result<(), HostError>;
}
