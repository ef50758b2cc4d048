//! Participants
//!
//! - [`ParticipantRegistry`] tracks connection lifecycle by identity
//! - [`resolve_side`] maps an address to a configured side

pub mod registry;
pub mod resolver;

pub use registry::{ConnectOutcome, ConnectionState, Participant, ParticipantRegistry};
pub use resolver::{SideResolution, resolve_side};
