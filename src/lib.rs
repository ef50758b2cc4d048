//! `matchwarden` - knife-round match phase orchestrator
//!
//! Drives a competitive match through pre-knife warmup, the knife round,
//! the winner's side choice and the live match. Host servers feed events
//! in and execute the intents that come back out.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod observability;
pub mod participant;
pub mod phase;
