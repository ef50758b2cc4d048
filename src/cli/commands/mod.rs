//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod init;
pub mod replay;
pub mod run;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::MatchConfig;
use crate::config::loader::{ConfigLoader, LoaderOptions};
use crate::error::MatchWardenError;
use crate::observability::events::EventEmitter;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), MatchWardenError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cancel).await,
        Commands::Replay(args) => replay::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Init(args) => init::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads a configuration for a session, logging any warnings.
fn load_config(path: &Path) -> Result<Arc<MatchConfig>, MatchWardenError> {
    tracing::info!(config = %path.display(), "loading configuration");
    let result = ConfigLoader::new(LoaderOptions::default()).load(path)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result.config)
}

/// Event stream destination: a file when given, otherwise discarded.
fn event_emitter(path: Option<&Path>) -> Result<EventEmitter, MatchWardenError> {
    match path {
        Some(path) => Ok(EventEmitter::from_file(path)?),
        None => Ok(EventEmitter::noop()),
    }
}
