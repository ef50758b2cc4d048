//! Writes the default configuration template.

use crate::cli::args::InitArgs;
use crate::config::loader::write_default;
use crate::error::MatchWardenError;

/// Writes the default configuration to `args.path`.
///
/// # Errors
///
/// Returns `AlreadyExists` unless `--force` is given, or a write failure.
pub fn run(args: &InitArgs) -> Result<(), MatchWardenError> {
    write_default(&args.path, args.force)?;
    tracing::info!(path = %args.path.display(), "wrote default configuration");
    println!("wrote {}", args.path.display());
    Ok(())
}
