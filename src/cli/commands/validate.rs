//! Configuration validation command.

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader::{ConfigLoader, LoaderOptions};
use crate::error::{ConfigError, MatchWardenError};

/// Validates every file, reports each result, and fails if any is invalid.
///
/// # Errors
///
/// Returns the first file's error after all files have been reported.
pub fn run(args: &ValidateArgs) -> Result<(), MatchWardenError> {
    let loader = ConfigLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let mut report = Vec::with_capacity(args.files.len());
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let file = path.display().to_string();

        match loader.load(path) {
            Ok(result) => {
                let warnings: Vec<String> = result
                    .warnings
                    .iter()
                    .map(|w| match &w.location {
                        Some(location) => format!("{} at {location}", w.message),
                        None => w.message.clone(),
                    })
                    .collect();
                if args.format == OutputFormat::Human {
                    println!("ok    {file}");
                    for warning in &warnings {
                        println!("      warning: {warning}");
                    }
                }
                report.push(json!({"file": file, "valid": true, "errors": [], "warnings": warnings}));
            }
            Err(error) => {
                let errors: Vec<String> = match &error {
                    ConfigError::ValidationError { errors, .. } => {
                        errors.iter().map(ToString::to_string).collect()
                    }
                    other => vec![other.to_string()],
                };
                if args.format == OutputFormat::Human {
                    println!("FAIL  {file}");
                    for line in &errors {
                        println!("      {line}");
                    }
                }
                report.push(json!({"file": file, "valid": false, "errors": errors, "warnings": []}));
                first_error.get_or_insert(error);
            }
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    first_error.map_or(Ok(()), |error| Err(error.into()))
}
