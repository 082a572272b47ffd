//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod apply;
pub mod completions;
pub mod inspect;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::ClassTabError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), ClassTabError> {
    match cli.command {
        Commands::Apply(args) => apply::run(&args),
        Commands::Inspect(args) => inspect::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}
