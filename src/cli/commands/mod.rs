//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod codes;
pub mod select;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::RokuDeployError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), RokuDeployError> {
    match cli.command {
        Commands::Validate(args) => validate::run(&args),
        Commands::Select(args) => select::run(&args).await,
        Commands::Codes(args) => codes::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
