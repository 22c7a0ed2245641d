//! Error-code catalog listing.

use serde_json::json;

use crate::cli::args::{CodesArgs, OutputFormat};
use crate::config::ErrorCode;
use crate::error::RokuDeployError;

/// Print every validation code with its message.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &CodesArgs) -> Result<(), RokuDeployError> {
    match args.format {
        OutputFormat::Human => {
            for code in ErrorCode::ALL {
                println!("{:>2}  {}", code.code(), code.message());
            }
        }
        OutputFormat::Json => {
            let catalog: Vec<_> = ErrorCode::ALL
                .iter()
                .map(|code| json!({ "code": code, "message": code.message() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }
    Ok(())
}
