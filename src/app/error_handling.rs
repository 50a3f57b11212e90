//! Error handling utilities

use crate::error::Error;
use tracing::error;

const GENERAL_ERROR: i32 = 1;
const CONFIG_ERROR: i32 = 2;
const UPSTREAM_ERROR: i32 = 3;

/// Exit code for an error reaching the binary edge.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>() {
        Some(Error::Config(_) | Error::Toml(_) | Error::Url(_)) => CONFIG_ERROR,
        Some(Error::Api(_)) => UPSTREAM_ERROR,
        _ => GENERAL_ERROR,
    }
}

/// Handle fatal errors and exit with appropriate status code
///
/// In verbose mode the full error chain is printed.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    eprintln!("Error: {error}");
    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}
