//! Application module
//!
//! Configuration, logging setup and fatal error handling for the binary.

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::DashboardConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
