//! cachepool CLI Library
//!
//! Commands for inspecting and normalizing cache resource configuration
//! files. Used by the `cachepool` binary and by the integration tests.

pub mod commands;
pub mod error;
pub mod logging;

pub use commands::*;
pub use error::CliErrorHandler;
pub use logging::{build_subscriber, init_tracing};
