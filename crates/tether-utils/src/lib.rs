//! # Tether Utilities
//!
//! Shared utilities for the tether debugging stub.
//!
//! This crate provides the logging bootstrap used by stub binaries, built on
//! `tracing`. Logs go to standard error (or a file), never to standard output,
//! so they cannot interleave with a protocol session running over stdio.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_to_file, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
