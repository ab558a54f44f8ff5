//! Cadence Core - Shared functionality for the cadence phase timer
//!
//! Configuration, standard paths and display formatting. The phase state
//! machine itself lives in the `cadence` crate.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, ConfigError};
pub use paths::Paths;
