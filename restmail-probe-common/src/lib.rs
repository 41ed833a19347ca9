//! Shared configuration and logging for the restmail probe.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Endpoint, LineEnding, Mode, ProbeConfig, Recipients, Timeouts};
pub use error::ConfigError;
pub use tracing;
