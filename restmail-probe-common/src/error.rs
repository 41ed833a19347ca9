//! Errors raised while assembling the probe configuration.
//!
//! These are the only fatal errors in a probe run. Anything that goes wrong
//! while talking to the service under test is recorded as a failed verdict
//! instead.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid RON for [`crate::ProbeConfig`].
    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// `RESTMAIL_PROBE_CONFIG` names a file that does not exist.
    #[error("RESTMAIL_PROBE_CONFIG points to non-existent file: {}", .0.display())]
    MissingFile(PathBuf),

    /// The mode string is not one of the known deployment modes.
    #[error("Unknown mode '{0}' (expected one of: local, docker, kubernetes)")]
    UnknownMode(String),

    /// Port zero cannot be connected to.
    #[error("Invalid {service} port: {port}")]
    InvalidPort { service: &'static str, port: u16 },

    /// A zero timeout would never let an exchange complete.
    #[error("The {service} timeout must be greater than zero")]
    ZeroTimeout { service: &'static str },

    /// The host is empty.
    #[error("No host configured")]
    EmptyHost,
}
