//! Connection-level failures of an exchange.

use std::{io, time::Duration};

use thiserror::Error;

/// Everything that can stop an exchange from producing a reply.
///
/// Each variant is a connection failure from the caller's point of view; the
/// split only exists so the diagnostic says which step broke.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Name resolution failed.
    #[error("Failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Name resolution succeeded but produced no addresses.
    #[error("No addresses found for {0}")]
    NoAddress(String),

    /// Every resolved address refused or was unreachable. Carries the last
    /// error seen.
    #[error("Could not connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: io::Error,
    },

    /// The connect phase did not finish within the endpoint timeout.
    #[error("Timed out connecting to {target} after {:.1}s", .timeout.as_secs_f64())]
    ConnectTimeout { target: String, timeout: Duration },

    /// The payload could not be written completely.
    #[error("Failed to send payload to {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Reading failed for a reason other than the quiescence timeout.
    #[error("Failed reading from {target}: {source}")]
    Read {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// Specialized `Result` type for exchanges.
pub type Result<T> = std::result::Result<T, ExchangeError>;
