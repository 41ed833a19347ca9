//! Exchange timeouts per endpoint.
//!
//! A single value per endpoint bounds both the connect and each read. The
//! delivery endpoint gets the longer default because a mail session goes
//! through several protocol turns before the final reply arrives.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Timeout for policy queries.
    ///
    /// Default: 5000 milliseconds
    #[serde(default = "defaults::policy_ms")]
    pub policy_ms: u64,

    /// Timeout for mail delivery sessions.
    ///
    /// Default: 10000 milliseconds
    #[serde(default = "defaults::delivery_ms")]
    pub delivery_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            policy_ms: defaults::policy_ms(),
            delivery_ms: defaults::delivery_ms(),
        }
    }
}

impl Timeouts {
    #[must_use]
    pub const fn policy(&self) -> Duration {
        Duration::from_millis(self.policy_ms)
    }

    #[must_use]
    pub const fn delivery(&self) -> Duration {
        Duration::from_millis(self.delivery_ms)
    }
}

mod defaults {
    pub const fn policy_ms() -> u64 {
        5_000
    }

    pub const fn delivery_ms() -> u64 {
        10_000
    }
}
