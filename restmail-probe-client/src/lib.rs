//! Wire-level side of the restmail probe.
//!
//! - [`exchange`]: one connect, write, drain, close cycle against an endpoint
//! - [`payload`]: literal policy requests and mail session transcripts
//! - [`clock`]: the time and identifier sources payloads are stamped with

pub mod clock;
pub mod error;
pub mod exchange;
pub mod payload;

pub use clock::{Clock, FixedClock, IdSource, SequentialIds, SystemClock, UlidIds};
pub use error::ExchangeError;
pub use exchange::{Completion, Reply, exchange};
pub use payload::{MailSession, PolicyRequest};
