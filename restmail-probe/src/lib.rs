//! Scenario runner for the restmail probe.
//!
//! A run is four independent scenarios, two against the policy endpoint and
//! two against the mail delivery endpoint. Each one builds a literal payload,
//! performs a single exchange, and is judged by whether the response contains
//! an expected substring. Failures of any kind become failed [`Verdict`]s;
//! nothing aborts the run.

pub mod console;
pub mod report;
pub mod runner;
pub mod scenario;

pub use report::Report;
pub use runner::Runner;
pub use scenario::{Outcome, Scenario, Target, Verdict, evaluate};
