//! Scenarios and their verdicts.

use std::fmt;

use restmail_probe_client::{ExchangeError, Reply};

/// How much of an unexpected response a diagnostic quotes.
pub const RESPONSE_PREFIX_CHARS: usize = 200;

/// Which endpoint of the service a scenario talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Policy,
    Delivery,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Policy => "policy service",
            Self::Delivery => "mail delivery service",
        })
    }
}

/// One request and the substring its response must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub target: Target,
    pub payload: Vec<u8>,
    pub expected: String,
    /// Label/value pairs shown before the scenario runs.
    pub details: Vec<(&'static str, String)>,
}

impl Scenario {
    /// Case-sensitive literal match anywhere in the response.
    #[must_use]
    pub fn accepts(&self, response: &str) -> bool {
        response.contains(&self.expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// The exchange completed but the response lacked the expected text.
    Mismatch,
    /// The exchange never produced a response.
    ConnectionFailure,
}

/// The recorded result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    name: String,
    outcome: Outcome,
    diagnostic: String,
}

impl Verdict {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    #[must_use]
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

/// Judges the result of running `scenario`.
///
/// Every call yields a verdict; a failed connection is a failed verdict, not
/// an error.
pub fn evaluate(
    scenario: &Scenario,
    result: &Result<Reply, ExchangeError>,
) -> Verdict {
    let (outcome, diagnostic) = match result {
        Err(err) => (
            Outcome::ConnectionFailure,
            format!("Could not connect to {}: {err}", scenario.target),
        ),
        Ok(reply) => {
            let response = reply.text();
            if scenario.accepts(&response) {
                (
                    Outcome::Passed,
                    format!("Got expected response: {}", scenario.expected),
                )
            } else {
                (
                    Outcome::Mismatch,
                    format!(
                        "Expected: {}\nGot: {}",
                        scenario.expected,
                        prefix(&response, RESPONSE_PREFIX_CHARS)
                    ),
                )
            }
        }
    };

    Verdict {
        name: scenario.name.clone(),
        outcome,
        diagnostic,
    }
}

/// The first `limit` characters of `text`, never splitting a character.
fn prefix(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(end, _)| &text[..end])
}
