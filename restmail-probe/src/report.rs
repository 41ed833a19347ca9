use std::process::ExitCode;

use crate::scenario::Verdict;

/// Verdicts of one run, in the order the scenarios ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    verdicts: Vec<Verdict>,
}

impl Report {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verdicts: Vec::new(),
        }
    }

    pub fn record(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    #[must_use]
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed()).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    /// An empty report counts as passing.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
