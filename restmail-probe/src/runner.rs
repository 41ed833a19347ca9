//! Builds the fixed scenario set and runs it.

use restmail_probe_client::{
    Clock, IdSource, MailSession, PolicyRequest, SystemClock, UlidIds, exchange,
};
use restmail_probe_common::{Endpoint, ProbeConfig, internal};

use crate::{
    report::Report,
    scenario::{Scenario, Target, Verdict, evaluate},
};

/// What the delivery endpoint says once a message is stored.
pub const QUEUED: &str = "250 2.0.0 Ok: Queued";
pub const POLICY_OK: &str = "action=OK";
pub const POLICY_REJECT: &str = "action=REJECT";

/// Runs scenarios one after another against the configured service.
#[derive(Debug)]
pub struct Runner<C = SystemClock, I = UlidIds> {
    config: ProbeConfig,
    clock: C,
    ids: I,
}

impl Runner {
    #[must_use]
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_sources(config, SystemClock, UlidIds)
    }
}

impl<C: Clock, I: IdSource> Runner<C, I> {
    /// Uses the given clock and identifier source to stamp mail sessions.
    pub fn with_sources(config: ProbeConfig, clock: C, ids: I) -> Self {
        Self { config, clock, ids }
    }

    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    fn endpoint(&self, target: Target) -> Endpoint {
        match target {
            Target::Policy => self.config.policy_endpoint(),
            Target::Delivery => self.config.delivery_endpoint(),
        }
    }

    /// A policy query for `recipient`, expecting `expected` in the reply.
    pub fn policy_scenario(&self, name: &str, recipient: &str, expected: &str) -> Scenario {
        let request = PolicyRequest::new(recipient);

        Scenario {
            name: name.to_string(),
            target: Target::Policy,
            payload: request.to_bytes(),
            expected: expected.to_string(),
            details: vec![("Recipient", recipient.to_string())],
        }
    }

    /// A full mail session that must end with the message queued.
    pub fn delivery_scenario(&self, name: &str, session: &MailSession) -> Scenario {
        Scenario {
            name: name.to_string(),
            target: Target::Delivery,
            payload: session.build(&self.clock, &self.ids),
            expected: QUEUED.to_string(),
            details: vec![
                ("From", session.from_addr().to_string()),
                ("To", session.to_addr().to_string()),
                ("Subject", session.subject().to_string()),
            ],
        }
    }

    /// The four scenarios of a probe run, in run order.
    pub fn scenarios(&self) -> Vec<Scenario> {
        let recipients = &self.config.recipients;
        let line_ending = self.config.line_ending;
        let stamp = self.clock.now().format("%Y%m%d-%H%M%S");

        vec![
            self.policy_scenario(
                "Policy Service - Valid Domain",
                &recipients.accepted,
                POLICY_OK,
            ),
            self.policy_scenario(
                "Policy Service - Invalid Domain",
                &recipients.rejected,
                POLICY_REJECT,
            ),
            self.delivery_scenario(
                "Mail Delivery - Send Test Email",
                &MailSession::new(
                    "test@example.com",
                    "testuser@restmail.org",
                    format!("Test Email from {} mode", self.config.mode),
                )
                .line_ending(line_ending),
            ),
            self.delivery_scenario(
                "Mail Delivery - Another Test Email",
                &MailSession::new(
                    "sender@test.com",
                    "john.doe@restmail.org",
                    format!("Integration Test {stamp}"),
                )
                .line_ending(line_ending),
            ),
        ]
    }

    /// Runs one scenario: a single exchange, then evaluation.
    pub async fn run(&self, scenario: &Scenario) -> Verdict {
        let endpoint = self.endpoint(scenario.target);
        internal!(level = DEBUG, "Running '{}' against {endpoint}", scenario.name);

        let result = exchange(&endpoint, &scenario.payload).await;
        if let Err(err) = &result {
            internal!(level = WARN, "Exchange with {endpoint} failed: {err}");
        }

        let verdict = evaluate(scenario, &result);
        internal!(
            level = INFO,
            "'{}' finished: {:?}",
            verdict.name(),
            verdict.outcome()
        );

        verdict
    }

    /// Runs every scenario from [`Self::scenarios`] in order.
    pub async fn run_all(&self) -> Report {
        self.run_all_with(|_, _| {}, |_| {}).await
    }

    /// Like [`Self::run_all`], calling `started` with the zero-based index
    /// before each scenario runs and `finished` with its verdict afterwards.
    pub async fn run_all_with(
        &self,
        mut started: impl FnMut(usize, &Scenario),
        mut finished: impl FnMut(&Verdict),
    ) -> Report {
        let mut report = Report::new();
        for (index, scenario) in self.scenarios().iter().enumerate() {
            started(index, scenario);
            let verdict = self.run(scenario).await;
            finished(&verdict);
            report.record(verdict);
        }
        report
    }
}
