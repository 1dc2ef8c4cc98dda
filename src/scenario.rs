//! Scenario driver: builds a batch of launch specs (a bus plus its worker
//! models), runs them concurrently and validates the combined output.

use crate::launch::{LaunchSpec, ProcessResult};
use crate::validate::{validate, ValidationOutcome};
use crate::{launcher, Result};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default per-process timeout, matching the harness this engine drives
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One integration-test scenario: ordered launch specs, a timeout bound
/// and the output substrings that serve as evidence of correctness
///
/// Specs are launched in the order they were added; by convention the bus
/// comes first, then the workers, though the engine treats every spec
/// alike. A scenario-wide wrapper (e.g. a valgrind invocation) applies to
/// every spec that does not carry its own.
pub struct Scenario {
    name: String,
    timeout: Duration,
    wrapper: Vec<String>,
    specs: Vec<LaunchSpec>,
    expected: Vec<String>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout: DEFAULT_TIMEOUT,
            wrapper: Vec::new(),
            specs: Vec::new(),
            expected: Vec::new(),
        }
    }

    /// Sets the per-process timeout (fluent API)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a wrapper argv applied to every spec without one (fluent API)
    pub fn wrapper<I, S>(mut self, wrapper: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrapper = wrapper.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one launch spec to the scenario (fluent API)
    pub fn spec(mut self, spec: LaunchSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Adds one expected stdout substring (fluent API)
    pub fn expect(mut self, substring: impl Into<String>) -> Self {
        self.expected.push(substring.into());
        self
    }

    /// Adds several expected stdout substrings (fluent API)
    pub fn expect_all<I, S>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected.extend(substrings.into_iter().map(Into::into));
        self
    }

    /// Launches every spec concurrently, validates the gathered results and
    /// logs the per-process diagnostic report
    ///
    /// Negative outcomes (timeouts, bad exits, missing substrings) are part
    /// of the returned [`ValidationOutcome`]; an `Err` here means the engine
    /// itself could not manage the batch.
    pub async fn run(self) -> Result<ValidationOutcome> {
        let Self {
            name,
            timeout,
            wrapper,
            specs,
            expected,
        } = self;

        info!(
            "Running scenario '{}': {} processes, timeout {:?}",
            name,
            specs.len(),
            timeout
        );

        let specs: Vec<LaunchSpec> = specs
            .into_iter()
            .map(|spec| {
                if spec.wrapper.is_empty() && !wrapper.is_empty() {
                    spec.wrapper(wrapper.clone())
                } else {
                    spec
                }
            })
            .collect();

        let results = launcher::launch_all(specs, timeout).await?;
        let outcome = validate(&results, &expected);
        report(&name, &results, &outcome);
        Ok(outcome)
    }
}

/// Renders the diagnostic report: every result in batch order, with full
/// detail at error level for anything a human needs to inspect
fn report(name: &str, results: &[ProcessResult], outcome: &ValidationOutcome) {
    for result in results {
        debug!(
            "[{}] {} ({:?})\n--- stdout ---\n{}\n--- stderr ---\n{}",
            name,
            result.command(),
            result.duration,
            result.stdout,
            result.stderr
        );
    }

    if outcome.success {
        info!("Scenario '{}' passed", name);
        return;
    }

    for result in &outcome.failing_results {
        error!(
            "[{}] {}: {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            name,
            result.command(),
            result.status,
            result.stdout,
            result.stderr
        );
    }
    for missing in &outcome.missing_substrings {
        error!("[{}] expected substring not found in any stdout: {:?}", name, missing);
    }
    error!("Scenario '{}' failed", name);
}
