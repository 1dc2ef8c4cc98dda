use crate::launch::ProcessResult;
use crate::Result;
use eyre::eyre;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Aggregate verdict over one batch of process results
///
/// Derived purely from the results and the expected substrings; holds no
/// state of its own and is recomputed on every run.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// True iff every process exited with code 0
    pub all_exited_cleanly: bool,
    /// Non-clean results, in their original batch order
    pub failing_results: Vec<ProcessResult>,
    /// Expected substrings found in no process's stdout
    pub missing_substrings: BTreeSet<String>,
    /// True iff all processes exited cleanly and no substring is missing
    pub success: bool,
}

/// Validates a batch of results against the expected output substrings
///
/// Two independent checks, both always performed so their failures are
/// reported together:
/// - every process must have exited with code 0 (timeouts, signals and
///   launch failures are never clean);
/// - every expected substring must occur verbatim, case-sensitively, in
///   the captured stdout of at least one result. Any result counts, clean
///   or not, but a substring is never assembled from fragments spread
///   across two results.
pub fn validate<S: AsRef<str>>(results: &[ProcessResult], expected: &[S]) -> ValidationOutcome {
    let failing_results: Vec<ProcessResult> = results
        .iter()
        .filter(|result| !result.status.is_clean())
        .cloned()
        .collect();
    let all_exited_cleanly = failing_results.is_empty();

    let missing_substrings: BTreeSet<String> = expected
        .iter()
        .map(AsRef::as_ref)
        .filter(|needle| !results.iter().any(|result| result.stdout.contains(*needle)))
        .map(str::to_owned)
        .collect();

    let success = all_exited_cleanly && missing_substrings.is_empty();

    ValidationOutcome {
        all_exited_cleanly,
        failing_results,
        missing_substrings,
        success,
    }
}

impl ValidationOutcome {
    /// Converts a failed outcome into an error naming every failing command
    /// and missing substring, for callers that want pass/fail semantics
    pub fn ensure_passed(&self) -> Result<()> {
        if self.success {
            return Ok(());
        }

        let mut message = String::from("scenario validation failed");
        for result in &self.failing_results {
            // Infallible writes to a String
            let _ = write!(message, "\n  {}: {}", result.command(), result.status);
        }
        for missing in &self.missing_substrings {
            let _ = write!(message, "\n  not found in any stdout: {:?}", missing);
        }
        Err(eyre!(message))
    }
}
