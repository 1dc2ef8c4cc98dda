use crate::infrastructure::Sandbox;
use simrun::{ExitStatus, Result, Scenario};
use std::time::Duration;

/// The canonical passing scenario: every process exits 0 and every piece
/// of substring evidence is found somewhere in the combined stdout
#[tokio::test]
async fn test_end_to_end_passing_scenario() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;
    let outcome = Scenario::new("end_to_end")
        .timeout(Duration::from_secs(10))
        .spec(sandbox.sh("echo ready"))
        .spec(sandbox.sh("echo 'SignalValue: 42'"))
        .expect("ready")
        .expect("SignalValue: 42")
        .run()
        .await?;

    assert!(outcome.success);
    assert!(outcome.all_exited_cleanly);
    assert!(outcome.failing_results.is_empty());
    assert!(outcome.missing_substrings.is_empty());
    outcome.ensure_passed()?;
    Ok(())
}

/// Evidence in one worker's stdout satisfies the check for the whole batch
#[tokio::test]
async fn test_substring_evidence_aggregates_across_processes() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;
    let outcome = Scenario::new("aggregate_or")
        .timeout(Duration::from_secs(10))
        .spec(sandbox.sh("true"))
        .spec(sandbox.sh("echo 'X=1'"))
        .expect("X=1")
        .run()
        .await?;

    assert!(outcome.success, "evidence in any process's stdout counts");
    Ok(())
}

/// A clean batch with missing evidence and a dirty batch with complete
/// evidence both fail, each reporting only its own kind of problem
#[tokio::test]
async fn test_exit_and_substring_checks_are_independent() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;

    let clean_but_missing = Scenario::new("clean_but_missing")
        .timeout(Duration::from_secs(10))
        .spec(sandbox.sh("echo hello"))
        .expect("goodbye")
        .run()
        .await?;
    assert!(clean_but_missing.all_exited_cleanly);
    assert!(!clean_but_missing.success);
    assert!(clean_but_missing.missing_substrings.contains("goodbye"));

    let found_but_dirty = Scenario::new("found_but_dirty")
        .timeout(Duration::from_secs(10))
        .spec(sandbox.sh("echo evidence; exit 1"))
        .expect("evidence")
        .run()
        .await?;
    assert!(found_but_dirty.missing_substrings.is_empty());
    assert!(!found_but_dirty.all_exited_cleanly);
    assert_eq!(found_but_dirty.failing_results[0].status, ExitStatus::Exited(1));
    assert!(!found_but_dirty.success);
    Ok(())
}

/// stderr is captured for diagnostics but is not substring evidence
#[tokio::test]
async fn test_stderr_is_not_substring_evidence() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;
    let outcome = Scenario::new("stderr_only")
        .timeout(Duration::from_secs(10))
        .spec(sandbox.sh("echo 'SignalValue: 42' >&2"))
        .expect("SignalValue: 42")
        .run()
        .await?;

    assert!(!outcome.success);
    assert!(outcome.missing_substrings.contains("SignalValue: 42"));
    Ok(())
}
