use crate::infrastructure::Sandbox;
use rand::Rng;
use simrun::{launch_all, ExitStatus, Result};
use std::time::Duration;

/// Results must come back in spec order no matter which process finishes
/// first, for every batch size
#[tokio::test]
async fn test_result_order_matches_spec_order_under_random_delays() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;
    let mut rng = rand::thread_rng();

    for n in 1..=6usize {
        let specs = (0..n)
            .map(|i| {
                let delay_ms: u32 = rng.gen_range(0..400);
                sandbox.sh(&format!("sleep 0.{:03}; echo marker-{}", delay_ms, i))
            })
            .collect();

        let results = launch_all(specs, Duration::from_secs(30)).await?;

        assert_eq!(results.len(), n, "exactly one result per spec");
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.status, ExitStatus::Exited(0));
            assert_eq!(
                result.stdout.trim(),
                format!("marker-{}", i),
                "completion order leaked into result order (batch of {})",
                n
            );
        }
    }
    Ok(())
}

/// Worst case for a naive gather: the first spec is the slowest
#[tokio::test]
async fn test_slowest_first_spec_still_reported_first() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sandbox = Sandbox::new()?;
    let specs = vec![
        sandbox.sh("sleep 0.5; echo slow"),
        sandbox.sh("echo fast"),
    ];

    let results = launch_all(specs, Duration::from_secs(30)).await?;
    assert_eq!(results[0].stdout, "slow\n");
    assert_eq!(results[1].stdout, "fast\n");
    Ok(())
}
