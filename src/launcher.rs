use crate::launch::{LaunchSpec, ProcessResult};
use crate::runner;
use crate::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Launches every spec concurrently and gathers their results in input order
///
/// All children are spawned before any is awaited: a bus process and its
/// workers must be alive at the same time to talk to each other, so launching
/// them sequentially would deadlock the very scenario under test. Each run
/// enforces its own timeout; one slow or stuck process never cancels its
/// siblings, and the call returns only once every spec has produced a
/// result. The returned sequence has exactly one entry per input spec, in
/// the original order, regardless of completion order.
///
/// Only a panicked runner task surfaces as an error; timeouts, non-zero
/// exits and launch refusals are ordinary entries in the result list.
pub async fn launch_all(specs: Vec<LaunchSpec>, timeout: Duration) -> Result<Vec<ProcessResult>> {
    info!("Launching {} processes concurrently", specs.len());

    let handles: Vec<_> = specs
        .into_iter()
        .map(|spec| tokio::spawn(runner::run(spec, timeout)))
        .collect();

    // Awaiting in spawn order reassembles input order for free; the tasks
    // themselves run and finish in whatever order the scheduler picks
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    debug!("All {} processes reached a terminal state", results.len());
    Ok(results)
}
