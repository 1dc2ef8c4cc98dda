use crate::launch::{ExitStatus, LaunchSpec, ProcessResult};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs one external process to its terminal state, bounded by a timeout
///
/// The child is rooted at the spec's working directory with stdout and
/// stderr fully captured. A spec-level timeout override takes precedence
/// over `batch_timeout`. On expiry the child's whole process group is
/// killed and whatever output was captured up to that point is returned.
///
/// Timeouts, non-zero exits and launch refusals are all ordinary result
/// values; this function itself never fails.
///
/// # Returns
/// * `ProcessResult` - Captured outcome of the process
pub async fn run(spec: LaunchSpec, batch_timeout: Duration) -> ProcessResult {
    let deadline = spec.timeout_override.unwrap_or(batch_timeout);
    let argv = spec.argv();

    debug!(
        "Spawning process: {} (dir: {}, timeout: {:?})",
        spec.display_command(),
        spec.working_directory.display(),
        deadline
    );

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command.current_dir(&spec.working_directory);
    for (key, value) in &spec.env {
        command.env(key, value);
    }

    // process_group(0) makes the child a group leader, so a group kill
    // reaches the wrapper and any grandchildren holding the pipes open
    command.process_group(0);
    command.kill_on_drop(true);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let start = Instant::now();
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!("Failed to start {}: {}", spec.display_command(), e);
            return ProcessResult {
                status: ExitStatus::FailedToStart(e.to_string()),
                stdout: String::new(),
                stderr: String::new(),
                duration: start.elapsed(),
                spec,
            };
        }
    };

    // The child leads its own group, so its pid doubles as the pgid.
    // Recorded now because the pid is gone once the child is reaped.
    let pgid = child.id().map(|raw| Pid::from_raw(raw as i32));

    // Drain both pipes concurrently with the wait, so a full pipe can
    // never stall the child and partial output survives a timeout kill
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let status = match timeout(deadline, child.wait()).await {
        Ok(Ok(status)) => exit_status_of(status),
        Ok(Err(e)) => {
            warn!("Error waiting for {}: {}", spec.display_command(), e);
            ExitStatus::FailedToStart(format!("wait failed: {}", e))
        }
        Err(_) => {
            warn!(
                "Process exceeded timeout of {:?}, killing process group: {}",
                deadline,
                spec.display_command()
            );
            if let Some(pgid) = pgid {
                kill_group(pgid);
            }
            // Reap so the child's ends of the pipes close
            let _ = child.wait().await;
            ExitStatus::TimedOut
        }
    };

    let duration = start.elapsed();

    // An exited child can leave a grandchild holding the pipes open;
    // bound the drain by the remaining deadline and kill the group if
    // something is still hanging on to them
    let grace = deadline
        .saturating_sub(start.elapsed())
        .max(Duration::from_millis(100));
    let stdout = finish_drain(stdout_task, grace, pgid).await;
    let stderr = finish_drain(stderr_task, Duration::from_millis(100), pgid).await;

    info!("Process {} after {:?}: {}", status, duration, spec.display_command());

    ProcessResult {
        spec,
        status,
        stdout,
        stderr,
        duration,
    }
}

/// Reads a captured pipe to the end on its own task
fn drain<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: AsyncReadExt + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Awaits a drain task, killing the process group if it outlives `grace`
async fn finish_drain(mut task: JoinHandle<String>, grace: Duration, pgid: Option<Pid>) -> String {
    match timeout(grace, &mut task).await {
        Ok(output) => output.unwrap_or_default(),
        Err(_) => {
            if let Some(pgid) = pgid {
                warn!("Output pipes still open after exit, killing process group {}", pgid);
                kill_group(pgid);
            }
            task.await.unwrap_or_default()
        }
    }
}

fn exit_status_of(status: std::process::ExitStatus) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => ExitStatus::Exited(code),
        None => ExitStatus::Signaled(status.signal().unwrap_or(0)),
    }
}

/// Sends SIGKILL to the whole process group
fn kill_group(pgid: Pid) {
    debug!("Sending SIGKILL to process group {}", pgid);
    if let Err(e) = kill(Pid::from_raw(-pgid.as_raw()), Signal::SIGKILL) {
        // ESRCH means the group died between the timeout and the kill
        if e != nix::Error::ESRCH {
            warn!("Failed to SIGKILL process group {}: {}", pgid, e);
        }
    }
}
