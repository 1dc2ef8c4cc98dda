use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Launch specification for one external process in a scenario
///
/// A spec is a structured argument vector rooted at a working directory,
/// never a shell string: quoting and injection ambiguities are avoided by
/// construction. An optional wrapper (e.g. a memory-checker invocation)
/// is a list of leading arguments prepended to the command at spawn time.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Working directory the child process is rooted at
    pub working_directory: PathBuf,
    /// Program to execute
    pub program: String,
    /// Arguments for the program
    pub args: Vec<String>,
    /// Extra environment variables set for the child
    pub env: HashMap<String, String>,
    /// Diagnostic wrapper argv prepended to the command (empty for none)
    pub wrapper: Vec<String>,
    /// Per-spec timeout, overriding the batch timeout when set
    pub timeout_override: Option<Duration>,
}

impl LaunchSpec {
    /// Creates a spec for `program` rooted at `working_directory`
    pub fn new(working_directory: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            working_directory: working_directory.into(),
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            wrapper: Vec::new(),
            timeout_override: None,
        }
    }

    /// Appends one argument (fluent API)
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments (fluent API)
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the child (fluent API)
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets the wrapper argv prepended to the command (fluent API)
    pub fn wrapper<I, S>(mut self, wrapper: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrapper = wrapper.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a per-spec timeout overriding the batch timeout (fluent API)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    /// Full argument vector as spawned: wrapper, then program, then args
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.wrapper.len() + 1 + self.args.len());
        argv.extend(self.wrapper.iter().cloned());
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Human-readable rendering of the full command line
    pub fn display_command(&self) -> String {
        self.argv().join(" ")
    }
}

/// Terminal state of one launched process
///
/// Every variant is an ordinary result value, not an error: a timeout or a
/// refused launch flows through the same aggregation path as a clean exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// Process terminated on its own with this exit code
    Exited(i32),
    /// Process was terminated by a signal (other than the timeout kill)
    Signaled(i32),
    /// Process was forcibly terminated after exceeding its timeout
    TimedOut,
    /// The OS refused to start the process (bad directory, missing program)
    FailedToStart(String),
}

impl ExitStatus {
    /// True only for a zero exit code; timeouts, signals, launch failures
    /// and non-zero codes are all non-clean
    pub fn is_clean(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exited with code {}", code),
            ExitStatus::Signaled(sig) => write!(f, "terminated by signal {}", sig),
            ExitStatus::TimedOut => write!(f, "timed out"),
            ExitStatus::FailedToStart(reason) => write!(f, "failed to start: {}", reason),
        }
    }
}

/// Captured outcome of one launched process
///
/// Immutable once created by the runner; ownership moves through the
/// launcher to the validator without mutation.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The spec this result was produced from
    pub spec: LaunchSpec,
    /// Terminal state of the process
    pub status: ExitStatus,
    /// Full captured standard output (partial on timeout, best effort)
    pub stdout: String,
    /// Full captured standard error (partial on timeout, best effort)
    pub stderr: String,
    /// Wall time from spawn to terminal state
    pub duration: Duration,
}

impl ProcessResult {
    /// The rendered command line this result belongs to
    pub fn command(&self) -> String {
        self.spec.display_command()
    }
}
