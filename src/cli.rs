use clap::Parser;
use eyre::eyre;
use std::path::PathBuf;
use std::time::Duration;

use crate::launch::LaunchSpec;
use crate::scenario::Scenario;
use crate::Result;

/// Runs a batch of processes concurrently and validates their combined stdout
#[derive(Parser)]
#[command(name = "simrun")]
#[command(about = "Concurrent process runner with output validation for simulation scenarios")]
#[command(version)]
pub struct Cli {
    /// Working directory the processes are rooted at
    #[arg(long, short = 'C', default_value = ".")]
    pub dir: PathBuf,

    /// Per-process timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,

    /// Wrapper prefix applied to every command (whitespace-split)
    #[arg(long)]
    pub wrapper: Option<String>,

    /// Substring expected somewhere in the combined stdout (repeatable)
    #[arg(long = "expect", value_name = "SUBSTRING")]
    pub expected: Vec<String>,

    /// Scenario name used in the report
    #[arg(long, default_value = "cli")]
    pub name: String,

    /// Commands to run concurrently
    ///
    /// Each command is whitespace-split into an argument vector; no shell
    /// interpretation (quoting, globbing, redirection) is performed.
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl Cli {
    /// Builds the scenario described by the command line
    pub fn into_scenario(self) -> Result<Scenario> {
        let mut scenario = Scenario::new(self.name).timeout(Duration::from_secs(self.timeout_secs));

        if let Some(ref wrapper) = self.wrapper {
            scenario = scenario.wrapper(wrapper.split_whitespace().map(str::to_owned));
        }

        for command in &self.commands {
            let mut tokens = command.split_whitespace();
            let program = tokens
                .next()
                .ok_or_else(|| eyre!("Empty command in argument list"))?;
            scenario = scenario.spec(
                LaunchSpec::new(&self.dir, program).args(tokens.map(str::to_owned)),
            );
        }

        Ok(scenario.expect_all(self.expected))
    }
}
