//! Concurrent process-orchestration engine for simulation integration tests.
//!
//! A scenario is a set of external processes (one coordinating "bus" and one
//! or more worker "model" processes) that must be alive simultaneously to
//! exchange state and terminate within a bounded time. This crate launches
//! all of them concurrently, bounds each with its own timeout, collects
//! captured stdout/stderr and exit status per process, and validates the
//! aggregate outcome against a list of expected output substrings.
//!
//! The engine is orchestration-agnostic: it knows nothing about simulation
//! semantics, only about OS processes, timeouts, and captured text.

pub type Result<T> = color_eyre::eyre::Result<T>;

pub mod cli;
pub mod launch;
pub mod launcher;
pub mod runner;
pub mod scenario;
pub mod validate;

pub use launch::{ExitStatus, LaunchSpec, ProcessResult};
pub use launcher::launch_all;
pub use scenario::Scenario;
pub use validate::{validate, ValidationOutcome};
