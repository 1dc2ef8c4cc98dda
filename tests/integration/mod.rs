//! Integration testing framework for the simrun orchestration engine
//!
//! This module provides fixture helpers for building scenario processes
//! and the test scenarios exercising concurrency, timeouts and validation.


// Re-export commonly used types for convenience
pub use infrastructure::Sandbox;
