// src/engine/mod.rs

//! Reload orchestration.
//!
//! This module ties the change detector and the process supervisor together
//! into the restart-on-change loop:
//! - start the initial process (failure here is fatal)
//! - select over change events, detector errors, and cancellation
//! - debounce bursts of changes into a single restart
//! - stop the child and exit cleanly on shutdown

pub mod orchestrator;

pub use orchestrator::ReloadOrchestrator;
