// src/exec/mod.rs

//! Process supervision layer.
//!
//! This module owns the lifecycle of the one supervised child process, using
//! `tokio::process::Command`:
//!
//! - [`supervisor`] holds the single live process handle behind a mutex and
//!   guarantees at most one child at any time, even under concurrent
//!   start/stop calls.
//!
//! It does **not** decide *when* to restart; that is the reload loop's job.

pub mod supervisor;

pub use supervisor::{ProcessInfo, ProcessSupervisor};
