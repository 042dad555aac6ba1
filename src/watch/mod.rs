// src/watch/mod.rs

//! Change detection.
//!
//! This module is responsible for:
//! - Compiling the configured regex patterns once, up front.
//! - Scanning the watched tree on a fixed interval and diffing modification
//!   times against the previous scan.
//! - Turning that diff into a stream of [`FileChange`] events.
//!
//! Detection is deliberately pull-based polling; there is no OS file-event
//! integration. A file created and deleted between two polls may produce no
//! event at all. That is an accepted limitation, not a bug.
//!
//! It does **not** know about the supervised process; it only turns
//! filesystem state into change events.

pub mod detector;
pub mod patterns;

pub use detector::{ChangeKind, FileChange, PollingDetector};
pub use patterns::PatternSet;
