// src/config/mod.rs

//! Watch configuration.
//!
//! Unlike tools that read a config file, everything here arrives through CLI
//! flags plus an optional `.env` file in the child's working directory. The
//! [`model::WatchConfig`] value is built once in `lib.rs` and shared
//! immutably by the detector, the supervisor, and the reload loop.

pub mod envfile;
pub mod model;

pub use envfile::{load_env_file, parse_env_pairs};
pub use model::{parse_duration, WatchConfig};
