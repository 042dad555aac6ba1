// src/config/envfile.rs

//! `.env` file loading and `KEY=VALUE` flag parsing.
//!
//! Precedence: variables given on the command line win over variables from
//! the `.env` file, which in turn win over the inherited environment (the
//! inherited environment is overlaid by the supervisor at spawn time).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

/// Parse `KEY=VALUE` pairs from the `--env` flag.
///
/// Entries without a `=` are ignored; later duplicates win.
pub fn parse_env_pairs(pairs: &[String]) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for pair in pairs {
        if let Some((key, value)) = pair.trim().split_once('=') {
            vars.insert(key.trim().to_string(), value.to_string());
        } else {
            debug!(entry = %pair, "ignoring malformed --env entry (no '=')");
        }
    }
    vars
}

/// Merge `.env` from `dir` (if present) into `flag_vars`.
///
/// A missing or unreadable `.env` is not an error; the flag vars are returned
/// unchanged. Flag vars keep priority over file vars.
pub fn load_env_file(
    dir: &Path,
    flag_vars: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let env_path = dir.join(".env");
    let content = match fs::read_to_string(&env_path) {
        Ok(content) => content,
        Err(_) => return flag_vars,
    };

    info!(path = %env_path.display(), "loading .env file");

    let mut vars = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        vars.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }

    // Flag vars override file vars.
    vars.extend(flag_vars);
    vars
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
