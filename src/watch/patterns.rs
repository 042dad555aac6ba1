// src/watch/patterns.rs

use std::fmt;

use regex::Regex;

use crate::errors::WatchError;

/// Compiled file-match patterns for one watch run.
///
/// Patterns are regexes matched against the *full* path string, not just the
/// basename, so `src/.*\.rs$` and `\.rs$` both behave as expected. A path is
/// of interest if at least one pattern matches; pattern order does not affect
/// the outcome.
#[derive(Clone)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.regexes.len())
            .finish()
    }
}

impl PatternSet {
    /// Compile all patterns, failing fast on the first bad one.
    ///
    /// This runs at detector construction so a pattern typo surfaces before
    /// anything is spawned, never mid-scan.
    pub fn compile(patterns: &[String]) -> Result<Self, WatchError> {
        let mut regexes = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let re = Regex::new(pattern).map_err(|source| WatchError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            regexes.push(re);
        }
        Ok(Self { regexes })
    }

    /// True if at least one pattern matches the given path string.
    pub fn matches(&self, path: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(path))
    }
}
