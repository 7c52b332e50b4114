//! Basename matching
//!
//! A pattern matches when the regular expression matches a prefix of the
//! basename, ignoring case. It does not have to consume the whole name.

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// A compiled, case-insensitive, start-anchored name pattern.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the expression does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for NamePattern {}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Test `name` against an optional pattern. An absent pattern always matches.
pub fn matches_name(name: &str, pattern: Option<&NamePattern>) -> bool {
    pattern.is_none_or(|p| p.matches(name))
}
