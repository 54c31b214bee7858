//! Delimiter pattern matching.
//!
//! Extractable text is marked in source with a delimiter pattern, by default
//! `___text___`. The pattern is a regular expression with exactly one capture
//! group holding the payload.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::TransformError;

/// Default delimiter pattern. Greedy: `___A___ ___B___` is a single match.
pub const DEFAULT_PATTERN: &str = "___(.+)___";

static DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(DEFAULT_PATTERN).unwrap());

/// One delimiter occurrence inside a text value.
///
/// Offsets are byte offsets relative to the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub start: usize,
    pub end: usize,
    pub payload_start: usize,
    pub payload_end: usize,
    pub full: String,
    pub payload: String,
}

impl PatternMatch {
    /// True if the match covers the whole of `text`.
    pub fn spans(&self, text: &str) -> bool {
        self.start == 0 && self.end == text.len()
    }
}

#[derive(Debug, Clone)]
pub struct DelimiterPattern {
    regex: Regex,
}

impl DelimiterPattern {
    /// Compile a delimiter pattern, requiring exactly one capture group.
    pub fn new(pattern: &str) -> Result<Self, TransformError> {
        let regex = Regex::new(pattern).map_err(|e| TransformError::InvalidConfig {
            message: format!("invalid pattern '{}': {}", pattern, e),
        })?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(TransformError::InvalidConfig {
                message: format!(
                    "pattern '{}' must have exactly one capture group, found {}",
                    pattern, groups
                ),
            });
        }

        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All non-overlapping occurrences in `text`, left to right.
    pub fn find_matches(&self, text: &str) -> Vec<PatternMatch> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let payload = caps.get(1)?;
                if full.is_empty() {
                    return None;
                }
                Some(PatternMatch {
                    start: full.start(),
                    end: full.end(),
                    payload_start: payload.start(),
                    payload_end: payload.end(),
                    full: full.as_str().to_string(),
                    payload: payload.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Payload of the first occurrence in `text`.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl Default for DelimiterPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}
