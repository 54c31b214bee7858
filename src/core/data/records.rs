use serde::{Deserialize, Serialize};

use super::TranslationKey;

/// A string newly extracted during a run.
///
/// `value` is always the canonical form (embedded expressions normalized to `{argN}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedString {
    pub key: TranslationKey,
    pub value: String,
    pub file_path: String,
    pub line: usize,
    pub column: usize,
}

/// A literal that resolved to a key which already existed before the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedExistingKey {
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub key: TranslationKey,
    pub value: String,
}

/// 1-based line and column of a literal in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
