use serde::{Deserialize, Serialize};

/// Text surrounding a change, used to relocate it when offsets are unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchContext {
    pub before: String,
    pub after: String,
    /// `before + original + after`.
    pub full_match: String,
}

impl MatchContext {
    /// Up to `radius` characters on each side of `text[start..end]`.
    pub fn around(text: &str, start: usize, end: usize, radius: usize) -> Self {
        let before_start = text[..start]
            .char_indices()
            .rev()
            .nth(radius.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let after_end = text[end..]
            .char_indices()
            .nth(radius)
            .map(|(i, _)| end + i)
            .unwrap_or(text.len());

        let before = text[before_start..start].to_string();
        let after = text[end..after_end].to_string();
        Self {
            full_match: format!("{}{}{}", before, &text[start..end], after),
            before,
            after,
        }
    }
}

/// One source edit, anchored on the original text.
///
/// `start`/`end` are byte offsets into the text the change was collected from.
/// Ranges of changes in one file never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub file_path: String,
    pub original: String,
    pub replacement: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_context: Option<MatchContext>,
}

impl Change {
    /// Byte range of the change, when both offsets are known.
    pub fn range(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Rebase the byte offsets of a change collected from an embedded block.
    ///
    /// Positions are already host-relative; only `start`/`end` move by `offset`.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.start = self.start.map(|s| s + offset);
        self.end = self.end.map(|e| e + offset);
        self
    }
}
