//! Common text utilities shared across the codebase.

use crate::core::SourcePosition;

/// Line start offsets of a text, for O(log n) offset → line/column lookups.
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        SourcePosition::new(line + 1, column + 1)
    }

    /// The full text of a 1-based line, without its line break.
    pub fn line_text(&self, line: usize) -> &'a str {
        let Some(&start) = self.line_starts.get(line.saturating_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }
}

/// Maps offsets of an embedded block to positions in its host text.
pub struct SourceLocator<'a> {
    index: LineIndex<'a>,
    base: usize,
}

impl<'a> SourceLocator<'a> {
    /// `host` is the full file text and `base` the block's offset inside it.
    pub fn new(host: &'a str, base: usize) -> Self {
        Self {
            index: LineIndex::new(host),
            base,
        }
    }

    pub fn position(&self, offset: usize) -> SourcePosition {
        self.index.position(self.base + offset)
    }
}

/// Byte offset where the line containing `offset` starts.
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = &text[start..];
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
}

/// True if only spaces or tabs precede `offset` on its line.
pub fn is_at_line_start(text: &str, offset: usize) -> bool {
    text[line_start(text, offset)..offset]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// One indentation level, guessed from an existing indent.
pub fn indent_unit(existing: &str) -> &'static str {
    if existing.starts_with('\t') { "\t" } else { "  " }
}
