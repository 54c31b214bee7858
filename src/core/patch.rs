//! Text patching.
//!
//! Changes are applied back to front against the original text, so the
//! offsets of changes not yet applied stay valid. A replacement ending in a
//! `//` comment has the comment moved past the rest of the enclosing syntax
//! (closing brackets, semicolons) so the comment cannot swallow it.

use crate::core::{Change, TransformError};

/// Apply `changes` to `text`.
///
/// Each change is anchored by its byte range when the range still reads
/// `original`; otherwise by the first occurrence of its match context.
pub fn apply_changes(text: &str, changes: &[Change], file_path: &str) -> Result<String, TransformError> {
    let mut anchored = Vec::with_capacity(changes.len());
    for (seq, change) in changes.iter().enumerate() {
        let (start, end) = anchor(text, change, file_path)?;
        anchored.push((start, end, seq, change));
    }

    // descending start; at equal starts later changes go first so earlier
    // ones end up in front
    anchored.sort_by(|a, b| b.0.cmp(&a.0).then(b.2.cmp(&a.2)));

    for pair in anchored.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.1 > later.0 {
            return Err(TransformError::OverlappingChanges {
                file_path: file_path.to_string(),
                first_start: earlier.0,
                first_end: earlier.1,
                second_start: later.0,
                second_end: later.1,
            });
        }
    }

    let mut out = text.to_string();
    for (start, end, _, change) in anchored {
        splice(&mut out, start, end, &change.replacement);
    }
    Ok(out)
}

fn anchor(text: &str, change: &Change, file_path: &str) -> Result<(usize, usize), TransformError> {
    if let Some((start, end)) = change.range()
        && text.get(start..end) == Some(change.original.as_str())
    {
        return Ok((start, end));
    }

    // first occurrence wins when the context is not unique
    if let Some(context) = &change.match_context
        && let Some(at) = text.find(&context.full_match)
    {
        let inner = if context.full_match[context.before.len()..].starts_with(&change.original) {
            Some(context.before.len())
        } else {
            context.full_match.find(&change.original)
        };
        if let Some(inner) = inner {
            tracing::debug!(
                file = file_path,
                line = change.line,
                "change anchored by match context"
            );
            let start = at + inner;
            return Ok((start, start + change.original.len()));
        }
    }

    Err(TransformError::UnresolvablePosition {
        file_path: file_path.to_string(),
        line: change.line,
        column: change.column,
        original: change.original.clone(),
    })
}

fn splice(text: &mut String, start: usize, end: usize, replacement: &str) {
    let Some(comment_at) = trailing_line_comment(replacement) else {
        text.replace_range(start..end, replacement);
        return;
    };

    let code = replacement[..comment_at].trim_end();
    let comment = &replacement[comment_at..];
    text.replace_range(start..end, code);

    let after = start + code.len();
    let (offset, placement) = comment_anchor(&text[after..]);
    let inserted = match placement {
        Placement::Trailing => format!(" {}", comment),
        Placement::BeforeCode => format!(" {}\n", comment),
        Placement::BeforeComment => format!("{} ", comment),
    };
    text.insert_str(after + offset, &inserted);
}

/// How a relocated comment joins the text at its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Nothing but a line break follows.
    Trailing,
    /// Code follows on the same line.
    BeforeCode,
    /// An existing `//` comment follows.
    BeforeComment,
}

/// Offset of a `//` comment that ends `replacement` at the top level.
fn trailing_line_comment(replacement: &str) -> Option<usize> {
    let bytes = replacement.as_bytes();
    let mut braces = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let single_line = !replacement[i..].contains('\n');
                return (braces == 0 && single_line).then_some(i);
            }
            b'{' => {
                braces += 1;
                i += 1;
            }
            b'}' => {
                braces = braces.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Where a relocated comment goes in the text following a replacement.
///
/// The comment lands before the next line break or `//` comment, after the
/// next comma outside brackets opened in `rest`, or at the end of the text.
fn comment_anchor(rest: &str) -> (usize, Placement) {
    let bytes = rest.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                let before_cr = if i > 0 && bytes[i - 1] == b'\r' { i - 1 } else { i };
                return (before_cr, Placement::Trailing);
            }
            b',' if depth <= 0 => {
                let line_rest = rest[i + 1..].split('\n').next().unwrap_or("");
                let placement = if line_rest.trim().is_empty() {
                    Placement::Trailing
                } else {
                    Placement::BeforeCode
                };
                return (i + 1, placement);
            }
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => return (i, Placement::BeforeComment),
            b'(' | b'[' | b'{' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' | b'}' => {
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    (bytes.len(), Placement::Trailing)
}

/// Index past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index past the template literal opening at `start`, nested `${}` included.
fn skip_template(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = skip_placeholder(bytes, i + 2),
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index past the `}` closing a template placeholder whose body starts at `start`.
fn skip_placeholder(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' if depth == 0 => return i + 1,
            b'}' => {
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    memchr::memmem::find(&bytes[start + 2..], b"*/").map_or(bytes.len(), |p| start + 2 + p + 2)
}
