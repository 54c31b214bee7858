//! String escaping between source literals, template literals and keys.

use crate::core::TranslationKey;

/// Decode the escape sequences of a string or template literal body.
///
/// Invalid sequences are kept verbatim.
pub fn cook(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            // line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.clone().take(2).collect();
                match decode_hex(&hex, 2) {
                    Some(decoded) => {
                        chars.nth(1);
                        out.push(decoded);
                    }
                    None => {
                        out.push_str("\\x");
                    }
                }
            }
            'u' => {
                if chars.peek() == Some(&'{') {
                    let body: String = chars.clone().skip(1).take_while(|c| *c != '}').collect();
                    match decode_hex(&body, body.len()) {
                        Some(decoded) if !body.is_empty() => {
                            // '{' + body + '}'
                            chars.nth(body.chars().count() + 1);
                            out.push(decoded);
                        }
                        _ => out.push_str("\\u"),
                    }
                } else {
                    let hex: String = chars.clone().take(4).collect();
                    match decode_hex(&hex, 4) {
                        Some(decoded) => {
                            chars.nth(3);
                            out.push(decoded);
                        }
                        None => out.push_str("\\u"),
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn decode_hex(hex: &str, len: usize) -> Option<char> {
    if hex.len() != len || len == 0 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Escape a verbatim literal segment for use inside a template literal.
///
/// `raw_escapes` is true for JavaScript string bodies whose backslash escapes
/// are copied through; JSX attribute values have no escapes, so their
/// backslashes are doubled.
pub fn escape_template_segment(raw: &str, raw_escapes: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if raw_escapes => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a key as a single-quoted literal, for use inside double-quoted
/// markup attributes.
pub fn single_quoted(key: &TranslationKey) -> String {
    match key {
        TranslationKey::Number(n) => n.to_string(),
        TranslationKey::Text(s) => {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('\'', "\\'")
                .replace('\n', "\\n")
                .replace('"', "&quot;");
            format!("'{}'", escaped)
        }
    }
}

/// Collapse JSX text whitespace the way JSX renders it: runs containing a
/// line break become a single space.
pub fn collapse_jsx_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            pending.push(c);
            continue;
        }
        flush_whitespace(&mut out, &mut pending);
        out.push(c);
    }
    flush_whitespace(&mut out, &mut pending);
    out
}

fn flush_whitespace(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    if pending.contains('\n') {
        out.push(' ');
    } else {
        out.push_str(pending);
    }
    pending.clear();
}
