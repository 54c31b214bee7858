//! Single-file component block splitting.
//!
//! A component file is a sequence of top-level blocks such as
//! `<template>`, `<script setup lang="ts">` and `<style scoped>`. Only block
//! contents are ever rewritten, so the text outside them (tags, attribute lists,
//! blank lines between blocks) is reassembled byte for byte.

use memchr::memmem;

use crate::core::TransformError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Template,
    Script,
    Style,
    Custom(String),
}

/// One top-level block. Offsets are byte offsets into the component source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock<'a> {
    pub kind: BlockKind,
    /// Offset of the opening `<`.
    pub start: usize,
    /// Offset just past the closing tag.
    pub end: usize,
    pub content_start: usize,
    pub content_end: usize,
    /// Raw attribute list of the opening tag.
    pub attrs: &'a str,
    pub content: &'a str,
}

impl<'a> SfcBlock<'a> {
    /// Value of an attribute, `Some("")` for a bare attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        parse_attrs(self.attrs)
            .into_iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value.unwrap_or(""))
    }

    pub fn lang(&self) -> &'a str {
        self.attr("lang").filter(|l| !l.is_empty()).unwrap_or("js")
    }

    pub fn is_setup(&self) -> bool {
        self.attr("setup").is_some()
    }
}

/// Split a component source into its top-level blocks.
pub fn split_blocks<'a>(source: &'a str, file_path: &str) -> Result<Vec<SfcBlock<'a>>, TransformError> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut pointer = 0;

    while let Some(pos) = memchr::memchr(b'<', &bytes[pointer..]) {
        let start = pointer + pos;

        if bytes[start..].starts_with(b"<!--") {
            pointer = match memmem::find(&bytes[start..], b"-->") {
                Some(end) => start + end + 3,
                None => bytes.len(),
            };
            continue;
        }

        let name_start = start + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-' || **b == b'_')
            .count();
        if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
            pointer = start + 1;
            continue;
        }
        let name = &source[name_start..name_start + name_len];
        let attrs_start = name_start + name_len;

        let unclosed = || TransformError::Parse {
            file_path: file_path.to_string(),
            message: format!("unclosed <{}> block at byte {}", name, start),
        };

        let tag_end = find_closing_angle(bytes, attrs_start).ok_or_else(unclosed)?;
        let self_closing = tag_end > attrs_start && bytes[tag_end - 1] == b'/';
        let attrs_end = if self_closing { tag_end - 1 } else { tag_end };
        let attrs = &source[attrs_start..attrs_end];

        let (content_start, content_end, end) = if self_closing {
            (tag_end + 1, tag_end + 1, tag_end + 1)
        } else {
            let content_start = tag_end + 1;
            let (content_end, end) =
                find_block_end(bytes, name.as_bytes(), content_start).ok_or_else(unclosed)?;
            (content_start, content_end, end)
        };

        blocks.push(SfcBlock {
            kind: block_kind(name),
            start,
            end,
            content_start,
            content_end,
            attrs,
            content: &source[content_start..content_end],
        });
        pointer = end;
    }

    Ok(blocks)
}

fn block_kind(name: &str) -> BlockKind {
    match name {
        "template" => BlockKind::Template,
        "script" => BlockKind::Script,
        "style" => BlockKind::Style,
        other => BlockKind::Custom(other.to_string()),
    }
}

/// Finds the closing `>` of a tag, handling quoted attributes.
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(q), _) if byte == q => quote = None,
            (None, b'>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

/// Finds `</name>` matching a block opened before `start`.
///
/// Nested tags of the same name (`<template v-if>` inside a template) are
/// balanced. Returns the offset of the closing tag and the offset past it.
fn find_block_end(bytes: &[u8], name: &[u8], start: usize) -> Option<(usize, usize)> {
    let open: Vec<u8> = [b"<".as_slice(), name].concat();
    let close: Vec<u8> = [b"</".as_slice(), name].concat();
    let mut depth = 0usize;
    let mut pointer = start;

    // script and style contents are raw text
    let raw_text = name == b"script" || name == b"style";

    loop {
        let next_close = pointer + memmem::find(&bytes[pointer..], &close)?;
        let next_open = if raw_text {
            None
        } else {
            memmem::find(&bytes[pointer..next_close], &open).map(|p| pointer + p)
        };

        match next_open {
            Some(open_at) if is_tag_boundary(bytes, open_at + open.len()) => {
                depth += 1;
                pointer = open_at + open.len();
            }
            Some(open_at) => pointer = open_at + open.len(),
            None if !is_tag_boundary(bytes, next_close + close.len()) => {
                pointer = next_close + close.len();
            }
            None => {
                let end = find_closing_angle(bytes, next_close + close.len())? + 1;
                if depth == 0 {
                    return Some((next_close, end));
                }
                depth -= 1;
                pointer = end;
            }
        }
    }
}

fn is_tag_boundary(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at)
        .is_none_or(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'))
}

/// Parse a raw attribute list into `(name, value)` pairs.
fn parse_attrs(attrs: &str) -> Vec<(&str, Option<&str>)> {
    let mut out = Vec::new();
    let mut rest = attrs.trim_start();

    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let mut value = None;
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let close = body.find(q).unwrap_or(body.len());
                    value = Some(&body[..close]);
                    rest = body.get(close + 1..).unwrap_or("");
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    value = Some(&after_eq[..end]);
                    rest = &after_eq[end..];
                }
            }
        }

        if !name.is_empty() {
            out.push((name, value));
        } else if value.is_none() {
            // stray '=' or quote
            rest = rest.get(1..).unwrap_or("");
        }
        rest = rest.trim_start();
    }
    out
}
