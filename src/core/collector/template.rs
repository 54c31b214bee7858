use std::collections::HashSet;

use swc_common::Spanned;
use swc_ecma_ast::Tpl;
use swc_ecma_visit::VisitWith;

use super::ReplacementCollector;
use super::escape::cook;
use crate::core::PatternMatch;

/// A `${expr}` placeholder, in offsets relative to the template body.
#[derive(Debug, Clone, Copy)]
struct Placeholder {
    /// Offset of `$`.
    start: usize,
    /// Offset past `}`.
    end: usize,
    expr_start: usize,
    expr_end: usize,
}

impl Placeholder {
    fn inside(&self, m: &PatternMatch) -> bool {
        m.start <= self.start && self.end <= m.end
    }

    fn within_payload(&self, m: &PatternMatch) -> bool {
        m.payload_start <= self.start && self.end <= m.payload_end
    }

    fn outside(&self, m: &PatternMatch) -> bool {
        self.end <= m.start || m.end <= self.start
    }
}

impl ReplacementCollector<'_, '_> {
    pub(super) fn collect_template(&mut self, tpl: &Tpl) {
        let (start, end) = self.parsed.range(tpl.span);
        let body_start = start + 1;
        let body = &self.source[body_start..end.saturating_sub(1).max(body_start)];

        let placeholders = self.placeholders(tpl, body_start, body);
        let matches: Vec<PatternMatch> = self
            .options
            .pattern
            .find_matches(body)
            .into_iter()
            .filter(|m| {
                let whole = placeholders.iter().all(|p| p.inside(m) || p.outside(m));
                if !whole {
                    tracing::debug!(file = self.file_path, "match cuts through a placeholder, skipped");
                }
                whole
            })
            .collect();

        let mut consumed = HashSet::new();
        if !matches.is_empty() {
            let convention = self.detector.classify(start);
            let accessor = self.accessor_for(convention);
            let whole_template = matches.len() == 1 && matches[0].spans(body);

            for m in &matches {
                let (payload, args) = payload_text(body, m, &placeholders);
                let resolved = self.resolve_payload(&payload, body_start + m.start);
                for (index, p) in placeholders.iter().enumerate() {
                    if p.inside(m) {
                        consumed.insert(index);
                    }
                }

                let args = (!args.is_empty()).then(|| {
                    let entries: Vec<String> = args
                        .iter()
                        .enumerate()
                        .map(|(i, expr)| format!("arg{}: {}", i + 1, expr))
                        .collect();
                    format!("{{ {} }}", entries.join(", "))
                });
                let call = self.call(accessor, &resolved, args.as_deref());

                if whole_template {
                    let comment = self.comment(&[resolved.canonical.as_str()], false);
                    self.push_change(start, end, format!("{}{}", call, comment), convention);
                } else {
                    let comment = self.comment(&[resolved.canonical.as_str()], true);
                    self.push_change(
                        body_start + m.start,
                        body_start + m.end,
                        format!("${{{}{}}}", call, comment),
                        convention,
                    );
                }
            }
        }

        self.block_comment_depth += 1;
        for (index, expr) in tpl.exprs.iter().enumerate() {
            if !consumed.contains(&index) {
                expr.visit_with(self);
            }
        }
        self.block_comment_depth -= 1;
    }

    fn placeholders(&self, tpl: &Tpl, body_start: usize, body: &str) -> Vec<Placeholder> {
        tpl.exprs
            .iter()
            .filter_map(|expr| {
                let (expr_start, expr_end) = self.parsed.range(expr.span());
                let expr_start = expr_start.checked_sub(body_start)?;
                let expr_end = expr_end.checked_sub(body_start)?;
                let start = body[..expr_start].rfind("${")?;
                let end = expr_end + body[expr_end..].find('}')? + 1;
                Some(Placeholder {
                    start,
                    end,
                    expr_start,
                    expr_end,
                })
            })
            .collect()
    }
}

/// Payload handed to the key manager for a match, plus the argument sources.
///
/// Literal segments are cooked; placeholders are kept as `${expr}` so the key
/// manager numbers them.
fn payload_text(body: &str, m: &PatternMatch, placeholders: &[Placeholder]) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut args = Vec::new();
    let mut last = m.payload_start;

    for p in placeholders.iter().filter(|p| p.within_payload(m)) {
        text.push_str(&cook(&body[last..p.start]));
        let expr = &body[p.expr_start..p.expr_end];
        text.push_str("${");
        text.push_str(expr);
        text.push('}');
        args.push(expr.to_string());
        last = p.end;
    }
    text.push_str(&cook(&body[last..m.payload_end]));
    (text, args)
}
