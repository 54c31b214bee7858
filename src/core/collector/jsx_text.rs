use std::collections::{HashMap, HashSet};

use swc_common::Spanned;
use swc_ecma_ast::{Expr, JSXElementChild, JSXExpr, MemberProp};
use swc_ecma_visit::VisitWith;

use super::ReplacementCollector;
use super::escape::collapse_jsx_whitespace;
use crate::core::PatternMatch;

/// One child of a text run, in offsets relative to the run.
#[derive(Debug, Clone, Copy)]
enum Piece<'e> {
    Text { start: usize, end: usize },
    Container { start: usize, end: usize, expr: &'e Expr },
}

impl Piece<'_> {
    fn range(&self) -> (usize, usize) {
        match self {
            Piece::Text { start, end } | Piece::Container { start, end, .. } => (*start, *end),
        }
    }
}

fn in_run(child: &JSXElementChild) -> bool {
    match child {
        JSXElementChild::JSXText(_) => true,
        JSXElementChild::JSXExprContainer(c) => matches!(c.expr, JSXExpr::Expr(_)),
        _ => false,
    }
}

impl ReplacementCollector<'_, '_> {
    /// Walk element children, grouping consecutive text and `{expr}` children
    /// into runs.
    pub(super) fn collect_jsx_children(&mut self, children: &[JSXElementChild]) {
        self.block_comment_depth += 1;

        let mut index = 0;
        while index < children.len() {
            if !in_run(&children[index]) {
                children[index].visit_with(self);
                index += 1;
                continue;
            }

            let run_end = children[index..]
                .iter()
                .position(|c| !in_run(c))
                .map_or(children.len(), |p| index + p);
            let run = &children[index..run_end];

            let consumed = if run.iter().any(|c| matches!(c, JSXElementChild::JSXText(_))) {
                self.collect_jsx_run(run)
            } else {
                HashSet::new()
            };
            for (offset, child) in run.iter().enumerate() {
                if !consumed.contains(&offset) {
                    child.visit_with(self);
                }
            }
            index = run_end;
        }

        self.block_comment_depth -= 1;
    }

    /// Collect the matches of one run. Returns the run indices of containers
    /// folded into a translation call.
    fn collect_jsx_run(&mut self, run: &[JSXElementChild]) -> HashSet<usize> {
        let (run_start, _) = self.parsed.range(run[0].span());
        let (_, run_end) = self.parsed.range(run[run.len() - 1].span());
        let text = &self.source[run_start..run_end];

        let pieces: Vec<Piece> = run
            .iter()
            .map(|child| {
                let (start, end) = self.parsed.range(child.span());
                let (start, end) = (start - run_start, end - run_start);
                match child {
                    JSXElementChild::JSXExprContainer(c) => match &c.expr {
                        JSXExpr::Expr(expr) => Piece::Container { start, end, expr },
                        JSXExpr::JSXEmptyExpr(_) => Piece::Text { start, end },
                    },
                    _ => Piece::Text { start, end },
                }
            })
            .collect();

        let matches = self.run_matches(text, &pieces);
        let mut consumed = HashSet::new();
        if matches.is_empty() {
            return consumed;
        }

        let convention = self.detector.classify(run_start);
        let accessor = self.accessor_for(convention);

        for m in &matches {
            let interpolation = Interpolation::build(text, m, &pieces);
            let Some(resolved) = self.resolve(&interpolation.key_text, run_start + m.start) else {
                continue;
            };
            consumed.extend(interpolation.consumed.iter().copied());

            let call = self.call(accessor, &resolved, interpolation.object().as_deref());
            let comment = self.comment(&[resolved.canonical.as_str()], true);
            self.push_change(
                run_start + m.start,
                run_start + m.end,
                format!("{{{}{}}}", call, comment),
                convention,
            );
        }
        consumed
    }

    /// Matches over the whole run that keep every container whole, plus
    /// matches inside single text children the former leave untouched.
    fn run_matches(&self, text: &str, pieces: &[Piece]) -> Vec<PatternMatch> {
        let cuts = |m: &PatternMatch| {
            pieces.iter().any(|p| match p {
                Piece::Container { start, end, .. } => {
                    let inside = m.start <= *start && *end <= m.end;
                    let outside = *end <= m.start || m.end <= *start;
                    !inside && !outside
                }
                Piece::Text { .. } => false,
            })
        };
        let (mut matches, cut): (Vec<PatternMatch>, Vec<PatternMatch>) = self
            .options
            .pattern
            .find_matches(text)
            .into_iter()
            .partition(|m| !cuts(m));
        if cut.is_empty() {
            return matches;
        }

        tracing::debug!(file = self.file_path, "match cuts through a JSX container, matching text children");
        let free_text: Vec<(usize, usize)> = pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Text { start, end } => Some((*start, *end)),
                Piece::Container { .. } => None,
            })
            .filter(|(start, end)| matches.iter().all(|m| *end <= m.start || m.end <= *start))
            .collect();
        for (start, end) in free_text {
            matches.extend(self.options.pattern.find_matches(&text[start..end]).into_iter().map(
                |mut m| {
                    m.start += start;
                    m.end += start;
                    m.payload_start += start;
                    m.payload_end += start;
                    m
                },
            ));
        }
        matches.sort_by_key(|m| m.start);
        matches
    }
}

/// Placeholder names and interpolation object for one match in a run.
struct Interpolation {
    key_text: String,
    /// `(name, expression source)` in first-use order.
    entries: Vec<(String, String)>,
    consumed: Vec<usize>,
}

impl Interpolation {
    fn build(text: &str, m: &PatternMatch, pieces: &[Piece]) -> Self {
        let mut key_text = String::new();
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut names: HashMap<String, String> = HashMap::new();
        let mut consumed = Vec::new();
        let mut positional = 0;

        for (index, piece) in pieces.iter().enumerate() {
            let (start, end) = piece.range();
            if end <= m.start || m.end <= start {
                continue;
            }
            match piece {
                Piece::Text { .. } => {
                    let from = start.max(m.start);
                    let to = end.min(m.end);
                    key_text.push_str(&collapse_jsx_whitespace(&text[from..to]));
                }
                Piece::Container { expr, .. } => {
                    let expr_src = container_source(text, start, end).to_string();

                    let mut name = placeholder_name(expr);
                    let taken = name
                        .as_ref()
                        .and_then(|n| names.get(n))
                        .is_some_and(|existing| *existing != expr_src);
                    if name.is_none() || taken {
                        positional += 1;
                        name = Some(format!("arg{}", positional));
                    }
                    let name = name.unwrap_or_default();

                    if !names.contains_key(&name) {
                        names.insert(name.clone(), expr_src.clone());
                        entries.push((name.clone(), expr_src));
                    }
                    key_text.push('{');
                    key_text.push_str(&name);
                    key_text.push('}');
                    consumed.push(index);
                }
            }
        }

        Self {
            key_text,
            entries,
            consumed,
        }
    }

    /// `{ name, label: item.label }`, or `None` without containers.
    fn object(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let fields: Vec<String> = self
            .entries
            .iter()
            .map(|(name, expr)| {
                if name == expr {
                    name.clone()
                } else {
                    format!("{}: {}", name, expr)
                }
            })
            .collect();
        Some(format!("{{ {} }}", fields.join(", ")))
    }
}

/// Source of a container's expression, without the braces.
fn container_source(text: &str, start: usize, end: usize) -> &str {
    let container = &text[start..end];
    let inner_start = container.find('{').map_or(0, |i| i + 1);
    let inner_end = container.rfind('}').unwrap_or(container.len());
    container[inner_start..inner_end.max(inner_start)].trim()
}

/// Identifier → its name, member access → its last property.
fn placeholder_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(prop.sym.to_string()),
            _ => None,
        },
        Expr::Paren(paren) => placeholder_name(&paren.expr),
        _ => None,
    }
}
