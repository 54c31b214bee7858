//! Replacement collection.
//!
//! One pre-order walk over a parsed script finds every literal holding a
//! delimiter match and records the [`Change`] that turns it into a translation
//! call. Four sites are handled:
//!
//! - plain string literals (`"___Save___"`)
//! - JSX attribute strings (`title="___Save___"`)
//! - JSX text runs, including embedded `{expr}` containers
//! - untagged template literals with `${expr}` placeholders
//!
//! ## Module Structure
//!
//! - `escape`: literal cooking and template escaping
//! - `jsx_text`: JSX text runs and their interpolation objects
//! - `template`: template literal placeholders

pub mod escape;
mod jsx_text;
mod template;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use swc_common::Spanned;
use swc_ecma_ast::{
    CallExpr, Callee, Expr, JSXAttr, JSXAttrValue, JSXElement, JSXElementName, JSXFragment, Lit,
    Str, TaggedTpl, TsEnumDecl, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::context_detector::{AccessorConvention, ContextDetector, FunctionInfo};
use crate::core::key_manager::{KeyManager, ResolvedKey};
use crate::core::parsers::jsx::ParsedModule;
use crate::core::{Change, CommentStyle, MatchContext, TransformOptions};
use crate::utils::SourceLocator;

use escape::{cook, escape_template_segment};

/// Characters of surrounding text kept in each change's fallback locator.
pub(crate) const CONTEXT_RADIUS: usize = 24;

/// Changes of one script plus the conventions they rely on.
#[derive(Debug, Default)]
pub struct CollectOutput {
    pub changes: Vec<Change>,
    pub conventions: BTreeSet<AccessorConvention>,
}

/// Where a string literal sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringSite {
    Expression,
    JsxAttribute,
}

pub struct ReplacementCollector<'a, 'k> {
    source: &'a str,
    parsed: &'a ParsedModule,
    file_path: &'a str,
    options: &'a TransformOptions,
    keys: &'a mut KeyManager<'k>,
    detector: ContextDetector<'a>,
    locator: &'a SourceLocator<'a>,
    /// Nesting depth of JSX children, JSX attributes and template placeholders,
    /// where only block comments are safe.
    block_comment_depth: usize,
    output: CollectOutput,
}

impl<'a, 'k> ReplacementCollector<'a, 'k> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: &'a str,
        parsed: &'a ParsedModule,
        functions: &'a [FunctionInfo],
        file_path: &'a str,
        options: &'a TransformOptions,
        keys: &'a mut KeyManager<'k>,
        locator: &'a SourceLocator<'a>,
    ) -> Self {
        Self {
            source,
            parsed,
            file_path,
            options,
            keys,
            detector: ContextDetector::new(functions, options.no_import),
            locator,
            block_comment_depth: 0,
            output: CollectOutput::default(),
        }
    }

    pub fn collect(mut self) -> CollectOutput {
        self.parsed.module.visit_with(&mut self);
        self.output
    }

    fn accessor_for(&self, convention: AccessorConvention) -> &'a str {
        match convention {
            AccessorConvention::Global => &self.options.global_function,
            _ => &self.options.accessor.name,
        }
    }

    /// Extraction comment for `values`, forced to block style where required.
    fn comment(&self, values: &[&str], force_block: bool) -> String {
        let Some(style) = self.options.extraction_comment else {
            return String::new();
        };
        let style = if force_block || self.block_comment_depth > 0 {
            CommentStyle::Block
        } else {
            style
        };
        format!(" {}", style.format(&values.join(", ")))
    }

    fn resolve(&mut self, full_match: &str, offset: usize) -> Option<ResolvedKey> {
        let position = self.locator.position(offset);
        self.keys.resolve(full_match, position)
    }

    fn resolve_payload(&mut self, payload: &str, offset: usize) -> ResolvedKey {
        let position = self.locator.position(offset);
        self.keys.resolve_payload(payload, position)
    }

    fn call(&self, accessor: &str, resolved: &ResolvedKey, args: Option<&str>) -> String {
        self.options
            .build_call(accessor, &resolved.key, &resolved.canonical, args)
    }

    fn push_change(
        &mut self,
        start: usize,
        end: usize,
        replacement: String,
        convention: AccessorConvention,
    ) {
        let from = self.locator.position(start);
        let to = self.locator.position(end);
        tracing::debug!(
            file = self.file_path,
            line = from.line,
            column = from.column,
            %replacement,
            "collected change"
        );
        self.output.changes.push(Change {
            file_path: self.file_path.to_string(),
            original: self.source[start..end].to_string(),
            replacement,
            line: from.line,
            column: from.column,
            end_line: to.line,
            end_column: to.column,
            start: Some(start),
            end: Some(end),
            match_context: Some(MatchContext::around(self.source, start, end, CONTEXT_RADIUS)),
        });
        self.output.conventions.insert(convention);
    }

    fn collect_string(&mut self, node: &Str, site: StringSite) {
        let (start, end) = self.parsed.range(node.span);
        let literal = &self.source[start..end];
        if literal.len() < 2 {
            return;
        }
        // quotes are single bytes
        let body = &literal[1..literal.len() - 1];
        let matches = self.options.pattern.find_matches(body);
        if matches.is_empty() {
            return;
        }

        let cooked = |raw: &str| match site {
            StringSite::Expression => cook(raw),
            StringSite::JsxAttribute => raw.to_string(),
        };
        let convention = self.detector.classify(start);
        let accessor = self.accessor_for(convention);
        let force_block = site == StringSite::JsxAttribute;

        let replacement = if matches.len() == 1 && matches[0].spans(body) {
            let resolved = self.resolve_payload(&cooked(&matches[0].payload), start);
            let call = self.call(accessor, &resolved, None);
            format!("{}{}", call, self.comment(&[resolved.canonical.as_str()], force_block))
        } else {
            let mut template = String::from("`");
            let mut values = Vec::with_capacity(matches.len());
            let mut last = 0;
            for m in &matches {
                let resolved = self.resolve_payload(&cooked(&m.payload), start + 1 + m.start);
                template.push_str(&escape_template_segment(
                    &body[last..m.start],
                    site == StringSite::Expression,
                ));
                template.push_str("${");
                template.push_str(&self.call(accessor, &resolved, None));
                template.push('}');
                values.push(resolved.canonical);
                last = m.end;
            }
            template.push_str(&escape_template_segment(
                &body[last..],
                site == StringSite::Expression,
            ));
            template.push('`');

            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            format!("{}{}", template, self.comment(&values, force_block))
        };

        let replacement = match site {
            StringSite::Expression => replacement,
            StringSite::JsxAttribute => format!("{{{}}}", replacement),
        };
        self.push_change(start, end, replacement, convention);
    }

    fn is_skipped_call(&self, node: &CallExpr) -> bool {
        match &node.callee {
            Callee::Import(_) => true,
            Callee::Expr(callee) => {
                let (start, end) = self.parsed.range(callee.span());
                let callee = &self.source[start..end];
                callee == "require" || self.options.is_translation_callee(callee)
            }
            Callee::Super(_) => false,
        }
    }
}

impl Visit for ReplacementCollector<'_, '_> {
    fn visit_expr(&mut self, node: &Expr) {
        match node {
            Expr::Lit(Lit::Str(s)) => self.collect_string(s, StringSite::Expression),
            Expr::Tpl(tpl) => self.collect_template(tpl),
            _ => node.visit_children_with(self),
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.is_skipped_call(node) {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        node.tag.visit_with(self);
    }

    fn visit_ts_enum_decl(&mut self, _node: &TsEnumDecl) {}

    fn visit_ts_type(&mut self, _node: &TsType) {}

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        match &node.value {
            Some(JSXAttrValue::Str(s)) => self.collect_string(s, StringSite::JsxAttribute),
            _ => {
                self.block_comment_depth += 1;
                node.visit_children_with(self);
                self.block_comment_depth -= 1;
            }
        }
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        node.opening.visit_with(self);

        let raw_text_element = matches!(
            &node.opening.name,
            JSXElementName::Ident(ident) if ident.sym == "style" || ident.sym == "script"
        );
        if !raw_text_element {
            self.collect_jsx_children(&node.children);
        }

        if let Some(closing) = &node.closing {
            closing.visit_with(self);
        }
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.collect_jsx_children(&node.children);
    }
}
