//! Import and accessor acquisition insertion.
//!
//! Runs on the patched text: the patched tree is parsed again, every function
//! that received a call through its own accessor gets an acquisition statement
//! unless one is already in scope, and the acquisition function is imported
//! when at least one statement was added.

mod accessor;
mod imports;

use std::collections::BTreeSet;

use crate::core::context_detector::{
    AccessorConvention, FunctionBody, FunctionInfo, FunctionRole, scan_functions,
};
use crate::core::parsers::Dialect;
use crate::core::parsers::jsx::parse_script;
use crate::core::{TransformError, TransformOptions};
use crate::utils::is_at_line_start;

use imports::{ModuleImports, import_statement, merged_specifier};

/// Replacement of `start..end` by `text`; empty ranges insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Insertion {
    fn at(offset: usize, text: String) -> Self {
        Self {
            start: offset,
            end: offset,
            text,
        }
    }
}

/// Add the imports and acquisitions `conventions` need to `text`.
///
/// `embedded` marks a script block of a single-file component, where a new
/// import goes after the line break opening the block.
pub fn ensure_accessors(
    text: &str,
    file_path: &str,
    dialect: Dialect,
    conventions: &BTreeSet<AccessorConvention>,
    options: &TransformOptions,
    embedded: bool,
) -> Result<String, TransformError> {
    if conventions.iter().all(|c| *c == AccessorConvention::Global) {
        return Ok(text.to_string());
    }

    let parsed = parse_script(text, file_path, dialect)?;
    let accessor = &options.accessor;
    let functions = scan_functions(&parsed, &accessor.name);
    let imports = ModuleImports::scan(text, &parsed, accessor, embedded);

    if imports.binds_accessor {
        tracing::debug!(file = file_path, accessor = %accessor.name, "accessor bound at module scope");
        return Ok(text.to_string());
    }

    let callee = imports
        .equivalent
        .clone()
        .unwrap_or_else(|| accessor.local_import_name().to_string());
    let statement = accessor.acquisition_statement(&callee);

    // planning order: import first, so it lands before a module scope
    // acquisition at the same offset
    let mut planned: Vec<Insertion> = Vec::new();
    for convention in conventions {
        match *convention {
            AccessorConvention::Function(ordinal) => {
                let Some(function) = functions.get(ordinal) else {
                    tracing::warn!(file = file_path, ordinal, "function missing from patched tree");
                    continue;
                };
                if function.role(true) == FunctionRole::Plain {
                    tracing::debug!(file = file_path, ordinal, "not a component or hook, skipped");
                    continue;
                }
                if function.param_binds_accessor || body_binds_accessor(function) {
                    tracing::debug!(file = file_path, ordinal, "accessor already bound");
                    continue;
                }
                if let Some(insertion) = accessor::acquisition(text, function, &statement) {
                    planned.push(insertion);
                }
            }
            AccessorConvention::ModuleScope => {
                planned.push(line_insertion(text, imports.insert_at, &statement));
            }
            AccessorConvention::Global => {}
        }
    }

    if planned.is_empty() {
        return Ok(text.to_string());
    }
    if imports.equivalent.is_none() {
        let insertion = match imports.merge_at {
            Some(offset) => Insertion::at(offset, merged_specifier(accessor)),
            None => line_insertion(text, imports.insert_at, &import_statement(accessor, imports.quote)),
        };
        planned.insert(0, insertion);
    }

    tracing::debug!(file = file_path, count = planned.len(), "applying insertions");
    Ok(apply_insertions(text, planned))
}

fn body_binds_accessor(function: &FunctionInfo) -> bool {
    matches!(
        function.body,
        Some(FunctionBody::Block {
            binds_accessor: true,
            ..
        })
    )
}

/// A whole line holding `line`, at `offset`.
fn line_insertion(text: &str, offset: usize, line: &str) -> Insertion {
    if is_at_line_start(text, offset) {
        Insertion::at(offset, format!("{}\n", line))
    } else {
        Insertion::at(offset, format!("\n{}", line))
    }
}

/// Apply insertions in one descending pass; equal offsets keep planning order.
fn apply_insertions(text: &str, planned: Vec<Insertion>) -> String {
    let mut ordered: Vec<(usize, Insertion)> = planned.into_iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| b.start.cmp(&a.start).then(ib.cmp(ia)));

    let mut out = text.to_string();
    for (_, insertion) in ordered {
        out.replace_range(insertion.start..insertion.end, &insertion.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ensure(code: &str, conventions: &[AccessorConvention], options: &TransformOptions) -> String {
        let conventions: BTreeSet<_> = conventions.iter().copied().collect();
        ensure_accessors(code, "a.tsx", Dialect::Tsx, &conventions, options, false).unwrap()
    }

    #[test]
    fn test_component_gets_import_and_acquisition() {
        let code = "import React from \"react\";\n\nexport function Title() {\n  return <h1>{t(\"Hi\")}</h1>;\n}\n";
        assert_eq!(
            ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default()),
            "import React from \"react\";\nimport { useTranslation } from \"react-i18next\";\n\nexport function Title() {\n  const { t } = useTranslation();\n  return <h1>{t(\"Hi\")}</h1>;\n}\n"
        );
    }

    #[test]
    fn test_existing_aliased_import_is_reused() {
        let code = "import { useTranslation as useT } from \"react-i18next\";\nconst A = () => <p>{t(\"a\")}</p>;";
        assert_eq!(
            ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default()),
            "import { useTranslation as useT } from \"react-i18next\";\nconst A = () => {\n  const { t } = useT();\n  return <p>{t(\"a\")}</p>;\n};"
        );
    }

    #[test]
    fn test_merges_into_named_import() {
        let code = "import { Trans } from 'react-i18next';\nfunction A() {\n  return <Trans>{t(\"a\")}</Trans>;\n}";
        let out = ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default());
        assert!(out.starts_with("import { Trans, useTranslation } from 'react-i18next';\n"));
        assert_eq!(out.matches("import").count(), 1);
    }

    #[test]
    fn test_existing_acquisition_is_not_duplicated() {
        let code = "import { useTranslation } from \"react-i18next\";\nfunction A() {\n  const { t } = useTranslation();\n  return <p>{t(\"a\")}</p>;\n}";
        assert_eq!(
            ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default()),
            code
        );
    }

    #[test]
    fn test_accessor_parameter_is_respected() {
        let code = "function A({ t }) {\n  return <p>{t(\"a\")}</p>;\n}";
        assert_eq!(
            ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default()),
            code
        );
    }

    #[test]
    fn test_unverified_hook_gets_nothing() {
        let code = "function useThing() {\n  return 1;\n}";
        assert_eq!(
            ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default()),
            code
        );
    }

    #[test]
    fn test_module_scope_after_imports() {
        let code = "\"use client\";\nconst label = t(\"a\");\n";
        assert_eq!(
            ensure(code, &[AccessorConvention::ModuleScope], &TransformOptions::default()),
            "\"use client\";\nimport { useTranslation } from \"react-i18next\";\nconst { t } = useTranslation();\nconst label = t(\"a\");\n"
        );
    }

    #[test]
    fn test_module_scope_at_file_start() {
        let code = "const label = t(\"a\");\n";
        assert_eq!(
            ensure(code, &[AccessorConvention::ModuleScope], &TransformOptions::default()),
            "import { useTranslation } from \"react-i18next\";\nconst { t } = useTranslation();\nconst label = t(\"a\");\n"
        );
    }

    #[test]
    fn test_global_convention_is_untouched() {
        let code = "const label = i18n.t(\"a\");";
        assert_eq!(ensure(code, &[AccessorConvention::Global], &TransformOptions::default()), code);
    }

    #[test]
    fn test_nested_function_goes_to_outer_component() {
        let code = "function List({ items }) {\n  return <ul>{items.map((i) => <li>{t(\"x\")}</li>)}</ul>;\n}";
        let out = ensure(code, &[AccessorConvention::Function(0)], &TransformOptions::default());
        assert!(out.contains("function List({ items }) {\n  const { t } = useTranslation();\n  return <ul>"));
        assert_eq!(out.matches("useTranslation();").count(), 1);
    }

    #[test]
    fn test_insertions_keep_planning_order_at_equal_offsets() {
        let planned = vec![Insertion::at(0, "a".to_string()), Insertion::at(0, "b".to_string())];
        assert_eq!(apply_insertions("x", planned), "abx");
    }
}
