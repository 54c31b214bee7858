use swc_common::Spanned;
use swc_ecma_ast::{Ident, ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem};

use crate::core::AccessorConfig;
use crate::core::context_detector::{decl_binds, is_directive, stmt_binds};
use crate::core::parsers::jsx::ParsedModule;

/// What the module already provides for the accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ModuleImports {
    /// Local name of an existing import of the acquisition function.
    pub equivalent: Option<String>,
    /// Offset past the last specifier of a named import that can take one more.
    pub merge_at: Option<usize>,
    /// Where a new import (or a module scope acquisition) goes.
    pub insert_at: usize,
    pub quote: char,
    /// A module scope declaration or import already binds the accessor name.
    pub binds_accessor: bool,
}

impl ModuleImports {
    pub fn scan(text: &str, parsed: &ParsedModule, accessor: &AccessorConfig, skip_leading_newline: bool) -> Self {
        let mut scan = ModuleImports {
            equivalent: None,
            merge_at: None,
            insert_at: leading_offset(text, skip_leading_newline),
            quote: '"',
            binds_accessor: false,
        };
        let mut first_import = true;
        let mut leading = true;

        for item in &parsed.module.body {
            let is_leading = match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    if first_import {
                        let (start, _) = parsed.range(import.src.span);
                        if text[start..].starts_with('\'') {
                            scan.quote = '\'';
                        }
                        first_import = false;
                    }
                    scan.import(import, parsed, accessor);
                    true
                }
                ModuleItem::Stmt(stmt) => {
                    scan.binds_accessor |= stmt_binds(stmt, &accessor.name);
                    is_directive(stmt)
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    scan.binds_accessor |= decl_binds(&export.decl, &accessor.name);
                    false
                }
                ModuleItem::ModuleDecl(_) => false,
            };

            leading &= is_leading;
            if leading {
                let (_, end) = parsed.range(item.span());
                scan.insert_at = end;
            }
        }
        scan
    }

    fn import(&mut self, import: &ImportDecl, parsed: &ParsedModule, accessor: &AccessorConfig) {
        if import.specifiers.iter().any(|s| local(s).sym == accessor.name) {
            self.binds_accessor = true;
        }

        if import.type_only || import.src.value.as_str() != Some(accessor.source.as_str()) {
            return;
        }

        for specifier in &import.specifiers {
            let provides = match specifier {
                ImportSpecifier::Default(_) => accessor.default_import,
                ImportSpecifier::Named(named) if !named.is_type_only && !accessor.default_import => {
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => Some(ident.sym.to_string()),
                        Some(ModuleExportName::Str(s)) => s.value.as_str().map(str::to_string),
                        None => Some(named.local.sym.to_string()),
                    };
                    imported.as_deref() == Some(accessor.import_name.as_str())
                }
                _ => false,
            };
            if provides && self.equivalent.is_none() {
                self.equivalent = Some(local(specifier).sym.to_string());
            }
        }

        if !accessor.default_import && self.merge_at.is_none() {
            self.merge_at = import
                .specifiers
                .iter()
                .filter(|s| matches!(s, ImportSpecifier::Named(_)))
                .map(|s| parsed.range(s.span()).1)
                .max();
        }
    }
}

/// Specifier appended to an existing named import.
pub(super) fn merged_specifier(accessor: &AccessorConfig) -> String {
    match &accessor.alias {
        Some(alias) => format!(", {} as {}", accessor.import_name, alias),
        None => format!(", {}", accessor.import_name),
    }
}

pub(super) fn import_statement(accessor: &AccessorConfig, quote: char) -> String {
    let source = format!("{}{}{}", quote, accessor.source, quote);
    if accessor.default_import {
        return format!("import {} from {};", accessor.local_import_name(), source);
    }
    match &accessor.alias {
        Some(alias) => format!("import {{ {} as {} }} from {};", accessor.import_name, alias, source),
        None => format!("import {{ {} }} from {};", accessor.import_name, source),
    }
}

/// Offset after a shebang line, or after the line break opening an embedded block.
fn leading_offset(text: &str, skip_leading_newline: bool) -> usize {
    if text.starts_with("#!") {
        return text.find('\n').unwrap_or(text.len());
    }
    if skip_leading_newline {
        if text.starts_with("\r\n") {
            return 2;
        }
        if text.starts_with('\n') {
            return 1;
        }
    }
    0
}

fn local(specifier: &ImportSpecifier) -> &Ident {
    match specifier {
        ImportSpecifier::Named(s) => &s.local,
        ImportSpecifier::Default(s) => &s.local,
        ImportSpecifier::Namespace(s) => &s.local,
    }
}
