//! Context detection: which accessor convention applies at a location.
//!
//! Functions are identified by their pre-order ordinal. Replacements never add
//! or remove functions, so ordinals collected from the original tree name the
//! same functions in the patched tree.

use std::collections::HashMap;

use swc_ecma_ast::{
    ArrowExpr, BinaryOp, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, ClassMethod, ClassProp,
    Decl, Expr, FnDecl, FnExpr, Function, KeyValueProp, MethodProp, ObjectPatProp, Pat, PropName,
    ReturnStmt, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parsers::jsx::ParsedModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionRole {
    /// Returns markup.
    Component,
    /// Named `useXxx`.
    Hook,
    Plain,
}

/// Where the accessor used at a call site comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessorConvention {
    /// Acquired at the top of the function with this ordinal.
    Function(usize),
    /// Acquired once at module scope.
    ModuleScope,
    /// The global function is called directly; nothing is imported.
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionBody {
    Block {
        /// Offset of the opening `{`.
        open: usize,
        /// Offset of the closing `}`.
        close: usize,
        /// End of the last leading directive (`"use memo";`).
        directives_end: Option<usize>,
        /// Start of the first statement after the directives.
        first_stmt: Option<usize>,
        /// A top-level declaration in the body binds the accessor.
        binds_accessor: bool,
    },
    Expression {
        start: usize,
        end: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub start: usize,
    pub end: usize,
    pub name: Option<String>,
    /// Ordinal of the enclosing function.
    pub parent: Option<usize>,
    pub returns_markup: bool,
    pub calls_accessor: bool,
    pub param_binds_accessor: bool,
    /// A class method or a function-valued class property.
    pub class_member: bool,
    /// `None` for declarations without a body (overloads, `declare`).
    pub body: Option<FunctionBody>,
}

impl FunctionInfo {
    /// Role of the function. With `require_accessor_call`, a hook must also
    /// call the accessor, possibly from a nested function.
    ///
    /// Class members are always plain: hooks cannot run inside them.
    pub fn role(&self, require_accessor_call: bool) -> FunctionRole {
        if self.class_member {
            FunctionRole::Plain
        } else if self.returns_markup {
            FunctionRole::Component
        } else if self.name.as_deref().is_some_and(is_hook_name)
            && (!require_accessor_call || self.calls_accessor)
        {
            FunctionRole::Hook
        } else {
            FunctionRole::Plain
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True if `offset` lies in the body rather than the parameter list.
    pub fn body_contains(&self, offset: usize) -> bool {
        match &self.body {
            Some(FunctionBody::Block { open, close, .. }) => *open <= offset && offset <= *close,
            Some(FunctionBody::Expression { start, end }) => *start <= offset && offset < *end,
            None => false,
        }
    }
}

/// `use` followed by an uppercase letter, a digit, or nothing.
pub fn is_hook_name(name: &str) -> bool {
    match name.strip_prefix("use") {
        Some(rest) => rest
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        None => false,
    }
}

/// Collect every function of a module in pre-order.
pub fn scan_functions(parsed: &ParsedModule, accessor: &str) -> Vec<FunctionInfo> {
    let mut scanner = FunctionScanner {
        parsed,
        accessor,
        functions: Vec::new(),
        stack: Vec::new(),
        pending_name: None,
    };
    parsed.module.visit_with(&mut scanner);
    scanner.functions
}

struct FunctionScanner<'a> {
    parsed: &'a ParsedModule,
    accessor: &'a str,
    functions: Vec<FunctionInfo>,
    stack: Vec<usize>,
    /// Name given to the next function by its declaration site.
    pending_name: Option<String>,
}

impl FunctionScanner<'_> {
    fn enter(&mut self, info: FunctionInfo) -> usize {
        let index = self.functions.len();
        self.functions.push(info);
        self.stack.push(index);
        index
    }

    fn mark_class_member(&mut self, ordinal: usize) {
        if let Some(info) = self.functions.get_mut(ordinal) {
            info.class_member = true;
        }
    }

    fn block_body(&self, block: &BlockStmt) -> FunctionBody {
        let (open, close) = self.parsed.range(block.span);
        let mut directives_end = None;
        let mut first_stmt = None;

        for stmt in &block.stmts {
            let (start, end) = self.parsed.range(stmt_span(stmt));
            if first_stmt.is_none() && is_directive(stmt) {
                directives_end = Some(end);
            } else if first_stmt.is_none() {
                first_stmt = Some(start);
            }
        }

        FunctionBody::Block {
            open,
            close: close.saturating_sub(1),
            directives_end,
            first_stmt,
            binds_accessor: block.stmts.iter().any(|s| stmt_binds(s, self.accessor)),
        }
    }
}

impl Visit for FunctionScanner<'_> {
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.pending_name = Some(node.ident.sym.to_string());
        node.function.visit_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        if let Some(ident) = &node.ident {
            self.pending_name = Some(ident.sym.to_string());
        }
        node.function.visit_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        node.name.visit_with(self);
        if let (Pat::Ident(binding), Some(init)) = (&node.name, &node.init)
            && is_function_expr(init)
        {
            self.pending_name = Some(binding.id.sym.to_string());
        }
        node.init.visit_with(self);
        self.pending_name = None;
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        node.key.visit_with(self);
        if is_function_expr(&node.value) {
            self.pending_name = prop_name(&node.key);
        }
        node.value.visit_with(self);
        self.pending_name = None;
    }

    fn visit_method_prop(&mut self, node: &MethodProp) {
        node.key.visit_with(self);
        self.pending_name = prop_name(&node.key);
        node.function.visit_with(self);
    }

    fn visit_class_method(&mut self, node: &ClassMethod) {
        node.key.visit_with(self);
        self.pending_name = prop_name(&node.key);
        let ordinal = self.functions.len();
        node.function.visit_with(self);
        self.mark_class_member(ordinal);
    }

    fn visit_class_prop(&mut self, node: &ClassProp) {
        node.key.visit_with(self);
        let ordinal = self.functions.len();
        let is_function = node.value.as_deref().is_some_and(is_function_expr);
        if is_function {
            self.pending_name = prop_name(&node.key);
        }
        node.value.visit_with(self);
        self.pending_name = None;
        if is_function {
            self.mark_class_member(ordinal);
        }
    }

    fn visit_function(&mut self, node: &Function) {
        let (start, end) = self.parsed.range(node.span);
        let info = FunctionInfo {
            start,
            end,
            name: self.pending_name.take(),
            parent: self.stack.last().copied(),
            returns_markup: false,
            calls_accessor: false,
            param_binds_accessor: node.params.iter().any(|p| pat_binds(&p.pat, self.accessor)),
            class_member: false,
            body: node.body.as_ref().map(|b| self.block_body(b)),
        };
        self.enter(info);
        node.visit_children_with(self);
        self.stack.pop();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let (start, end) = self.parsed.range(node.span);
        let (body, returns_markup) = match &*node.body {
            BlockStmtOrExpr::BlockStmt(block) => (self.block_body(block), false),
            BlockStmtOrExpr::Expr(expr) => {
                let (start, end) = self.parsed.range(expr_span(expr));
                (FunctionBody::Expression { start, end }, is_markup(expr))
            }
        };
        let info = FunctionInfo {
            start,
            end,
            name: self.pending_name.take(),
            parent: self.stack.last().copied(),
            returns_markup,
            calls_accessor: false,
            param_binds_accessor: node.params.iter().any(|p| pat_binds(p, self.accessor)),
            class_member: false,
            body: Some(body),
        };
        self.enter(info);
        node.visit_children_with(self);
        self.stack.pop();
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) {
        if let (Some(&current), Some(arg)) = (self.stack.last(), &node.arg)
            && is_markup(arg)
        {
            self.functions[current].returns_markup = true;
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Ident(ident) = &**callee
            && ident.sym == self.accessor
        {
            // enclosing functions close over the call too
            for &index in &self.stack {
                self.functions[index].calls_accessor = true;
            }
        }
        node.visit_children_with(self);
    }
}

/// Memoized classification of locations into accessor conventions.
pub struct ContextDetector<'a> {
    functions: &'a [FunctionInfo],
    no_import: bool,
    cache: HashMap<usize, AccessorConvention>,
}

impl<'a> ContextDetector<'a> {
    pub fn new(functions: &'a [FunctionInfo], no_import: bool) -> Self {
        Self {
            functions,
            no_import,
            cache: HashMap::new(),
        }
    }

    /// Ordinal of the innermost function whose body contains `offset`.
    ///
    /// Parameter lists belong to the surrounding scope: a default value cannot
    /// see bindings made in the body.
    pub fn enclosing_function(&self, offset: usize) -> Option<usize> {
        // pre-order: the deepest containing function comes last
        self.functions.iter().rposition(|f| f.body_contains(offset))
    }

    pub fn classify(&mut self, offset: usize) -> AccessorConvention {
        let Some(innermost) = self.enclosing_function(offset) else {
            return self.plain_convention();
        };
        if let Some(cached) = self.cache.get(&innermost) {
            return *cached;
        }

        // the outermost component or hook owns the acquisition
        let mut owner = None;
        let mut current = Some(innermost);
        while let Some(index) = current {
            let info = &self.functions[index];
            if info.role(false) != FunctionRole::Plain && info.body_contains(offset) {
                owner = Some(index);
            }
            current = info.parent;
        }

        let convention = match owner {
            Some(index) => AccessorConvention::Function(index),
            None => self.plain_convention(),
        };
        tracing::debug!(function = innermost, ?convention, "classified");
        self.cache.insert(innermost, convention);
        convention
    }

    fn plain_convention(&self) -> AccessorConvention {
        if self.no_import {
            AccessorConvention::Global
        } else {
            AccessorConvention::ModuleScope
        }
    }
}

fn is_function_expr(expr: &Expr) -> bool {
    match expr {
        Expr::Arrow(_) | Expr::Fn(_) => true,
        Expr::Paren(paren) => is_function_expr(&paren.expr),
        _ => false,
    }
}

/// JSX, possibly behind parentheses, a conditional or a logical operator.
pub fn is_markup(expr: &Expr) -> bool {
    match expr {
        Expr::JSXElement(_) | Expr::JSXFragment(_) => true,
        Expr::Paren(paren) => is_markup(&paren.expr),
        Expr::Cond(cond) => is_markup(&cond.cons) || is_markup(&cond.alt),
        Expr::Bin(bin)
            if matches!(
                bin.op,
                BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing
            ) =>
        {
            is_markup(&bin.left) || is_markup(&bin.right)
        }
        Expr::TsAs(e) => is_markup(&e.expr),
        Expr::TsSatisfies(e) => is_markup(&e.expr),
        Expr::TsNonNull(e) => is_markup(&e.expr),
        _ => false,
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

/// True if a binding pattern introduces `name`.
pub fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(binding) => binding.id.sym == name,
        Pat::Array(array) => array.elems.iter().flatten().any(|p| pat_binds(p, name)),
        Pat::Rest(rest) => pat_binds(&rest.arg, name),
        Pat::Assign(assign) => pat_binds(&assign.left, name),
        Pat::Object(object) => object.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => pat_binds(&kv.value, name),
            ObjectPatProp::Assign(assign) => assign.key.id.sym == name,
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        _ => false,
    }
}

/// True if a statement declares `name` (variable, function or class).
pub fn stmt_binds(stmt: &Stmt, name: &str) -> bool {
    match stmt {
        Stmt::Decl(decl) => decl_binds(decl, name),
        _ => false,
    }
}

pub fn decl_binds(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Var(var) => var.decls.iter().any(|d| pat_binds(&d.name, name)),
        Decl::Fn(f) => f.ident.sym == name,
        Decl::Class(c) => c.ident.sym == name,
        _ => false,
    }
}

/// `"use strict";` and other string expression statements.
pub fn is_directive(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Expr(e) if matches!(&*e.expr, Expr::Lit(swc_ecma_ast::Lit::Str(_))))
}

fn stmt_span(stmt: &Stmt) -> swc_common::Span {
    use swc_common::Spanned;
    stmt.span()
}

fn expr_span(expr: &Expr) -> swc_common::Span {
    use swc_common::Spanned;
    expr.span()
}
