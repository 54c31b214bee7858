//! Runtime options of a transform run.

use std::fmt;
use std::sync::Arc;

use crate::core::{
    CommentStyle, DelimiterPattern, KeyGenerator, KeyResolver, TemplateFrontEnd, TranslationKey,
};

/// `(accessor, key, canonical_value) -> call expression source`.
///
/// A custom builder never receives interpolation arguments.
pub type CallBuilder = Arc<dyn Fn(&str, &TranslationKey, &str) -> String + Send + Sync>;

/// How the translation accessor is brought into scope.
///
/// With the defaults, a component gets
/// `import { useTranslation } from "react-i18next";` and
/// `const { t } = useTranslation();`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorConfig {
    /// Name the accessor is called by at call sites (`t`).
    pub name: String,
    /// Exported name of the acquisition function (`useTranslation`).
    pub import_name: String,
    /// Module the acquisition function is imported from.
    pub source: String,
    /// Local alias for the imported acquisition function.
    pub alias: Option<String>,
    /// Import the acquisition function as the module's default export.
    pub default_import: bool,
    /// `const { t } = useTranslation()` rather than `const t = useTranslation()`.
    pub destructure: bool,
}

impl AccessorConfig {
    /// Local binding of the acquisition function when a new import is added.
    pub fn local_import_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.import_name)
    }

    /// Source of the statement acquiring the accessor through `callee`.
    pub fn acquisition_statement(&self, callee: &str) -> String {
        if self.destructure {
            format!("const {{ {} }} = {}();", self.name, callee)
        } else {
            format!("const {} = {}();", self.name, callee)
        }
    }
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            name: "t".to_string(),
            import_name: "useTranslation".to_string(),
            source: "react-i18next".to_string(),
            alias: None,
            default_import: false,
            destructure: true,
        }
    }
}

#[derive(Clone)]
pub struct TransformOptions {
    pub pattern: DelimiterPattern,
    pub accessor: AccessorConfig,
    /// Call `global_function` from plain code instead of importing the accessor.
    pub no_import: bool,
    pub global_function: String,
    /// Accessor available inside single-file component templates (`$t`).
    pub template_function: String,
    pub call_builder: Option<CallBuilder>,
    pub key_resolver: Option<KeyResolver>,
    pub key_generator: Option<KeyGenerator>,
    /// Append the canonical value as a comment after each replacement.
    pub extraction_comment: Option<CommentStyle>,
    pub template_front_end: Option<Arc<dyn TemplateFrontEnd>>,
}

impl TransformOptions {
    /// Build the call expression for `key`, attaching `args` with the default builder.
    pub fn build_call(
        &self,
        accessor: &str,
        key: &TranslationKey,
        canonical: &str,
        args: Option<&str>,
    ) -> String {
        if let Some(builder) = &self.call_builder {
            return builder(accessor, key, canonical);
        }
        match args {
            Some(args) => format!("{}({}, {})", accessor, key.to_js_literal(), args),
            None => format!("{}({})", accessor, key.to_js_literal()),
        }
    }

    /// Names whose call arguments are never extracted.
    pub fn is_translation_callee(&self, callee: &str) -> bool {
        callee == self.accessor.name || callee == self.global_function || callee == self.template_function
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            pattern: DelimiterPattern::default(),
            accessor: AccessorConfig::default(),
            no_import: false,
            global_function: "i18n.t".to_string(),
            template_function: "$t".to_string(),
            call_builder: None,
            key_resolver: None,
            key_generator: None,
            extraction_comment: None,
            template_front_end: None,
        }
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("pattern", &self.pattern.as_str())
            .field("accessor", &self.accessor)
            .field("no_import", &self.no_import)
            .field("global_function", &self.global_function)
            .field("template_function", &self.template_function)
            .field("call_builder", &self.call_builder.is_some())
            .field("key_resolver", &self.key_resolver.is_some())
            .field("key_generator", &self.key_generator.is_some())
            .field("extraction_comment", &self.extraction_comment)
            .field("template_front_end", &self.template_front_end.is_some())
            .finish()
    }
}
