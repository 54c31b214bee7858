//! Source parsers.
//!
//! - `jsx`: ECMAScript/TypeScript/JSX parser (uses swc for AST generation)
//! - `sfc`: single-file component block splitter

pub mod jsx;
pub mod sfc;

use std::path::Path;

use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};

/// Source language selected from a file extension or a block's `lang` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// ECMAScript with JSX.
    Ecma,
    TypeScript,
    Tsx,
    /// Multi-block single-file component (`.vue`).
    SingleFileComponent,
}

impl Dialect {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?;
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Ecma),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            "vue" => Some(Dialect::SingleFileComponent),
            _ => None,
        }
    }

    /// Dialect of an embedded script block from its `lang` attribute.
    pub fn from_lang(lang: &str) -> Self {
        match lang {
            "ts" => Dialect::TypeScript,
            "tsx" => Dialect::Tsx,
            _ => Dialect::Ecma,
        }
    }

    pub fn syntax(self) -> Syntax {
        match self {
            Dialect::TypeScript => Syntax::Typescript(TsSyntax {
                decorators: true,
                ..Default::default()
            }),
            Dialect::Tsx => Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: true,
                ..Default::default()
            }),
            Dialect::Ecma | Dialect::SingleFileComponent => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(Dialect::from_path("src/App.jsx"), Some(Dialect::Ecma));
        assert_eq!(Dialect::from_path("lib/util.mjs"), Some(Dialect::Ecma));
        assert_eq!(Dialect::from_path("lib/util.cts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::from_path("App.tsx"), Some(Dialect::Tsx));
        assert_eq!(
            Dialect::from_path("Card.vue"),
            Some(Dialect::SingleFileComponent)
        );
        assert_eq!(Dialect::from_path("styles.css"), None);
        assert_eq!(Dialect::from_path("Makefile"), None);
    }

    #[test]
    fn test_dialect_from_lang() {
        assert_eq!(Dialect::from_lang("ts"), Dialect::TypeScript);
        assert_eq!(Dialect::from_lang("tsx"), Dialect::Tsx);
        assert_eq!(Dialect::from_lang("js"), Dialect::Ecma);
    }
}
