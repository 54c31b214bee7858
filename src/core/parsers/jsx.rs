use std::sync::Arc;

use swc_common::{BytePos, FileName, Globals, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput};

use crate::core::TransformError;
use crate::core::parsers::Dialect;

/// A parsed script together with the position its source file starts at.
pub struct ParsedModule {
    pub module: Module,
    pub start_pos: BytePos,
}

impl ParsedModule {
    /// Byte offset of a position relative to the parsed text.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// Byte range of a span relative to the parsed text.
    pub fn range(&self, span: Span) -> (usize, usize) {
        (self.offset(span.lo), self.offset(span.hi))
    }
}

/// Parse a script in the given dialect.
///
/// Recoverable syntax errors are treated as failures: a file that only parses
/// with recovery is not safe to patch.
pub fn parse_script(code: &str, file_path: &str, dialect: Dialect) -> Result<ParsedModule, TransformError> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.to_string());

        let mut parser = Parser::new(dialect.syntax(), StringInput::from(&*source_file), None);

        let module = parser.parse_module().map_err(|e| TransformError::Parse {
            file_path: file_path.to_string(),
            message: e.into_kind().msg().to_string(),
        })?;

        if let Some(error) = parser.take_errors().into_iter().next() {
            return Err(TransformError::Parse {
                file_path: file_path.to_string(),
                message: error.into_kind().msg().to_string(),
            });
        }

        Ok(ParsedModule {
            module,
            start_pos: source_file.start_pos,
        })
    })
}
