use crate::core::context_detector::{FunctionBody, FunctionInfo};
use crate::utils::{indent_unit, is_at_line_start, line_indent};

use super::Insertion;

/// Insertion putting `statement` first in the body of `function`, after any
/// directive prologue.
pub(super) fn acquisition(text: &str, function: &FunctionInfo, statement: &str) -> Option<Insertion> {
    let fn_indent = line_indent(text, function.start);
    let synthesized = format!("{}{}", fn_indent, indent_unit(fn_indent));

    match function.body.as_ref()? {
        FunctionBody::Block {
            open,
            close,
            directives_end,
            first_stmt,
            ..
        } => {
            let anchor = directives_end.unwrap_or(open + 1);
            match first_stmt {
                Some(first) if is_at_line_start(text, *first) => {
                    let indent = line_indent(text, *first);
                    Some(Insertion::at(anchor, format!("\n{}{}", indent, statement)))
                }
                Some(first) => {
                    // first statement shares a line with `{` or the prologue
                    Some(Insertion {
                        start: anchor,
                        end: *first,
                        text: format!("\n{0}{1}\n{0}", synthesized, statement),
                    })
                }
                None if directives_end.is_some() => {
                    let indent = line_indent(text, anchor);
                    Some(Insertion::at(anchor, format!("\n{}{}", indent, statement)))
                }
                None => Some(Insertion {
                    start: open + 1,
                    end: *close,
                    text: format!("\n{}{}\n{}", synthesized, statement, fn_indent),
                }),
            }
        }
        FunctionBody::Expression { start, end } => {
            let expr = &text[*start..*end];
            Some(Insertion {
                start: *start,
                end: *end,
                text: format!(
                    "{{\n{0}{1}\n{0}return {2};\n{3}}}",
                    synthesized, statement, expr, fn_indent
                ),
            })
        }
    }
}
