//! The transform pipeline of one file.
//!
//! Scripts go through three phases:
//!
//! 1. **Collect**: one walk records every [`Change`] and the accessor
//!    conventions the new calls rely on
//! 2. **Patch**: changes are spliced into the original text
//! 3. **Insert**: the patched text is parsed again and the missing imports and
//!    acquisition statements are added
//!
//! Single-file components are split into blocks first. Script blocks run the
//! three phases, template blocks go through the configured
//! [`TemplateFrontEnd`](crate::core::TemplateFrontEnd), and everything else is
//! copied through untouched.

use serde::Serialize;

use crate::core::collector::ReplacementCollector;
use crate::core::context_detector::scan_functions;
use crate::core::insert::ensure_accessors;
use crate::core::key_manager::KeyManager;
use crate::core::parsers::Dialect;
use crate::core::parsers::jsx::parse_script;
use crate::core::parsers::sfc::{BlockKind, split_blocks};
use crate::core::patch::apply_changes;
use crate::core::template::collect_template_changes;
use crate::core::{
    Change, ExtractedString, KnownTranslations, TransformError, TransformOptions, UsedExistingKey,
};
use crate::utils::SourceLocator;

/// Result of transforming one file.
///
/// `code` is the input unchanged when no change was made or when `error` is set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub code: String,
    pub extracted_strings: Vec<ExtractedString>,
    pub used_existing_keys_list: Vec<UsedExistingKey>,
    pub changes: Vec<Change>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TransformError>,
}

impl TransformOutput {
    pub fn is_modified(&self) -> bool {
        !self.changes.is_empty() && self.error.is_none()
    }
}

/// Transform the source of one file.
///
/// Never panics on malformed input: failures come back in `error` together
/// with the original text.
pub fn transform_source(
    code: &str,
    file_path: &str,
    options: &TransformOptions,
    known: &KnownTranslations,
) -> TransformOutput {
    let result = match Dialect::from_path(file_path) {
        Some(Dialect::SingleFileComponent) => transform_component(code, file_path, options, known),
        Some(dialect) => transform_module(code, file_path, dialect, options, known),
        None => Err(TransformError::UnsupportedFileType {
            file_path: file_path.to_string(),
        }),
    };

    match result {
        Ok(output) => output,
        Err(error) => {
            tracing::debug!(file = file_path, code = error.code(), "{}", error);
            TransformOutput {
                code: code.to_string(),
                error: Some(error),
                ..Default::default()
            }
        }
    }
}

fn transform_module(
    code: &str,
    file_path: &str,
    dialect: Dialect,
    options: &TransformOptions,
    known: &KnownTranslations,
) -> Result<TransformOutput, TransformError> {
    let mut keys = new_key_manager(options, known, file_path);
    let locator = SourceLocator::new(code, 0);
    let script = transform_script(code, file_path, dialect, options, &mut keys, &locator, false)?;
    let (extracted_strings, used_existing_keys_list) = keys.into_records();

    Ok(match script {
        Some(script) => TransformOutput {
            code: script.code,
            extracted_strings,
            used_existing_keys_list,
            changes: script.changes,
            error: None,
        },
        None => TransformOutput {
            code: code.to_string(),
            extracted_strings,
            used_existing_keys_list,
            ..Default::default()
        },
    })
}

struct ScriptOutput {
    code: String,
    changes: Vec<Change>,
}

/// Collect, patch and insert for one script. `None` when nothing matched.
fn transform_script(
    code: &str,
    file_path: &str,
    dialect: Dialect,
    options: &TransformOptions,
    keys: &mut KeyManager<'_>,
    locator: &SourceLocator<'_>,
    embedded: bool,
) -> Result<Option<ScriptOutput>, TransformError> {
    let parsed = parse_script(code, file_path, dialect)?;
    let functions = scan_functions(&parsed, &options.accessor.name);
    let collected =
        ReplacementCollector::new(code, &parsed, &functions, file_path, options, keys, locator).collect();
    if collected.changes.is_empty() {
        return Ok(None);
    }

    let patched = apply_changes(code, &collected.changes, file_path)?;
    let code = ensure_accessors(&patched, file_path, dialect, &collected.conventions, options, embedded)?;
    tracing::debug!(file = file_path, changes = collected.changes.len(), "script transformed");
    Ok(Some(ScriptOutput {
        code,
        changes: collected.changes,
    }))
}

fn transform_component(
    source: &str,
    file_path: &str,
    options: &TransformOptions,
    known: &KnownTranslations,
) -> Result<TransformOutput, TransformError> {
    let blocks = split_blocks(source, file_path)?;
    let mut keys = new_key_manager(options, known, file_path);
    let mut changes = Vec::new();
    // (content_start, content_end, new content), in source order
    let mut edits: Vec<(usize, usize, String)> = Vec::new();

    for block in &blocks {
        let locator = SourceLocator::new(source, block.content_start);
        match &block.kind {
            BlockKind::Script => {
                let dialect = Dialect::from_lang(block.lang());
                let script =
                    transform_script(block.content, file_path, dialect, options, &mut keys, &locator, true)?;
                if let Some(script) = script {
                    edits.push((block.content_start, block.content_end, script.code));
                    changes.extend(script.changes.into_iter().map(|c| c.shifted(block.content_start)));
                }
            }
            BlockKind::Template => {
                let Some(front_end) = options.template_front_end.as_deref() else {
                    tracing::debug!(file = file_path, "no template front end, template left as is");
                    continue;
                };
                let template_changes =
                    collect_template_changes(block.content, file_path, options, front_end, &mut keys, &locator)?;
                if template_changes.is_empty() {
                    continue;
                }
                let patched = apply_changes(block.content, &template_changes, file_path)?;
                edits.push((block.content_start, block.content_end, patched));
                changes.extend(template_changes.into_iter().map(|c| c.shifted(block.content_start)));
            }
            BlockKind::Style | BlockKind::Custom(_) => {}
        }
    }

    let (extracted_strings, used_existing_keys_list) = keys.into_records();
    let code = if edits.is_empty() {
        source.to_string()
    } else {
        reassemble(source, &edits)
    };
    Ok(TransformOutput {
        code,
        extracted_strings,
        used_existing_keys_list,
        changes,
        error: None,
    })
}

/// Replace block contents, copying every byte outside them.
fn reassemble(source: &str, edits: &[(usize, usize, String)]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for (start, end, content) in edits {
        out.push_str(&source[last..*start]);
        out.push_str(content);
        last = *end;
    }
    out.push_str(&source[last..]);
    out
}

fn new_key_manager<'a>(
    options: &'a TransformOptions,
    known: &'a KnownTranslations,
    file_path: &'a str,
) -> KeyManager<'a> {
    KeyManager::new(
        &options.pattern,
        known,
        options.key_resolver.as_ref(),
        options.key_generator.as_ref(),
        file_path,
    )
}
