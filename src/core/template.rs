//! Single-file component templates.
//!
//! Template syntax is not parsed here. A [`TemplateFrontEnd`] reports the text
//! and attribute sites of a template block, and the matches inside them are
//! rewritten to calls of the template accessor (`$t` by default).

use crate::core::collector::CONTEXT_RADIUS;
use crate::core::collector::escape::{escape_template_segment, single_quoted};
use crate::core::key_manager::{KeyManager, ResolvedKey};
use crate::core::{Change, MatchContext, TransformError, TransformOptions};
use crate::utils::SourceLocator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSiteKind {
    /// Text between tags.
    Text,
    /// A static attribute; the site covers `name="value"`.
    Attribute { name: String },
}

/// A region of a template block that may hold delimiter matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSite {
    pub kind: TemplateSiteKind,
    /// Byte offsets into the template content.
    pub start: usize,
    pub end: usize,
}

/// Parser of a component template language.
pub trait TemplateFrontEnd: Send + Sync {
    /// Text and static attribute sites of `template`, in source order.
    fn sites(&self, template: &str, file_path: &str) -> Result<Vec<TemplateSite>, TransformError>;
}

/// Collect the changes of one template block. Offsets are relative to `template`.
pub fn collect_template_changes(
    template: &str,
    file_path: &str,
    options: &TransformOptions,
    front_end: &dyn TemplateFrontEnd,
    keys: &mut KeyManager<'_>,
    locator: &SourceLocator<'_>,
) -> Result<Vec<Change>, TransformError> {
    let mut changes = Vec::new();

    for site in front_end.sites(template, file_path)? {
        let Some(region) = template.get(site.start..site.end) else {
            tracing::warn!(file = file_path, start = site.start, end = site.end, "template site out of bounds");
            continue;
        };
        match &site.kind {
            TemplateSiteKind::Text => {
                for m in options.pattern.find_matches(region) {
                    let start = site.start + m.start;
                    let Some(resolved) = keys.resolve(&m.full, locator.position(start)) else {
                        continue;
                    };
                    let call = options.build_call(&options.template_function, &resolved.key, &resolved.canonical, None);
                    changes.push(change(
                        template,
                        file_path,
                        locator,
                        start,
                        site.start + m.end,
                        format!("{{{{ {} }}}}", call),
                    ));
                }
            }
            TemplateSiteKind::Attribute { name } => {
                if let Some(replacement) = attribute_replacement(region, name, site.start, options, keys, locator) {
                    changes.push(change(template, file_path, locator, site.start, site.end, replacement));
                }
            }
        }
    }
    Ok(changes)
}

/// `title="___Hi___"` → `:title="$t('Hi')"`.
fn attribute_replacement(
    region: &str,
    name: &str,
    offset: usize,
    options: &TransformOptions,
    keys: &mut KeyManager<'_>,
    locator: &SourceLocator<'_>,
) -> Option<String> {
    let eq = region.find('=')?;
    let quoted = region[eq + 1..].trim_start();
    let quote = quoted.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value_start = region.len() - quoted.len() + 1;
    let value_end = value_start + quoted[1..].find(quote)?;
    let value = &region[value_start..value_end];

    let matches = options.pattern.find_matches(value);
    if matches.is_empty() {
        return None;
    }

    let expression = if matches.len() == 1 && matches[0].spans(value) {
        let resolved = keys.resolve(value, locator.position(offset + value_start))?;
        attribute_call(options, &resolved)
    } else {
        let mut template = String::from("`");
        let mut last = 0;
        for m in &matches {
            let resolved = keys.resolve(&m.full, locator.position(offset + value_start + m.start))?;
            template.push_str(&escape_template_segment(&value[last..m.start], false));
            template.push_str("${");
            template.push_str(&attribute_call(options, &resolved));
            template.push('}');
            last = m.end;
        }
        template.push_str(&escape_template_segment(&value[last..], false));
        template.push('`');
        template
    };

    Some(format!(":{}={}{}{}", name, quote, expression, quote))
}

/// A call safe inside a double-quoted attribute.
fn attribute_call(options: &TransformOptions, resolved: &ResolvedKey) -> String {
    match &options.call_builder {
        Some(builder) => builder(&options.template_function, &resolved.key, &resolved.canonical)
            .replace('"', "&quot;"),
        None => format!("{}({})", options.template_function, single_quoted(&resolved.key)),
    }
}

fn change(
    template: &str,
    file_path: &str,
    locator: &SourceLocator<'_>,
    start: usize,
    end: usize,
    replacement: String,
) -> Change {
    let from = locator.position(start);
    let to = locator.position(end);
    Change {
        file_path: file_path.to_string(),
        original: template[start..end].to_string(),
        replacement,
        line: from.line,
        column: from.column,
        end_line: to.line,
        end_column: to.column,
        start: Some(start),
        end: Some(end),
        match_context: Some(MatchContext::around(template, start, end, CONTEXT_RADIUS)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::KnownTranslations;
    use pretty_assertions::assert_eq;

    /// Reports text between tags and double-quoted static attributes.
    pub(crate) struct TagScanner;

    impl TemplateFrontEnd for TagScanner {
        fn sites(&self, template: &str, _file_path: &str) -> Result<Vec<TemplateSite>, TransformError> {
            let mut sites = Vec::new();
            let mut i = 0;
            while let Some(open) = template[i..].find('<').map(|p| i + p) {
                if open > i {
                    sites.push(TemplateSite {
                        kind: TemplateSiteKind::Text,
                        start: i,
                        end: open,
                    });
                }
                let close = template[open..].find('>').map_or(template.len(), |p| open + p + 1);
                let tag = &template[open..close];
                let mut cursor = 0;
                while let Some(eq) = tag[cursor..].find("=\"").map(|p| cursor + p) {
                    let name_start = tag[..eq].rfind(' ').map_or(0, |p| p + 1);
                    let value_end = tag[eq + 2..].find('"').map_or(tag.len(), |p| eq + 2 + p + 1);
                    let name = &tag[name_start..eq];
                    if !name.starts_with(':') && !name.starts_with('@') {
                        sites.push(TemplateSite {
                            kind: TemplateSiteKind::Attribute { name: name.to_string() },
                            start: open + name_start,
                            end: open + value_end,
                        });
                    }
                    cursor = value_end;
                }
                i = close;
            }
            if i < template.len() {
                sites.push(TemplateSite {
                    kind: TemplateSiteKind::Text,
                    start: i,
                    end: template.len(),
                });
            }
            Ok(sites)
        }
    }

    fn collect(template: &str, options: &TransformOptions) -> Vec<(String, String)> {
        let known = KnownTranslations::new();
        let mut keys = KeyManager::new(&options.pattern, &known, None, None, "App.vue");
        let locator = SourceLocator::new(template, 0);
        collect_template_changes(template, "App.vue", options, &TagScanner, &mut keys, &locator)
            .unwrap()
            .into_iter()
            .map(|c| (c.original, c.replacement))
            .collect()
    }

    #[test]
    fn test_text_becomes_interpolation() {
        assert_eq!(
            collect("\n  <h1>Hey ___Welcome___</h1>\n", &TransformOptions::default()),
            vec![("___Welcome___".to_string(), "{{ $t(\"Welcome\") }}".to_string())]
        );
    }

    #[test]
    fn test_attribute_becomes_binding() {
        assert_eq!(
            collect("<input placeholder=\"___Search___\" />", &TransformOptions::default()),
            vec![(
                "placeholder=\"___Search___\"".to_string(),
                ":placeholder=\"$t('Search')\"".to_string()
            )]
        );
    }

    #[test]
    fn test_partial_attribute_becomes_template_literal() {
        assert_eq!(
            collect("<img alt=\"Logo ___Acme___\">", &TransformOptions::default()),
            vec![(
                "alt=\"Logo ___Acme___\"".to_string(),
                ":alt=\"`Logo ${$t('Acme')}`\"".to_string()
            )]
        );
    }

    #[test]
    fn test_bound_attributes_are_left_alone() {
        assert!(collect("<p :title=\"'___x___'\"></p>", &TransformOptions::default()).is_empty());
    }
}
