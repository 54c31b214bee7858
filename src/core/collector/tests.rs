use pretty_assertions::assert_eq;

use super::*;
use crate::core::context_detector::scan_functions;
use crate::core::parsers::{Dialect, jsx::parse_script};
use crate::core::{DelimiterPattern, ExtractedString, KnownTranslations, TranslationKey};

struct Collected {
    changes: Vec<Change>,
    conventions: Vec<AccessorConvention>,
    extracted: Vec<ExtractedString>,
}

impl Collected {
    fn replacements(&self) -> Vec<(&str, &str)> {
        self.changes
            .iter()
            .map(|c| (c.original.as_str(), c.replacement.as_str()))
            .collect()
    }
}

fn collect_with(code: &str, options: &TransformOptions) -> Collected {
    let parsed = parse_script(code, "test.tsx", Dialect::Tsx).unwrap();
    let functions = scan_functions(&parsed, &options.accessor.name);
    let known = KnownTranslations::new();
    let mut keys = KeyManager::new(
        &options.pattern,
        &known,
        options.key_resolver.as_ref(),
        options.key_generator.as_ref(),
        "test.tsx",
    );
    let locator = SourceLocator::new(code, 0);
    let output = ReplacementCollector::new(
        code,
        &parsed,
        &functions,
        "test.tsx",
        options,
        &mut keys,
        &locator,
    )
    .collect();
    let (extracted, _) = keys.into_records();
    Collected {
        changes: output.changes,
        conventions: output.conventions.into_iter().collect(),
        extracted,
    }
}

fn collect(code: &str) -> Collected {
    collect_with(code, &TransformOptions::default())
}

fn lazy_options() -> TransformOptions {
    TransformOptions {
        pattern: DelimiterPattern::new("___(.+?)___").unwrap(),
        ..Default::default()
    }
}

#[test]
fn test_plain_string_whole_match() {
    let code = r#"const title = "___Dashboard___";"#;
    let collected = collect(code);

    assert_eq!(
        collected.replacements(),
        vec![(r#""___Dashboard___""#, r#"t("Dashboard")"#)]
    );
    let change = &collected.changes[0];
    assert_eq!((change.line, change.column), (1, 15));
    assert_eq!((change.end_line, change.end_column), (1, 32));
    assert_eq!(&code[change.start.unwrap()..change.end.unwrap()], change.original);
    assert_eq!(collected.conventions, vec![AccessorConvention::ModuleScope]);
}

#[test]
fn test_plain_string_partial_match_becomes_template() {
    let collected = collect(r#"const a = 'Hello ___World___ `x` ${y}';"#);
    assert_eq!(
        collected.replacements()[0].1,
        r#"`Hello ${t("World")} \`x\` \${y}`"#
    );
}

#[test]
fn test_plain_string_multiple_matches() {
    let collected = collect_with(r#"const a = "___Yes___ / ___No___";"#, &lazy_options());
    assert_eq!(
        collected.replacements()[0].1,
        r#"`${t("Yes")} / ${t("No")}`"#
    );
    assert_eq!(collected.extracted.len(), 2);
}

#[test]
fn test_escaped_string_uses_cooked_key() {
    let collected = collect(r#"const a = "___Say \"hi\"___";"#);
    assert_eq!(collected.replacements()[0].1, r#"t("Say \"hi\"")"#);
    assert_eq!(collected.extracted[0].value, "Say \"hi\"");
}

#[test]
fn test_escaped_newline_in_string() {
    let collected = collect(r#"const a = "___Line1\nLine2___";"#);
    assert_eq!(collected.replacements()[0].1, r#"t("Line1\nLine2")"#);
    assert_eq!(collected.extracted[0].value, "Line1\nLine2");

    let collected = collect(r#"const a = "Hi ___Line1\nLine2___";"#);
    assert_eq!(collected.replacements()[0].1, r#"`Hi ${t("Line1\nLine2")}`"#);
    assert_eq!(collected.extracted[0].value, "Line1\nLine2");
}

#[test]
fn test_escaped_newline_in_template() {
    let collected = collect(r#"const a = `___Line1\nLine2 ${name}___`;"#);
    assert_eq!(
        collected.replacements()[0].1,
        r#"t("Line1\nLine2 {arg1}", { arg1: name })"#
    );
    assert_eq!(collected.extracted[0].value, "Line1\nLine2 {arg1}");
}

#[test]
fn test_literal_braces_are_not_arguments() {
    let collected = collect(r#"const a = "___User: {userName}___";"#);
    assert_eq!(collected.replacements()[0].1, r#"t("User: {userName}")"#);
    assert_eq!(collected.extracted[0].value, "User: {userName}");
}

#[test]
fn test_jsx_attribute_string() {
    let collected = collect(r#"function S() { return <input placeholder="___Search___" />; }"#);
    assert_eq!(
        collected.replacements(),
        vec![(r#""___Search___""#, r#"{t("Search")}"#)]
    );
    assert_eq!(collected.conventions, vec![AccessorConvention::Function(0)]);
}

#[test]
fn test_jsx_attribute_partial_match_escapes_backslash() {
    let collected = collect(r#"const a = <img alt="C:\dir ___photo___" />;"#);
    assert_eq!(
        collected.replacements()[0].1,
        r#"{`C:\\dir ${t("photo")}`}"#
    );
}

#[test]
fn test_jsx_text() {
    let collected = collect("function H() {\n  return <h1>\n    ___Welcome___\n  </h1>;\n}");
    assert_eq!(
        collected.replacements(),
        vec![("___Welcome___", r#"{t("Welcome")}"#)]
    );
    assert_eq!(collected.changes[0].line, 3);
    assert_eq!(collected.changes[0].column, 5);
}

#[test]
fn test_jsx_text_with_containers() {
    let collected =
        collect("const P = () => <p>___Hi {user.name}, {count} new, {items.length + 1}___</p>;");
    assert_eq!(
        collected.replacements(),
        vec![(
            "___Hi {user.name}, {count} new, {items.length + 1}___",
            r#"{t("Hi {name}, {count} new, {arg1}", { name: user.name, count, arg1: items.length + 1 })}"#
        )]
    );
    assert_eq!(collected.extracted[0].value, "Hi {name}, {count} new, {arg1}");
}

#[test]
fn test_jsx_text_duplicate_names_fall_back_to_positional() {
    let collected = collect("const P = () => <p>___{a.name} and {b.name}___</p>;");
    assert_eq!(
        collected.replacements()[0].1,
        r#"{t("{name} and {arg1}", { name: a.name, arg1: b.name })}"#
    );
}

#[test]
fn test_jsx_containers_outside_match_are_visited() {
    let collected = collect(r#"const P = () => <p>___Total___: {"___none___"}</p>;"#);
    assert_eq!(
        collected.replacements(),
        vec![
            ("___Total___", r#"{t("Total")}"#),
            (r#""___none___""#, r#"t("none")"#),
        ]
    );
}

#[test]
fn test_template_whole_match_passes_arguments() {
    let collected = collect("const a = `___Select ${label}___`;");
    assert_eq!(
        collected.replacements(),
        vec![(
            "`___Select ${label}___`",
            r#"t("Select {arg1}", { arg1: label })"#
        )]
    );
    assert_eq!(collected.extracted[0].value, "Select {arg1}");
}

#[test]
fn test_template_partial_match_stays_in_template() {
    let collected = collect("const a = `${count} ___items of ${total}___`;");
    assert_eq!(
        collected.replacements(),
        vec![(
            "___items of ${total}___",
            r#"${t("items of {arg1}", { arg1: total })}"#
        )]
    );
}

#[test]
fn test_template_without_expressions() {
    let collected = collect("const a = `___Plain___`;");
    assert_eq!(collected.replacements()[0].1, r#"t("Plain")"#);
}

#[test]
fn test_skipped_sites() {
    let code = r#"
import x from "___module___";
enum E { A = "___enum___" }
type T = "___type___";
const a = t("___already___");
const b = i18n.t("___global___");
const c = require("___req___");
const d = gql`___tagged___`;
const e = { "___key___": 1 };
"#;
    assert!(collect(code).changes.is_empty());
}

#[test]
fn test_style_element_is_skipped() {
    let code = "const S = () => <style>{`.a::after { content: '___x___' }`}</style>;";
    assert!(collect(code).changes.is_empty());
}

#[test]
fn test_no_import_mode_uses_global_function() {
    let options = TransformOptions {
        no_import: true,
        ..Default::default()
    };
    let collected = collect_with(
        r#"function util() { return "___Hi___"; }
function C() { return <b>___Hi___</b>; }"#,
        &options,
    );
    assert_eq!(
        collected.replacements(),
        vec![
            (r#""___Hi___""#, r#"i18n.t("Hi")"#),
            ("___Hi___", r#"{t("Hi")}"#),
        ]
    );
    assert_eq!(
        collected.conventions,
        vec![AccessorConvention::Function(1), AccessorConvention::Global]
    );
    assert_eq!(collected.extracted.len(), 1);
}

#[test]
fn test_extraction_comments() {
    let options = TransformOptions {
        extraction_comment: Some(CommentStyle::Line),
        ..Default::default()
    };
    let collected = collect_with(
        r#"const a = "___Hi___";
const b = <p title="___Tip___">___Body___</p>;"#,
        &options,
    );
    assert_eq!(
        collected.replacements(),
        vec![
            (r#""___Hi___""#, r#"t("Hi") // Hi"#),
            (r#""___Tip___""#, r#"{t("Tip") /* Tip */}"#),
            ("___Body___", r#"{t("Body") /* Body */}"#),
        ]
    );
}

#[test]
fn test_custom_call_builder() {
    let options = TransformOptions {
        call_builder: Some(std::sync::Arc::new(|accessor: &str, key: &TranslationKey, _: &str| {
            format!("{}.raw({})", accessor, key.to_js_literal())
        })),
        ..Default::default()
    };
    let collected = collect_with("const a = `___Hi ${name}___`;", &options);
    assert_eq!(collected.replacements()[0].1, r#"t.raw("Hi {arg1}")"#);
}

#[test]
fn test_same_value_shares_one_extracted_entry() {
    let collected = collect(r#"const a = "___Save___"; const b = `___Save___`;"#);
    assert_eq!(collected.changes.len(), 2);
    assert_eq!(collected.extracted.len(), 1);
}

#[test]
fn test_changes_never_overlap() {
    let code = r#"
function C({ a }) {
  const x = `___A ${"___nested___"}___`;
  return <div title={`${a} ___B___`}>___C {a}___ {"___D___"}</div>;
}
"#;
    let collected = collect_with(code, &lazy_options());
    let mut ranges: Vec<(usize, usize)> = collected
        .changes
        .iter()
        .map(|c| c.range().unwrap())
        .collect();
    ranges.sort();
    for pair in ranges.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "overlap: {:?}", pair);
    }
    assert_eq!(collected.changes.len(), 4);
}
