use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

const APP: &str = r#"import React from "react";

export function App() {
  return <h1>___Welcome___</h1>;
}
"#;

#[test]
fn test_extract_dry_run_reports_changes() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;

    let output = test.extract_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(out.contains("--> ./src/App.tsx:4:"), "got:\n{}", out);
    assert!(out.contains("- ___Welcome___"));
    assert!(out.contains("+ {t(\"Welcome\")}"));
    assert!(out.contains("Would extract 1 string(s) in 1 file (1 new, 0 reused)."));
    assert!(out.contains("--apply"));

    // dry run never writes
    assert_eq!(test.read_file("src/App.tsx")?, APP);
    assert!(!test.root().join("locales/extracted.json").exists());

    Ok(())
}

#[test]
fn test_extract_apply_rewrites_and_writes_output() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("src/App.tsx")?,
        r#"import React from "react";
import { useTranslation } from "react-i18next";

export function App() {
  const { t } = useTranslation();
  return <h1>{t("Welcome")}</h1>;
}
"#
    );
    assert_eq!(
        test.read_file("locales/extracted.json")?,
        "{\n  \"Welcome\": \"Welcome\"\n}\n"
    );

    // a second run has nothing left to do
    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("nothing to extract"));

    Ok(())
}

#[test]
fn test_extract_merges_into_existing_output() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file("locales/extracted.json", r#"{"Old": "Old"}"#)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let parsed: Value = serde_json::from_str(&test.read_file("locales/extracted.json")?)?;
    let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["Old", "Welcome"]);

    Ok(())
}

#[test]
fn test_extract_output_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;

    let output = test
        .extract_command()
        .args(["--apply", "--output", "i18n/new.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert!(test.root().join("i18n/new.json").exists());
    assert!(!test.root().join("locales/extracted.json").exists());

    Ok(())
}

#[test]
fn test_extract_reuses_existing_translations() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(
        ".glotxrc.json",
        r#"{ "existingTranslations": "locales/en.json" }"#,
    )?;
    test.write_file("locales/en.json", r#"{"common": {"welcome": "Welcome"}}"#)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(0 new, 1 reused)"));

    assert!(test.read_file("src/App.tsx")?.contains("{t(\"common.welcome\")}"));
    assert!(!test.root().join("locales/extracted.json").exists());

    Ok(())
}

#[test]
fn test_extract_leaves_unparsable_file_untouched() -> Result<()> {
    let test = CliTest::with_file("src/broken.tsx", "const x = \"___Hi___\" +;\n")?;
    test.write_file("src/ok.ts", "export const title = \"___Title___\";\n")?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("broken.tsx"), "stderr: {}", stderr(&output));

    assert_eq!(test.read_file("src/broken.tsx")?, "const x = \"___Hi___\" +;\n");
    assert!(test.read_file("src/ok.ts")?.contains("t(\"Title\")"));

    Ok(())
}

#[test]
fn test_extract_no_import_mode() -> Result<()> {
    let test = CliTest::with_file(
        "src/api.ts",
        "export function notify() {\n  alert(\"___Saved___\");\n}\n",
    )?;
    test.write_file(".glotxrc.json", r#"{ "noImport": true }"#)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("src/api.ts")?,
        "export function notify() {\n  alert(i18n.t(\"Saved\"));\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_warns_about_deprecated_options() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".glotxrc.json", r#"{ "hookName": "useI18n" }"#)?;

    let output = test.extract_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("[deprecated-option]"));
    assert!(test.read_file("src/App.tsx")?.contains("import { useI18n } from \"react-i18next\";"));

    Ok(())
}

#[test]
fn test_extract_invalid_pattern_is_an_error() -> Result<()> {
    let test = CliTest::with_file("src/App.tsx", APP)?;
    test.write_file(".glotxrc.json", r#"{ "pattern": "___.+___" }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("pattern"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("extract"));

    Ok(())
}
