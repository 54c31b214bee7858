use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .glotxrc.json"));

    let content = test.read_file(".glotxrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["pattern"], "___(.+)___");
    assert_eq!(parsed["i18nImport"]["source"], "react-i18next");
    assert!(parsed.get("hookName").is_none());
    assert!(content.contains("\n  \"includes\""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".glotxrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".glotxrc.json already exists"));
    assert_eq!(test.read_file(".glotxrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/app.tsx",
        r#"export function App() { return <div>Test</div>; }"#,
    )?;

    let output = test.extract_command().output()?;
    assert_eq!(
        output.status.code(),
        Some(0),
        "extract should work with initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
