use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["sourceRoot", "localesDir", "sourceLocale", "suspiciousKeyPolicy"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["sourceLocale"], "en");
    assert_eq!(parsed["localesDir"], "./locales");

    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created"));

    let content = test.read_file(".keysyncrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keysyncrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".keysyncrc.json already exists"));
    assert_eq!(test.read_file(".keysyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/app.tsx", "export const title = t('title');\n")?;
    test.write_file("locales/en.json", "{\n  \"title\": \"Title\"\n}\n")?;

    let output = test.sync_command().output()?;
    assert!(
        output.status.success(),
        "sync should work with the initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
