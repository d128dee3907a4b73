use std::fs;

use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

fn setup(extra: &[(&str, &str)]) -> Result<CliTest> {
    let test = CliTest::with_files(&[(
        ".keysyncrc.json",
        r#"{
            "includes": ["src"],
            "localesDir": "./locales",
            "sourceLocale": "en"
        }"#,
    )])?;
    for (path, content) in extra {
        test.write_file(path, content)?;
    }
    Ok(test)
}

#[test]
fn test_dry_run_reports_missing_key() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('greeting');\n"),
        ("locales/en.json", "{}\n"),
    ])?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("error: missing key \"greeting\" would be added  missing-key"));
    assert!(out.contains("--> src/app.tsx:1:"));
    assert!(out.contains("Would update 1 locale file: 1 key added, 0 removed"));
    assert_eq!(test.read_file("locales/en.json")?, "{}\n");

    Ok(())
}

#[test]
fn test_write_adds_missing_key() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('user.greeting');\n"),
        ("locales/en.json", "{}\n"),
        ("locales/fr.json", "{}\n"),
    ])?;

    let output = test.sync_command().args(["--write", "--seed-targets"]).output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Updated 2 locale files: 2 keys added, 0 removed"));
    assert_eq!(test.read_json("locales/en.json")?, json!({"user": {"greeting": "Greeting"}}));
    assert_eq!(test.read_json("locales/fr.json")?, json!({"user": {"greeting": ""}}));

    Ok(())
}

#[test]
fn test_unused_keys_need_prune() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('used');\n"),
        ("locales/en.json", "{\n  \"used\": \"Used\",\n  \"stale\": \"Stale\"\n}\n"),
    ])?;

    let output = test.sync_command().arg("--write").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("warning: unused key \"stale\"  unused-key"));
    assert!(test.read_json("locales/en.json")?.get("stale").is_some());

    let output = test.sync_command().args(["--write", "--prune"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(test.read_json("locales/en.json")?, json!({"used": "Used"}));

    let backups = fs::read_dir(test.root().join(".keysync/backups"))?
        .collect::<std::io::Result<Vec<_>>>()?;
    assert_eq!(backups.len(), 1);
    assert!(fs::read_to_string(backups[0].path().join("en.json"))?.contains("stale"));

    Ok(())
}

#[test]
fn test_suspicious_key_is_reported_not_inserted() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('Hello World');\n"),
        ("locales/en.json", "{}\n"),
    ])?;

    let output = test.sync_command().arg("--write").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("was not added"));
    assert_eq!(test.read_file("locales/en.json")?, "{}\n");

    let output = test
        .sync_command()
        .args(["--suspicious-key-policy", "error"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_json_summary() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('greeting');\n"),
        ("locales/en.json", "{}\n"),
    ])?;

    let output = test.sync_command().arg("--json").output()?;
    let summary: Value = serde_json::from_str(&stdout(&output))?;

    assert_eq!(summary["sourceLocale"], "en");
    assert_eq!(summary["missingKeys"][0]["key"], "greeting");
    assert_eq!(summary["items"][0]["kind"], "missing-key");
    assert_eq!(summary["written"], false);

    Ok(())
}

#[test]
fn test_preview_and_patch_output() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = t('greeting');\n"),
        ("locales/en.json", "{}\n"),
    ])?;

    let output = test
        .sync_command()
        .args(["--preview-output", "out/preview.json", "--patch-output", "out/keys.patch"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let preview = test.read_json("out/preview.json")?;
    assert_eq!(preview["type"], "keysync-preview");
    assert_eq!(preview["command"], "sync");
    assert_eq!(preview["summary"]["totals"]["added"], 1);
    assert_eq!(preview["summary"]["diffs"][0]["path"], "locales/en.json");

    let patch = test.read_file("out/keys.patch")?;
    assert!(patch.starts_with("--- a/locales/en.json\n+++ b/locales/en.json\n"));
    assert!(patch.contains("+  \"greeting\": \"Greeting\""));
    assert_eq!(test.read_file("locales/en.json")?, "{}\n");

    Ok(())
}

#[test]
fn test_select_missing_limits_insertion() -> Result<()> {
    let test = setup(&[
        ("src/app.tsx", "export const a = [t('first'), t('second')];\n"),
        ("locales/en.json", "{}\n"),
    ])?;

    let output = test
        .sync_command()
        .args(["--write", "--select-missing", "first"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_json("locales/en.json")?, json!({"first": "First"}));

    Ok(())
}

#[test]
fn test_missing_locales_dir_is_an_error() -> Result<()> {
    let test = setup(&[("src/app.tsx", "export const a = t('greeting');\n")])?;

    let output = test.sync_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("locales directory"));

    Ok(())
}
