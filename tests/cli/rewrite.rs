use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_rewrite_applies_edits_and_writes_rollback() -> Result<()> {
    let test = CliTest::with_files(&[
        ("src/page.tsx", "<h1>Hello</h1>"),
        (
            "edits.json",
            r#"[{"id": "title", "range": {"start": 4, "end": 9}, "replacement": "{t('title')}"}]"#,
        ),
    ])?;

    let output = test
        .command()
        .args(["rewrite", "src/page.tsx", "--edits", "edits.json"])
        .args(["--rollback-output", "rollback.json"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Applied 1 edit to src/page.tsx"));
    assert_eq!(test.read_file("src/page.tsx")?, "<h1>{t('title')}</h1>");

    let rollback: Value = serde_json::from_str(&test.read_file("rollback.json")?)?;
    assert_eq!(rollback[0]["id"], "rollback:title");
    assert_eq!(rollback[0]["replacement"], "Hello");

    Ok(())
}

#[test]
fn test_rewrite_rejects_overlapping_edits() -> Result<()> {
    let test = CliTest::with_files(&[
        ("a.ts", "abcdefgh"),
        (
            "edits.json",
            r#"[
                {"id": "a", "range": {"start": 0, "end": 4}, "replacement": "x"},
                {"id": "b", "range": {"start": 2, "end": 6}, "replacement": "y"}
            ]"#,
        ),
    ])?;

    let output = test
        .command()
        .args(["rewrite", "a.ts", "--edits", "edits.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("edit plan is invalid"));
    assert_eq!(test.read_file("a.ts")?, "abcdefgh");

    Ok(())
}
