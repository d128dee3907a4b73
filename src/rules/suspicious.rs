//! Suspicious key detection rule.
//!
//! Keys are checked where they are referenced in code and where they are
//! defined in the source locale. A key flagged in code is not reported again
//! from locale data.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::{
        data::{LocaleData, SourcePosition, TranslationReference},
        validate::KeyValidator,
    },
    issues::SuspiciousKeyWarning,
};

/// Find suspicious keys.
///
/// # Arguments
/// * `references_by_key` - Keys referenced in code
/// * `source_data` - Flattened source locale
/// * `source_file` - Display path of the source locale file
/// * `validator` - Key classifier
/// * `locate` - Line of a key in the source locale file, if known
///
/// # Returns
/// Warnings sorted by file path, position, then key
pub fn find_suspicious_keys(
    references_by_key: &BTreeMap<String, Vec<TranslationReference>>,
    source_data: &LocaleData,
    source_file: &str,
    validator: &KeyValidator,
    locate: impl Fn(&str) -> Option<usize>,
) -> Vec<SuspiciousKeyWarning> {
    let mut flagged = BTreeSet::new();
    let mut warnings = Vec::new();

    for (key, references) in references_by_key {
        let Some(first) = references.first() else {
            continue;
        };
        let value = source_data.get(key).and_then(|v| v.as_text());
        if let Some(reason) = validator.validate(key, value).reason {
            flagged.insert(key.as_str());
            warnings.push(SuspiciousKeyWarning {
                key: key.clone(),
                file_path: first.file_path.clone(),
                position: first.position,
                reason,
            });
        }
    }

    for (key, value) in source_data {
        if flagged.contains(key.as_str()) {
            continue;
        }
        if let Some(reason) = validator.validate(key, value.as_text()).reason {
            let line = locate(key).unwrap_or(1);
            warnings.push(SuspiciousKeyWarning {
                key: key.clone(),
                file_path: source_file.to_string(),
                position: SourcePosition::new(line, 1),
                reason,
            });
        }
    }

    warnings.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.key.cmp(&b.key))
    });
    warnings
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::{data::LocaleValue, validate::SuspiciousReason};
    use crate::rules::suspicious::*;

    #[test]
    fn test_code_and_locale_detections_are_deduplicated() {
        let references = BTreeMap::from([(
            "Save".to_string(),
            vec![TranslationReference::new("Save", "src/a.tsx", SourcePosition::new(3, 7))],
        )]);
        let source = LocaleData::from([
            ("Save".to_string(), LocaleValue::text("Save")),
            ("Cancel".to_string(), LocaleValue::text("Cancel")),
            ("home.title".to_string(), LocaleValue::text("Home")),
        ]);

        let warnings = find_suspicious_keys(
            &references,
            &source,
            "locales/en.json",
            &KeyValidator::default(),
            |key| (key == "Cancel").then_some(2),
        );

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].key, "Cancel");
        assert_eq!(warnings[0].file_path, "locales/en.json");
        assert_eq!(warnings[0].position, SourcePosition::new(2, 1));
        assert_eq!(warnings[0].reason, SuspiciousReason::EqualsValue);
        assert_eq!(warnings[1].key, "Save");
        assert_eq!(warnings[1].file_path, "src/a.tsx");
    }

    #[test]
    fn test_missing_suspicious_key_reported_at_reference() {
        let references = BTreeMap::from([(
            "Hello World".to_string(),
            vec![TranslationReference::new("Hello World", "src/a.tsx", SourcePosition::new(1, 3))],
        )]);
        let warnings = find_suspicious_keys(
            &references,
            &LocaleData::new(),
            "locales/en.json",
            &KeyValidator::default(),
            |_| None,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].reason, SuspiciousReason::ContainsSpaces);
    }
}
