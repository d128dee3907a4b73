//! Placeholder mismatch detection rule.
//!
//! Compares the interpolation tokens of every source-locale value with the
//! same key's value in each target locale.

use std::collections::BTreeMap;

use crate::{
    core::{
        data::{AllLocaleData, TranslationReference},
        validate::PlaceholderMatcher,
    },
    issues::PlaceholderIssue,
};

/// Find placeholder mismatches between the source locale and its targets.
///
/// Targets without the key, with `null`, or with a blank value are skipped;
/// those are reported by the missing and empty-value rules.
///
/// # Returns
/// Issues sorted by key, then locale
pub fn find_placeholder_issues(
    source_locale: &str,
    locales: &AllLocaleData,
    matcher: &PlaceholderMatcher,
    references_by_key: &BTreeMap<String, Vec<TranslationReference>>,
) -> Vec<PlaceholderIssue> {
    let Some(source_data) = locales.get(source_locale) else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    for (key, value) in source_data {
        let Some(source_value) = value.as_text() else {
            continue;
        };
        let expected = matcher.extract(source_value);

        for (locale, data) in locales {
            if locale == source_locale {
                continue;
            }
            let Some(target_value) = data.get(key).and_then(|v| v.as_text()) else {
                continue;
            };
            if target_value.trim().is_empty() {
                continue;
            }

            let actual = matcher.extract(target_value);
            if actual == expected {
                continue;
            }
            issues.push(PlaceholderIssue {
                key: key.clone(),
                locale: locale.clone(),
                missing: expected.difference(&actual).cloned().collect(),
                extra: actual.difference(&expected).cloned().collect(),
                references: references_by_key.get(key).cloned().unwrap_or_default(),
                source_value: source_value.to_string(),
                target_value: target_value.to_string(),
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::data::{LocaleData, LocaleValue};
    use crate::rules::placeholders::*;

    fn locale(entries: &[(&str, &str)]) -> LocaleData {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), LocaleValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_reports_missing_and_extra_tokens() {
        let locales = AllLocaleData::from([
            ("en".to_string(), locale(&[("cart", "{{count}} items for {{name}}")])),
            ("fr".to_string(), locale(&[("cart", "{{total}} articles pour {{name}}")])),
            ("de".to_string(), locale(&[("cart", "{{count}} Artikel für {{name}}")])),
        ]);

        let issues = find_placeholder_issues(
            "en",
            &locales,
            &PlaceholderMatcher::default(),
            &BTreeMap::new(),
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].locale, "fr");
        assert_eq!(issues[0].missing, vec!["count"]);
        assert_eq!(issues[0].extra, vec!["total"]);
        assert_eq!(issues[0].source_value, "{{count}} items for {{name}}");
    }

    #[test]
    fn test_skips_absent_null_and_blank_targets() {
        let mut fr = locale(&[("b", "  ")]);
        fr.insert("c".to_string(), LocaleValue::Null);
        let locales = AllLocaleData::from([
            ("en".to_string(), locale(&[("a", "%{x}"), ("b", "%{y}"), ("c", "%s")])),
            ("fr".to_string(), fr),
        ]);

        let issues = find_placeholder_issues(
            "en",
            &locales,
            &PlaceholderMatcher::default(),
            &BTreeMap::new(),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_missing_source_locale_yields_nothing() {
        let locales = AllLocaleData::from([("fr".to_string(), locale(&[("a", "{{x}}")]))]);
        let issues = find_placeholder_issues(
            "en",
            &locales,
            &PlaceholderMatcher::default(),
            &BTreeMap::new(),
        );
        assert!(issues.is_empty());
    }
}
