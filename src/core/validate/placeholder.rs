//! Interpolation placeholder extraction.
//!
//! Tokens are only used for set comparison between a source value and its
//! translations; nothing here renders or interprets placeholders.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Built-in interpolation grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderGrammar {
    /// `{{name}}`
    DoubleCurly,
    /// `{name}`
    SingleCurly,
    /// `%{name}`
    PercentCurly,
    /// `%s`, `%d`, `%1$s`
    PercentSymbol,
    /// `${name}`
    DollarCurly,
}

impl PlaceholderGrammar {
    pub fn defaults() -> Vec<PlaceholderGrammar> {
        vec![
            PlaceholderGrammar::DoubleCurly,
            PlaceholderGrammar::PercentCurly,
            PlaceholderGrammar::PercentSymbol,
        ]
    }

    fn pattern(&self) -> &'static str {
        match self {
            PlaceholderGrammar::DoubleCurly => r"\{\{\s*([^{}]+?)\s*\}\}",
            // Brace runs are captured so that `{{x}}` is not read as `{x}`.
            PlaceholderGrammar::SingleCurly => r"(\{+)\s*([^{}]+?)\s*(\}+)",
            PlaceholderGrammar::PercentCurly => r"%\{\s*([^{}]+?)\s*\}",
            PlaceholderGrammar::PercentSymbol => r"%((?:\d+\$)?[sdifu@])",
            PlaceholderGrammar::DollarCurly => r"\$\{\s*([^{}]+?)\s*\}",
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Builtin(PlaceholderGrammar, Regex),
    Custom(Regex),
}

impl Matcher {
    fn collect(&self, text: &str, tokens: &mut BTreeSet<String>) {
        match self {
            Matcher::Builtin(PlaceholderGrammar::SingleCurly, regex) => {
                for caps in regex.captures_iter(text) {
                    if caps[1].len() == 1 && caps[3].len() == 1 {
                        push_token(tokens, &caps[2]);
                    }
                }
            }
            Matcher::Builtin(_, regex) => {
                for caps in regex.captures_iter(text) {
                    push_token(tokens, &caps[1]);
                }
            }
            Matcher::Custom(regex) => {
                for caps in regex.captures_iter(text) {
                    let token = caps.get(1).or_else(|| caps.get(0));
                    if let Some(m) = token {
                        push_token(tokens, m.as_str());
                    }
                }
            }
        }
    }
}

fn push_token(tokens: &mut BTreeSet<String>, raw: &str) {
    let token = raw.trim();
    if !token.is_empty() {
        tokens.insert(token.to_string());
    }
}

/// Extracts placeholder tokens using a fixed set of grammars.
#[derive(Debug, Clone)]
pub struct PlaceholderMatcher {
    matchers: Vec<Matcher>,
}

impl PlaceholderMatcher {
    /// Build a matcher. Fails only on an invalid custom regex.
    pub fn new(grammars: &[PlaceholderGrammar], custom: &[String]) -> Result<Self, regex::Error> {
        let mut matchers = Vec::with_capacity(grammars.len() + custom.len());
        for grammar in grammars {
            matchers.push(Matcher::Builtin(*grammar, Regex::new(grammar.pattern())?));
        }
        for pattern in custom {
            matchers.push(Matcher::Custom(Regex::new(pattern)?));
        }
        Ok(Self { matchers })
    }

    /// All placeholder tokens in `text`, deduplicated and sorted.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        for matcher in &self.matchers {
            matcher.collect(text, &mut tokens);
        }
        tokens
    }
}

impl Default for PlaceholderMatcher {
    fn default() -> Self {
        let matchers = PlaceholderGrammar::defaults()
            .into_iter()
            .filter_map(|g| Regex::new(g.pattern()).ok().map(|r| Matcher::Builtin(g, r)))
            .collect();
        Self { matchers }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::validate::placeholder::*;

    fn tokens(matcher: &PlaceholderMatcher, text: &str) -> Vec<String> {
        matcher.extract(text).into_iter().collect()
    }

    fn only(grammar: PlaceholderGrammar) -> PlaceholderMatcher {
        PlaceholderMatcher::new(&[grammar], &[]).unwrap()
    }

    #[test]
    fn test_default_grammars() {
        let matcher = PlaceholderMatcher::default();
        assert_eq!(
            tokens(&matcher, "Hi {{ name }}, you have %{count} items and %s"),
            vec!["count", "name", "s"]
        );
    }

    #[test]
    fn test_double_curly() {
        let matcher = only(PlaceholderGrammar::DoubleCurly);
        assert_eq!(tokens(&matcher, "{{a}} and {{ b }} and {c}"), vec!["a", "b"]);
    }

    #[test]
    fn test_single_curly_ignores_double() {
        let matcher = only(PlaceholderGrammar::SingleCurly);
        assert_eq!(tokens(&matcher, "{a}{b} and {{c}}"), vec!["a", "b"]);
    }

    #[test]
    fn test_percent_symbol() {
        let matcher = only(PlaceholderGrammar::PercentSymbol);
        assert_eq!(tokens(&matcher, "%s of %d, %1$s"), vec!["1$s", "d", "s"]);
    }

    #[test]
    fn test_dollar_curly() {
        let matcher = only(PlaceholderGrammar::DollarCurly);
        assert_eq!(tokens(&matcher, "Total: ${amount}"), vec!["amount"]);
    }

    #[test]
    fn test_custom_pattern_uses_first_group() {
        let matcher =
            PlaceholderMatcher::new(&[], &[r"\[\[(\w+)\]\]".to_string(), r"@\w+".to_string()])
                .unwrap();
        assert_eq!(tokens(&matcher, "[[user]] mentioned @bob"), vec!["@bob", "user"]);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(PlaceholderMatcher::new(&[], &["(unclosed".to_string()]).is_err());
    }

    #[test]
    fn test_plain_text_has_no_tokens() {
        assert!(PlaceholderMatcher::default().extract("Hello world").is_empty());
    }

    #[test]
    fn test_grammar_serde_names() {
        let json = serde_json::to_string(&PlaceholderGrammar::PercentSymbol).unwrap();
        assert_eq!(json, "\"percentSymbol\"");
        let parsed: PlaceholderGrammar = serde_json::from_str("\"doubleCurly\"").unwrap();
        assert_eq!(parsed, PlaceholderGrammar::DoubleCurly);
    }
}
