use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    locale::KeyStyle,
    sync::options::{EmptyValuePolicy, SuspiciousKeyPolicy},
    utils::KeyPattern,
    validate::{KeyValidationRules, PlaceholderGrammar, PlaceholderMatcher},
};

pub const CONFIG_FILE_NAME: &str = ".keysyncrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_test_files: bool,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    /// Empty means every locale file other than the source locale.
    #[serde(default)]
    pub target_locales: Vec<String>,
    #[serde(default = "default_translation_identifier")]
    pub translation_identifier: String,
    #[serde(default)]
    pub key_style: KeyStyle,
    #[serde(default = "default_key_delimiter")]
    pub key_delimiter: String,
    #[serde(default = "PlaceholderGrammar::defaults")]
    pub placeholder_patterns: Vec<PlaceholderGrammar>,
    #[serde(default)]
    pub custom_placeholder_patterns: Vec<String>,
    #[serde(default)]
    pub empty_value_policy: EmptyValuePolicy,
    #[serde(default = "default_empty_value_markers")]
    pub empty_value_markers: Vec<String>,
    #[serde(default)]
    pub suspicious_key_policy: SuspiciousKeyPolicy,
    #[serde(default)]
    pub key_validation: KeyValidationRules,
    #[serde(default)]
    pub assumed_keys: Vec<String>,
    #[serde(default)]
    pub seed_target_locales: bool,
    #[serde(default)]
    pub seed_value: String,
    #[serde(default = "default_true")]
    pub backup_on_prune: bool,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_true")]
    pub cache: bool,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_locales_dir() -> String {
    "./locales".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_translation_identifier() -> String {
    "t".to_string()
}

fn default_key_delimiter() -> String {
    ".".to_string()
}

fn default_empty_value_markers() -> Vec<String> {
    ["TODO", "TBD", "FIXME"].map(String::from).to_vec()
}

fn default_backup_dir() -> String {
    ".keysync/backups".to_string()
}

fn default_cache_dir() -> String {
    ".keysync/cache".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            includes: Vec::new(),
            ignores: default_ignores(),
            ignore_test_files: true,
            locales_dir: default_locales_dir(),
            source_locale: default_source_locale(),
            target_locales: Vec::new(),
            translation_identifier: default_translation_identifier(),
            key_style: KeyStyle::default(),
            key_delimiter: default_key_delimiter(),
            placeholder_patterns: PlaceholderGrammar::defaults(),
            custom_placeholder_patterns: Vec::new(),
            empty_value_policy: EmptyValuePolicy::default(),
            empty_value_markers: default_empty_value_markers(),
            suspicious_key_policy: SuspiciousKeyPolicy::default(),
            key_validation: KeyValidationRules::default(),
            assumed_keys: Vec::new(),
            seed_target_locales: false,
            seed_value: String::new(),
            backup_on_prune: true,
            backup_dir: default_backup_dir(),
            cache_dir: default_cache_dir(),
            cache: true,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns, invalid custom placeholder regexes,
    /// invalid assumed-key patterns and an empty key delimiter.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        PlaceholderMatcher::new(&self.placeholder_patterns, &self.custom_placeholder_patterns)
            .context("Invalid regex in 'customPlaceholderPatterns'")?;

        for pattern in &self.assumed_keys {
            KeyPattern::new(pattern)
                .with_context(|| format!("Invalid pattern in 'assumedKeys': \"{}\"", pattern))?;
        }

        if self.key_delimiter.is_empty() {
            bail!("'keyDelimiter' must not be empty");
        }
        if self.translation_identifier.is_empty() {
            bail!("'translationIdentifier' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ignores, vec!["**/node_modules/**"]);
        assert!(config.includes.is_empty());
        assert_eq!(config.translation_identifier, "t");
        assert_eq!(config.key_style, KeyStyle::Nested);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "localesDir": "./i18n",
              "sourceLocale": "de",
              "targetLocales": ["fr", "ja"],
              "keyStyle": "flat",
              "placeholderPatterns": ["singleCurly"],
              "suspiciousKeyPolicy": "error",
              "keyValidation": { "containsSpaces": false, "maxKeyLength": 40 }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.locales_dir, "./i18n");
        assert_eq!(config.source_locale, "de");
        assert_eq!(config.target_locales, vec!["fr", "ja"]);
        assert_eq!(config.key_style, KeyStyle::Flat);
        assert_eq!(config.placeholder_patterns, vec![PlaceholderGrammar::SingleCurly]);
        assert_eq!(config.suspicious_key_policy, SuspiciousKeyPolicy::Error);
        assert!(!config.key_validation.contains_spaces);
        assert!(config.key_validation.equals_value);
        assert_eq!(config.key_validation.max_key_length, Some(40));
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignores": ["**/dist/**"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert_eq!(config.placeholder_patterns, PlaceholderGrammar::defaults());
        assert_eq!(config.empty_value_markers, default_empty_value_markers());
        assert!(config.cache);
        assert!(config.backup_on_prune);
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "assumedKeys": ["errors.*"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file());
        assert_eq!(result.config.assumed_keys, vec!["errors.*"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.config.locales_dir, "./locales");
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_literal_include_with_brackets() {
        let config = Config {
            includes: vec!["app/[locale]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_placeholder_regex() {
        let config = Config {
            custom_placeholder_patterns: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("customPlaceholderPatterns"));
    }

    #[test]
    fn test_validate_empty_delimiter() {
        let config = Config {
            key_delimiter: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "ignores": ["[invalid"] }"#).unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"translationIdentifier\": \"t\""));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cache_dir, ".keysync/cache");
    }
}
