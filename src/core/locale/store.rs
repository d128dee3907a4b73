use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{
    data::{AllLocaleData, LocaleData, LocaleValue},
    error::{SyncError, SyncResult},
    parsers::json::{build_line_index, extract_locale, find_key_line, flatten_locale},
    utils::atomic_write,
};

/// How keys are laid out inside a locale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyStyle {
    /// `{"home": {"title": "..."}}`
    #[default]
    Nested,
    /// `{"home.title": "..."}`
    Flat,
}

/// Action taken on a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone)]
struct LocaleDocument {
    path: PathBuf,
    root: Map<String, Value>,
    data: LocaleData,
    /// File text as loaded; `None` when the file did not exist.
    original: Option<String>,
    dirty: bool,
}

impl LocaleDocument {
    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            root: Map::new(),
            data: LocaleData::new(),
            original: None,
            dirty: false,
        }
    }

    /// Drop flattened entries at or below `prefix`.
    fn forget_subtree(&mut self, prefix: &str, delimiter: &str) {
        let nested = format!("{}{}", prefix, delimiter);
        self.data
            .retain(|key, _| key != prefix && !key.starts_with(&nested));
    }
}

/// Key/value repository for every locale file in one directory.
///
/// Values are addressed by flat keys joined with the configured delimiter.
/// The underlying JSON documents are edited in place so unrelated content
/// (ordering, arrays, non-string values) survives a write.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
    style: KeyStyle,
    delimiter: String,
    documents: BTreeMap<String, LocaleDocument>,
}

impl LocaleStore {
    /// Locale codes of every `*.json` file in `dir`, sorted.
    pub fn discover_locales(dir: &Path) -> SyncResult<Vec<String>> {
        if !dir.is_dir() {
            return Err(SyncError::MissingLocalesDir(dir.to_path_buf()));
        }
        let entries = fs::read_dir(dir).map_err(|e| SyncError::read(dir, e))?;

        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SyncError::read(dir, e))?.path();
            if path.is_file()
                && let Some(locale) = extract_locale(&path)
            {
                locales.push(locale);
            }
        }
        locales.sort();
        Ok(locales)
    }

    /// Load `locales` from `dir`. Locales without a file start empty.
    pub fn load(
        dir: &Path,
        locales: &[String],
        style: KeyStyle,
        delimiter: &str,
    ) -> SyncResult<Self> {
        if !dir.is_dir() {
            return Err(SyncError::MissingLocalesDir(dir.to_path_buf()));
        }

        let mut documents = BTreeMap::new();
        for locale in locales {
            let path = dir.join(format!("{}.json", locale));
            let document = if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| SyncError::read(&path, e))?;
                let root: Map<String, Value> =
                    serde_json::from_str(&content).map_err(|source| SyncError::LocaleParse {
                        path: path.clone(),
                        source,
                    })?;
                let data = flatten_locale(&Value::Object(root.clone()), delimiter);
                LocaleDocument {
                    path,
                    root,
                    data,
                    original: Some(content),
                    dirty: false,
                }
            } else {
                tracing::debug!(locale = %locale, path = %path.display(), "locale file missing");
                LocaleDocument::empty(path)
            };
            documents.insert(locale.clone(), document);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            style,
            delimiter: delimiter.to_string(),
            documents,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn style(&self) -> KeyStyle {
        self.style
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn data(&self, locale: &str) -> Option<&LocaleData> {
        self.documents.get(locale).map(|d| &d.data)
    }

    pub fn get(&self, locale: &str, key: &str) -> Option<&LocaleValue> {
        self.data(locale).and_then(|data| data.get(key))
    }

    pub fn path_of(&self, locale: &str) -> Option<&Path> {
        self.documents.get(locale).map(|d| d.path.as_path())
    }

    /// File text as it was loaded; `None` if the file did not exist.
    pub fn original_content(&self, locale: &str) -> Option<&str> {
        self.documents.get(locale).and_then(|d| d.original.as_deref())
    }

    pub fn is_dirty(&self, locale: &str) -> bool {
        self.documents.get(locale).is_some_and(|d| d.dirty)
    }

    pub fn dirty_locales(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter(|(_, d)| d.dirty)
            .map(|(locale, _)| locale.clone())
            .collect()
    }

    pub fn snapshot(&self) -> AllLocaleData {
        self.documents
            .iter()
            .map(|(locale, d)| (locale.clone(), d.data.clone()))
            .collect()
    }

    /// Line of `key` in the loaded file, if it can be located.
    pub fn key_line(&self, locale: &str, key: &str) -> Option<usize> {
        let content = self.original_content(locale)?;
        let index = build_line_index(content);
        let segments: Vec<&str> = key.split(self.delimiter.as_str()).collect();
        find_key_line(content, &segments, &index).or_else(|| find_key_line(content, &[key], &index))
    }

    /// Existing key that writing `key` as a string would destroy.
    ///
    /// Only nested files can collide: a shorter key holding a value where
    /// `key` needs an object, or entries already stored below `key`.
    pub fn conflicting_key(&self, locale: &str, key: &str) -> Option<String> {
        if self.style == KeyStyle::Flat {
            return None;
        }
        let document = self.documents.get(locale)?;
        let delimiter = self.delimiter.as_str();
        let segments: Vec<&str> = key.split(delimiter).collect();

        let mut map = &document.root;
        for (depth, segment) in segments.iter().enumerate() {
            let last = depth + 1 == segments.len();
            let value = map.get(*segment)?;
            match value {
                Value::Object(child) if !last => map = child,
                Value::Object(child) if child.is_empty() => return None,
                Value::String(_) | Value::Null if last => return None,
                _ if last => {
                    let nested = format!("{}{}", key, delimiter);
                    let below = document.data.keys().find(|k| k.starts_with(&nested));
                    return Some(below.cloned().unwrap_or_else(|| key.to_string()));
                }
                _ => return Some(segments[..=depth].join(delimiter)),
            }
        }
        None
    }

    /// Insert or overwrite `key` with a string value.
    ///
    /// Creates the locale (and, for nested keys, intermediate objects) when
    /// absent. Intermediate non-object values are replaced.
    pub fn upsert(&mut self, locale: &str, key: &str, value: &str) -> KeyAction {
        let dir = self.dir.clone();
        let delimiter = self.delimiter.clone();
        let style = self.style;
        let document = self
            .documents
            .entry(locale.to_string())
            .or_insert_with(|| LocaleDocument::empty(dir.join(format!("{}.json", locale))));

        let current = document.data.get(key).and_then(LocaleValue::as_text);
        if current == Some(value) {
            return KeyAction::Unchanged;
        }
        let action = if document.data.contains_key(key) {
            KeyAction::Updated
        } else {
            KeyAction::Added
        };

        let new_value = Value::String(value.to_string());
        match style {
            KeyStyle::Flat => {
                document.root.insert(key.to_string(), new_value);
            }
            KeyStyle::Nested => {
                let segments: Vec<&str> = key.split(delimiter.as_str()).collect();
                let mut replaced = Vec::new();
                insert_nested(&mut document.root, &segments, new_value, 0, &mut replaced);
                for depth in replaced {
                    let prefix = segments[..depth].join(delimiter.as_str());
                    document.forget_subtree(&prefix, &delimiter);
                }
            }
        }

        document.forget_subtree(key, &delimiter);
        document
            .data
            .insert(key.to_string(), LocaleValue::text(value));
        document.dirty = true;
        action
    }

    /// Remove `key`. Nested parents left empty by the removal are removed too.
    ///
    /// Returns false if the key was not present.
    pub fn remove(&mut self, locale: &str, key: &str) -> bool {
        let delimiter = self.delimiter.clone();
        let Some(document) = self.documents.get_mut(locale) else {
            return false;
        };
        if document.data.remove(key).is_none() {
            return false;
        }

        if document.root.shift_remove(key).is_none() {
            let segments: Vec<&str> = key.split(delimiter.as_str()).collect();
            remove_nested(&mut document.root, &segments);
        }
        document.dirty = true;
        true
    }

    /// Pretty-printed file contents for `locale`, with a trailing newline.
    pub fn render(&self, locale: &str) -> Option<String> {
        let document = self.documents.get(locale)?;
        let json = serde_json::to_string_pretty(&document.root).ok()?;
        Some(format!("{}\n", json))
    }

    /// Write every modified locale file atomically.
    ///
    /// Returns the written paths in locale order.
    pub fn flush(&mut self) -> SyncResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (locale, document) in &mut self.documents {
            if !document.dirty {
                continue;
            }
            let json = serde_json::to_string_pretty(&document.root)
                .map_err(|source| SyncError::Serialize {
                    path: document.path.clone(),
                    source,
                })?;
            let content = format!("{}\n", json);
            atomic_write(&document.path, content.as_bytes())
                .map_err(|e| SyncError::write(&document.path, e))?;

            tracing::info!(locale = %locale, path = %document.path.display(), "wrote locale file");
            document.original = Some(content);
            document.dirty = false;
            written.push(document.path.clone());
        }
        Ok(written)
    }
}

/// Insert a value at a nested path, creating intermediate objects as needed.
///
/// Existing non-object values on the path are replaced by objects; their
/// depths (1-based prefix lengths) are pushed onto `replaced`.
fn insert_nested(
    root: &mut Map<String, Value>,
    path: &[&str],
    value: Value,
    depth: usize,
    replaced: &mut Vec<usize>,
) {
    match path {
        [] => {}
        [last] => {
            root.insert(last.to_string(), value);
        }
        [first, rest @ ..] => {
            let next = root
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !next.is_object() {
                *next = Value::Object(Map::new());
                replaced.push(depth + 1);
            }
            if let Value::Object(map) = next {
                insert_nested(map, rest, value, depth + 1, replaced);
            }
        }
    }
}

/// Remove a nested key, pruning parents that become empty objects.
fn remove_nested(map: &mut Map<String, Value>, path: &[&str]) -> bool {
    match path {
        [] => false,
        [last] => map.shift_remove(*last).is_some(),
        [first, rest @ ..] => {
            let removed = match map.get_mut(*first) {
                Some(Value::Object(child)) => remove_nested(child, rest),
                Some(Value::Array(items)) => remove_in_array(items, rest),
                _ => false,
            };
            if removed && matches!(map.get(*first), Some(Value::Object(child)) if child.is_empty())
            {
                map.shift_remove(*first);
            }
            removed
        }
    }
}

fn remove_in_array(items: &mut [Value], path: &[&str]) -> bool {
    let Some((index, rest)) = path.split_first() else {
        return false;
    };
    let Ok(index) = index.parse::<usize>() else {
        return false;
    };
    match items.get_mut(index) {
        Some(Value::Object(child)) => remove_nested(child, rest),
        Some(Value::Array(inner)) => remove_in_array(inner, rest),
        _ => false,
    }
}
