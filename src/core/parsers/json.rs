use std::path::Path;

use serde_json::Value;

use crate::core::data::{LocaleData, LocaleValue};

/// Flatten a parsed locale document into `key → value`.
///
/// Flattening rules:
/// - objects recurse, joining segments with `delimiter`
/// - strings and `null` are values
/// - string-only arrays are a single key, joined with `", "` for display
/// - other arrays are expanded by index (`items.0.title`)
/// - empty arrays and non-string scalars produce nothing
///
/// The same rules apply to nested and flat files: a flat file's dotted keys
/// are simply leaves at depth one.
pub fn flatten_locale(value: &Value, delimiter: &str) -> LocaleData {
    let mut result = LocaleData::new();
    flatten_json(value, String::new(), delimiter, &mut result);
    result
}

fn flatten_json(value: &Value, prefix: String, delimiter: &str, result: &mut LocaleData) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}{}{}", prefix, delimiter, segment)
        }
    };

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_json(val, join(key), delimiter, result);
            }
        }
        Value::String(s) => {
            result.insert(prefix, LocaleValue::Text(s.clone()));
        }
        Value::Null if !prefix.is_empty() => {
            result.insert(prefix, LocaleValue::Null);
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                return;
            }

            let is_string_array = arr.iter().all(|v| matches!(v, Value::String(_)));
            if is_string_array && !prefix.is_empty() {
                let values: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
                result.insert(prefix, LocaleValue::Text(values.join(", ")));
            } else {
                for (index, val) in arr.iter().enumerate() {
                    flatten_json(val, join(&index.to_string()), delimiter, result);
                }
            }
        }
        _ => {}
    }
}

/// Build an index of line start byte offsets for O(log n) line lookups.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// 1-based line number of a byte offset.
fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}

/// Find the line where a key is declared in a locale file.
///
/// `segments` are searched in sequence so that `Common.submit` finds the
/// `"submit"` after `"Common"` rather than one in another namespace. Only
/// matches followed by `:` count as keys. Returns `None` when any segment is
/// not found.
pub fn find_key_line(content: &str, segments: &[&str], line_index: &[usize]) -> Option<usize> {
    let mut search_start = 0;
    for part in segments {
        let pattern = serde_json::to_string(part).ok()?;
        let remaining = &content[search_start..];

        let mut pos = 0;
        let mut found = false;
        while let Some(rel_pos) = remaining[pos..].find(&pattern) {
            let abs_pos = pos + rel_pos;
            let after_pattern = abs_pos + pattern.len();
            if remaining[after_pattern..].trim_start().starts_with(':') {
                search_start += after_pattern;
                found = true;
                break;
            }
            pos = abs_pos + 1;
        }

        if !found {
            return None;
        }
    }

    (search_start > 0).then(|| offset_to_line(line_index, search_start))
}

/// Locale code from a locale file name: `zh-CN.json` → `zh-CN`.
pub fn extract_locale(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
