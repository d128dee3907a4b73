use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Check if a path pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Absolute source file paths, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => tracing::warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        for p in TEST_FILE_PATTERNS {
            if let Ok(pattern) = Pattern::new(p) {
                glob_patterns.push(pattern);
            }
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|e| e.is_dir())),
                    Err(e) => tracing::warn!(pattern = %inc, error = %e, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    tracing::warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    tracing::warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_scannable_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    tracing::debug!(files = files.len(), skipped = skipped_count, "scanned source files");

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mjs" | "cjs" | "mts" | "cts")
    )
}

/// Narrow a scanned file set to the given targets.
///
/// A target names either an exact file or a directory whose descendants are
/// kept. Relative targets are resolved against `base_dir`.
pub fn filter_targets(files: &[PathBuf], targets: &[PathBuf], base_dir: &Path) -> Vec<PathBuf> {
    let resolved: Vec<PathBuf> = targets
        .iter()
        .map(|t| {
            if t.is_absolute() {
                t.clone()
            } else {
                base_dir.join(t)
            }
        })
        .map(|t| normalize(&t))
        .collect();

    files
        .iter()
        .filter(|file| {
            let file = normalize(file);
            resolved.iter().any(|target| file.starts_with(target))
        })
        .cloned()
        .collect()
}

/// Lexically drop `.` components so `./src` and `src` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

/// `/`-separated path of `path` relative to `base_dir`.
///
/// Falls back to the full path when `path` lies outside `base_dir`.
pub fn relative_path(path: &Path, base_dir: &Path) -> String {
    let path = normalize(path);
    let base = normalize(base_dir);
    let Ok(rel) = path.strip_prefix(&base) else {
        return path.to_string_lossy().into_owned();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result.files.iter().map(|f| relative_path(f, base)).collect()
    }

    #[test]
    fn test_scan_source_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.tsx")).unwrap();
        File::create(dir_path.join("utils.ts")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();

        let result = scan_files(dir_path, &[], &[], false);

        assert_eq!(names(&result, dir_path), vec!["app.tsx", "utils.ts"]);
    }

    #[test]
    fn test_scan_output_is_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        for name in ["c.ts", "a.ts", "b.ts"] {
            File::create(dir_path.join(name)).unwrap();
        }

        let result = scan_files(dir_path, &[], &[], false);
        assert_eq!(names(&result, dir_path), vec!["a.ts", "b.ts", "c.ts"]);
    }

    #[test]
    fn test_scan_ignores_node_modules() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let node_modules = dir_path.join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        File::create(node_modules.join("lib.ts")).unwrap();
        File::create(dir_path.join("app.tsx")).unwrap();

        let result = scan_files(dir_path, &[], &["**/node_modules/**".to_owned()], false);

        assert_eq!(names(&result, dir_path), vec!["app.tsx"]);
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir(dir_path.join("src")).unwrap();
        File::create(dir_path.join("src/app.tsx")).unwrap();
        fs::create_dir(dir_path.join("lib")).unwrap();
        File::create(dir_path.join("lib/utils.ts")).unwrap();

        let result = scan_files(dir_path, &["src".to_owned(), "missing".to_owned()], &[], false);

        assert_eq!(names(&result, dir_path), vec!["src/app.tsx"]);
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let components = dir_path.join("src").join("components");
        fs::create_dir_all(&components).unwrap();
        File::create(components.join("Button.tsx")).unwrap();

        let result = scan_files(
            dir_path,
            &["src".to_owned(), "src/components".to_owned()],
            &[],
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        fs::create_dir_all(dir_path.join("src/app")).unwrap();
        File::create(dir_path.join("src/app/page.tsx")).unwrap();
        fs::create_dir_all(dir_path.join("lib")).unwrap();
        File::create(dir_path.join("lib/utils.ts")).unwrap();

        let result = scan_files(dir_path, &["src/*".to_owned()], &[], false);

        assert_eq!(names(&result, dir_path), vec!["src/app/page.tsx"]);
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.tsx")).unwrap();
        File::create(dir_path.join("app.test.tsx")).unwrap();
        File::create(dir_path.join("utils.spec.jsx")).unwrap();
        fs::create_dir(dir_path.join("__tests__")).unwrap();
        File::create(dir_path.join("__tests__/helper.ts")).unwrap();

        let result = scan_files(dir_path, &[], &[], true);
        assert_eq!(names(&result, dir_path), vec!["app.tsx"]);

        let result = scan_files(dir_path, &[], &[], false);
        assert_eq!(result.files.len(), 4);
    }

    #[test]
    fn test_scan_ignores_literal_directory_path() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let generated = dir_path.join("src").join("generated");
        fs::create_dir_all(&generated).unwrap();
        File::create(generated.join("types.ts")).unwrap();
        File::create(dir_path.join("src/index.ts")).unwrap();

        let result = scan_files(dir_path, &[], &["src/generated".to_owned()], false);
        assert_eq!(names(&result, dir_path), vec!["src/index.ts"]);
    }

    #[test]
    fn test_is_scannable_file() {
        assert!(is_scannable_file(Path::new("app.tsx")));
        assert!(is_scannable_file(Path::new("app.mjs")));
        assert!(!is_scannable_file(Path::new("style.css")));
        assert!(!is_scannable_file(Path::new("data.json")));
    }

    #[test]
    fn test_filter_targets_by_file_and_directory() {
        let base = Path::new("/work");
        let files = vec![
            PathBuf::from("/work/src/a.ts"),
            PathBuf::from("/work/src/feature/b.ts"),
            PathBuf::from("/work/lib/c.ts"),
        ];

        let filtered = filter_targets(
            &files,
            &[PathBuf::from("./src/feature"), PathBuf::from("/work/lib/c.ts")],
            base,
        );

        assert_eq!(
            filtered,
            vec![
                PathBuf::from("/work/src/feature/b.ts"),
                PathBuf::from("/work/lib/c.ts")
            ]
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/work/src/app.tsx"), Path::new("/work")),
            "src/app.tsx"
        );
        assert_eq!(
            relative_path(Path::new("/work/./src/app.tsx"), Path::new("/work/")),
            "src/app.tsx"
        );
    }
}
