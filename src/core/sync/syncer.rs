//! The reconciliation engine.
//!
//! A run resolves the source files, extracts references through the cache,
//! loads every locale, computes findings with the rules, and projects the
//! selected changes onto a copy of the locale store. Only write mode touches
//! the locale files, after an optional backup.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    core::{
        cache::{CacheManager, CacheMetadata},
        data::AllLocaleData,
        error::{SyncError, SyncResult},
        extract::{CallEnumerator, ExtractionResult, ReferenceExtractor, SwcCallEnumerator},
        locale::LocaleStore,
        sync::{
            backup::create_backup,
            defaults::default_value,
            options::{EmptyValuePolicy, SyncOptions},
            summary::{AppliedChanges, LocaleSnapshot, SyncSummary},
        },
        utils::{KeyPattern, expand_glob_pattern, filter_targets, relative_path, scan_files},
        validate::{KeyValidator, PlaceholderMatcher},
    },
    issues::{Actionable, AssumedKeyNotice, Finding, SeverityPolicy},
    rules::{
        find_empty_values, find_missing_keys, find_placeholder_issues, find_suspicious_keys,
        find_unused_keys,
    },
};

pub struct Syncer {
    root: PathBuf,
    config: Config,
    enumerator: Box<dyn CallEnumerator>,
}

impl Syncer {
    /// Engine rooted at `root`, parsing with swc.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            enumerator: Box::new(SwcCallEnumerator),
        }
    }

    pub fn with_enumerator(mut self, enumerator: Box<dyn CallEnumerator>) -> Self {
        self.enumerator = enumerator;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locales_dir(&self) -> PathBuf {
        self.root.join(&self.config.locales_dir)
    }

    pub fn run(&self, options: &SyncOptions) -> SyncResult<SyncSummary> {
        let config = &self.config;
        let matcher = PlaceholderMatcher::new(
            &config.placeholder_patterns,
            &config.custom_placeholder_patterns,
        )
        .map_err(|e| SyncError::Config(format!("invalid placeholder pattern: {}", e)))?;
        let assumed = self.assumed_patterns(options)?;
        let validator = KeyValidator::new(config.key_validation.clone(), &config.key_delimiter);

        // Sources
        let filtered = !options.target_files.is_empty();
        let files = self.resolve_files(options);
        let (extraction, cache_invalidated) = self.extract(&files, &assumed, filtered, options)?;

        // Locales
        let store = self.load_store()?;
        let source_locale = config.source_locale.as_str();
        let target_locales: Vec<String> = store
            .locales()
            .filter(|l| *l != source_locale)
            .map(str::to_string)
            .collect();
        let snapshot = store.snapshot();
        let scoped = if filtered {
            scope_to_keys(&snapshot, &extraction.key_set)
        } else {
            snapshot.clone()
        };
        let source_data = snapshot.get(source_locale).cloned().unwrap_or_default();

        // Rules
        let mut missing_keys = find_missing_keys(
            &extraction.key_set,
            &extraction.references_by_key,
            &source_data,
            &validator,
            config.suspicious_key_policy,
            &options.selection,
        );

        let mut unused_keys = if filtered {
            Vec::new()
        } else {
            find_unused_keys(
                &extraction.key_set,
                &assumed,
                &snapshot,
                options.prune,
                &options.selection,
            )
        };
        if !extraction.parse_errors.is_empty() && unused_keys.iter().any(|r| r.applied) {
            tracing::warn!(
                files = extraction.parse_errors.len(),
                "not removing unused keys because some files failed to parse"
            );
            unused_keys.iter_mut().for_each(|r| r.applied = false);
        }

        let placeholder_issues = if options.validate_interpolations {
            find_placeholder_issues(
                source_locale,
                &scoped,
                &matcher,
                &extraction.references_by_key,
            )
        } else {
            Vec::new()
        };

        let empty_value_policy = options.empty_value_policy.unwrap_or(config.empty_value_policy);
        let empty_values = if empty_value_policy == EmptyValuePolicy::Ignore {
            Vec::new()
        } else {
            find_empty_values(source_locale, &scoped, &config.empty_value_markers)
        };

        let source_file = store
            .path_of(source_locale)
            .map(|p| relative_path(p, &self.root))
            .unwrap_or_default();
        let suspicious_keys = find_suspicious_keys(
            &extraction.references_by_key,
            &scoped.get(source_locale).cloned().unwrap_or_default(),
            &source_file,
            &validator,
            |key| store.key_line(source_locale, key),
        );

        // Projection
        let mut projected = store.clone();
        let mut changes = AppliedChanges::default();
        let seed = options
            .seed_target_locales
            .unwrap_or(config.seed_target_locales);

        for record in missing_keys.iter_mut().filter(|r| r.applied) {
            let seeded: Vec<&str> = if seed {
                target_locales
                    .iter()
                    .map(String::as_str)
                    .filter(|target| projected.get(target, &record.key).is_none())
                    .collect()
            } else {
                Vec::new()
            };

            let conflict = std::iter::once(source_locale)
                .chain(seeded.iter().copied())
                .find_map(|locale| projected.conflicting_key(locale, &record.key));
            if let Some(existing) = conflict {
                tracing::warn!(
                    key = %record.key,
                    existing = %existing,
                    "missing key collides with an existing key"
                );
                record.applied = false;
                record.conflict = Some(existing);
                continue;
            }

            let value = default_value(&record.key, &config.key_delimiter);
            projected.upsert(source_locale, &record.key, &value);
            push_change(&mut changes.added, source_locale, &record.key);
            for target in seeded {
                projected.upsert(target, &record.key, &config.seed_value);
                push_change(&mut changes.added, target, &record.key);
            }
        }
        for record in unused_keys.iter().filter(|r| r.applied) {
            for locale in &record.locales {
                if projected.remove(locale, &record.key) {
                    push_change(&mut changes.removed, locale, &record.key);
                }
            }
        }

        let projection: Vec<LocaleSnapshot> = projected
            .dirty_locales()
            .into_iter()
            .filter_map(|locale| {
                let after = projected.render(&locale)?;
                let path = projected.path_of(&locale)?;
                Some(LocaleSnapshot {
                    path: relative_path(path, &self.root),
                    before: store.original_content(&locale).map(str::to_string),
                    after,
                    locale,
                })
            })
            .collect();

        // Write
        let mut backup_path = None;
        let mut written = false;
        if options.write && !changes.is_empty() {
            let default_backup =
                (options.prune || changes.removed_count() > 0) && config.backup_on_prune;
            if options.backup.unwrap_or(default_backup) {
                let backup_root = self.root.join(&config.backup_dir);
                backup_path = Some(create_backup(store.dir(), &backup_root)?);
            }
            let paths = projected.flush()?;
            tracing::info!(files = paths.len(), "applied locale changes");
            written = true;
        }

        // Items
        let policy = SeverityPolicy {
            write: options.write,
            strict: options.strict,
            empty_value: empty_value_policy,
            suspicious: config.suspicious_key_policy,
        };
        let notices = assumed_notices(&assumed, &snapshot);
        let missing_set: HashSet<&str> = missing_keys.iter().map(|r| r.key.as_str()).collect();

        let findings = missing_keys
            .iter()
            .cloned()
            .map(Finding::from)
            .chain(unused_keys.iter().cloned().map(Finding::from))
            .chain(placeholder_issues.iter().cloned().map(Finding::from))
            .chain(empty_values.iter().cloned().map(Finding::from))
            .chain(extraction.dynamic_key_warnings.iter().cloned().map(Finding::from))
            .chain(
                suspicious_keys
                    .iter()
                    .filter(|w| !missing_set.contains(w.key.as_str()))
                    .cloned()
                    .map(Finding::from),
            )
            .chain(notices.into_iter().map(Finding::from))
            .chain(extraction.parse_errors.iter().cloned().map(Finding::from));
        let items = findings.map(|f| f.to_item(&policy)).collect();

        Ok(SyncSummary {
            files_scanned: files.len(),
            references: extraction.references.len(),
            cache_hits: extraction.cache_hits,
            cache_misses: extraction.cache_misses,
            cache_invalidated,
            source_locale: source_locale.to_string(),
            target_locales,
            missing_keys,
            unused_keys,
            unused_analysis_skipped: filtered,
            placeholder_issues,
            empty_values,
            dynamic_key_warnings: extraction.dynamic_key_warnings,
            suspicious_keys,
            parse_errors: extraction.parse_errors,
            assumed_keys: assumed.iter().map(|p| p.as_str().to_string()).collect(),
            changes,
            backup_path,
            written,
            items,
            projection,
        })
    }

    fn assumed_patterns(&self, options: &SyncOptions) -> SyncResult<Vec<KeyPattern>> {
        let mut seen = BTreeSet::new();
        self.config
            .assumed_keys
            .iter()
            .chain(&options.assumed_keys)
            .filter(|p| seen.insert(p.as_str()))
            .map(|p| {
                KeyPattern::new(p).map_err(|e| {
                    SyncError::Config(format!("invalid assumed key pattern \"{}\": {}", p, e))
                })
            })
            .collect()
    }

    fn resolve_files(&self, options: &SyncOptions) -> Vec<PathBuf> {
        let config = &self.config;
        let source_root = self.root.join(&config.source_root);
        let scan = scan_files(
            &source_root,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
        );
        if scan.skipped_count > 0 {
            tracing::debug!(skipped = scan.skipped_count, "skipped source paths");
        }

        if options.target_files.is_empty() {
            scan.files
        } else {
            filter_targets(&scan.files, &options.target_files, &self.root)
        }
    }

    /// Extract references, consulting and refreshing the on-disk cache.
    fn extract(
        &self,
        files: &[PathBuf],
        assumed: &[KeyPattern],
        filtered: bool,
        options: &SyncOptions,
    ) -> SyncResult<(ExtractionResult, Option<String>)> {
        let config = &self.config;
        let manager = CacheManager::new(self.root.join(&config.cache_dir), config.cache);
        let metadata = CacheMetadata::current(config, self.enumerator.signature());
        let prepared = manager.prepare(
            &metadata,
            &config.translation_identifier,
            options.invalidate_cache,
        );

        let literal_keys: Vec<String> = assumed
            .iter()
            .filter(|p| !p.is_glob())
            .map(|p| p.as_str().to_string())
            .collect();

        let extractor = ReferenceExtractor::new(
            &self.root,
            &config.translation_identifier,
            self.enumerator.as_ref(),
        );
        let mut output = extractor.extract(files, prepared.cache.as_ref(), &literal_keys)?;

        // A narrowed run only saw some files; keep the rest of the cache.
        if filtered && let Some(previous) = prepared.cache {
            for (path, entry) in previous.files {
                output.cache.files.entry(path).or_insert(entry);
            }
        }
        manager.persist(&metadata, &output.cache);

        Ok((output.result, prepared.invalidated.map(|r| r.to_string())))
    }

    fn load_store(&self) -> SyncResult<LocaleStore> {
        let config = &self.config;
        let dir = self.locales_dir();

        let mut locales = vec![config.source_locale.clone()];
        let targets = if config.target_locales.is_empty() {
            LocaleStore::discover_locales(&dir)?
        } else {
            config.target_locales.clone()
        };
        for locale in targets {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }

        LocaleStore::load(&dir, &locales, config.key_style, &config.key_delimiter)
    }
}

fn push_change(changes: &mut BTreeMap<String, Vec<String>>, locale: &str, key: &str) {
    changes
        .entry(locale.to_string())
        .or_default()
        .push(key.to_string());
}

/// Restrict every locale to `keys`.
fn scope_to_keys(snapshot: &AllLocaleData, keys: &BTreeSet<String>) -> AllLocaleData {
    snapshot
        .iter()
        .map(|(locale, data)| {
            let data = data
                .iter()
                .filter(|(key, _)| keys.contains(*key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            (locale.clone(), data)
        })
        .collect()
}

fn assumed_notices(assumed: &[KeyPattern], snapshot: &AllLocaleData) -> Vec<AssumedKeyNotice> {
    let available: HashSet<String> = snapshot
        .values()
        .flat_map(|data| data.keys().cloned())
        .collect();
    assumed
        .iter()
        .map(|pattern| AssumedKeyNotice {
            pattern: pattern.as_str().to_string(),
            matched: expand_glob_pattern(pattern, &available),
        })
        .collect()
}
