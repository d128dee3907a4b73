//! Reference extraction with fingerprint caching.
//!
//! Files are fingerprinted and either served from the cache or read and
//! enumerated through a `CallEnumerator`. Work is spread across rayon workers;
//! the combined output is sorted so it never depends on scheduling.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::core::{
    cache::{Fingerprint, ReferenceCacheEntry, ReferenceCacheFile},
    data::{
        DynamicKeyWarning, ParseFailure, TranslationReference, reference::compare_references,
        reference::compare_warnings,
    },
    error::{SyncError, SyncResult},
    extract::call::{CallArgument, CallEnumerator, ParsedCall, callee_matches},
    utils::relative_path,
};

#[derive(Debug, Default, Clone)]
pub struct ExtractionResult {
    /// Sorted by file path, line, column, key.
    pub references: Vec<TranslationReference>,
    pub references_by_key: BTreeMap<String, Vec<TranslationReference>>,
    /// Referenced keys plus assumed literal keys.
    pub key_set: BTreeSet<String>,
    pub dynamic_key_warnings: Vec<DynamicKeyWarning>,
    pub parse_errors: Vec<ParseFailure>,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Extraction output plus the cache snapshot to persist for the next run.
#[derive(Debug)]
pub struct ExtractionOutput {
    pub result: ExtractionResult,
    pub cache: ReferenceCacheFile,
}

enum FileOutcome {
    Cached {
        relative: String,
        entry: ReferenceCacheEntry,
    },
    Extracted {
        relative: String,
        entry: ReferenceCacheEntry,
    },
    Failed(ParseFailure),
}

pub struct ReferenceExtractor<'a> {
    root: &'a Path,
    translation_identifier: &'a str,
    enumerator: &'a dyn CallEnumerator,
}

impl<'a> ReferenceExtractor<'a> {
    pub fn new(
        root: &'a Path,
        translation_identifier: &'a str,
        enumerator: &'a dyn CallEnumerator,
    ) -> Self {
        Self {
            root,
            translation_identifier,
            enumerator,
        }
    }

    /// Extract references from `files`.
    ///
    /// `cache` entries are reused when their fingerprint still matches.
    /// `assumed_keys` are merged into the key set without references.
    /// Fails on the first file that cannot be read or fingerprinted.
    pub fn extract(
        &self,
        files: &[PathBuf],
        cache: Option<&ReferenceCacheFile>,
        assumed_keys: &[String],
    ) -> SyncResult<ExtractionOutput> {
        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| self.process_file(path, cache))
            .collect::<SyncResult<_>>()?;

        let mut result = ExtractionResult::default();
        let mut next_cache = ReferenceCacheFile::new(self.translation_identifier);

        for outcome in outcomes {
            match outcome {
                FileOutcome::Cached { relative, entry } => {
                    result.cache_hits += 1;
                    absorb(&mut result, &entry);
                    next_cache.insert(relative, entry);
                }
                FileOutcome::Extracted { relative, entry } => {
                    result.cache_misses += 1;
                    absorb(&mut result, &entry);
                    next_cache.insert(relative, entry);
                }
                FileOutcome::Failed(failure) => {
                    result.cache_misses += 1;
                    result.parse_errors.push(failure);
                }
            }
        }

        result.references.sort_by(compare_references);
        result.dynamic_key_warnings.sort_by(compare_warnings);
        result.parse_errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        for reference in &result.references {
            result
                .references_by_key
                .entry(reference.key.clone())
                .or_default()
                .push(reference.clone());
        }
        result.key_set = result.references_by_key.keys().cloned().collect();
        result.key_set.extend(assumed_keys.iter().cloned());

        tracing::debug!(
            files = files.len(),
            references = result.references.len(),
            hits = result.cache_hits,
            misses = result.cache_misses,
            "extracted references"
        );

        Ok(ExtractionOutput {
            result,
            cache: next_cache,
        })
    }

    fn process_file(
        &self,
        path: &Path,
        cache: Option<&ReferenceCacheFile>,
    ) -> SyncResult<FileOutcome> {
        let relative = relative_path(path, self.root);
        let fingerprint = Fingerprint::of(path).map_err(|e| SyncError::read(path, e))?;

        if let Some(entry) = cache.and_then(|c| c.lookup(&relative, &fingerprint)) {
            tracing::debug!(file = %relative, "cache hit");
            return Ok(FileOutcome::Cached {
                relative,
                entry: entry.clone(),
            });
        }

        let bytes = fs::read(path).map_err(|e| SyncError::read(path, e))?;
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                return Ok(FileOutcome::Failed(ParseFailure {
                    file_path: relative,
                    error: e.to_string(),
                }));
            }
        };

        match self.enumerator.enumerate(source, &relative) {
            Ok(calls) => {
                tracing::debug!(file = %relative, calls = calls.len(), "parsed");
                let entry = self.classify(&relative, fingerprint, calls);
                Ok(FileOutcome::Extracted { relative, entry })
            }
            Err(error) => {
                tracing::debug!(file = %relative, %error, "parse failed");
                Ok(FileOutcome::Failed(ParseFailure {
                    file_path: relative,
                    error,
                }))
            }
        }
    }

    fn classify(
        &self,
        relative: &str,
        fingerprint: Fingerprint,
        calls: Vec<ParsedCall>,
    ) -> ReferenceCacheEntry {
        let mut references = Vec::new();
        let mut dynamic_key_warnings = Vec::new();

        for call in calls {
            if !callee_matches(&call.callee, self.translation_identifier) {
                continue;
            }
            let Some(argument) = call.argument else {
                continue;
            };
            match argument.dynamic_reason() {
                None => {
                    if let CallArgument::Literal(key) = argument {
                        references.push(TranslationReference::new(key, relative, call.position));
                    }
                }
                Some(reason) => dynamic_key_warnings.push(DynamicKeyWarning {
                    file_path: relative.to_string(),
                    position: call.position,
                    expression: argument.text().to_string(),
                    reason,
                }),
            }
        }

        ReferenceCacheEntry {
            fingerprint,
            references,
            dynamic_key_warnings,
        }
    }
}

fn absorb(result: &mut ExtractionResult, entry: &ReferenceCacheEntry) {
    result.references.extend(entry.references.iter().cloned());
    result
        .dynamic_key_warnings
        .extend(entry.dynamic_key_warnings.iter().cloned());
}
