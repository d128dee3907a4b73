use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use walkdir::WalkDir;

use crate::core::error::{SyncError, SyncResult};

/// Copy `locales_dir` into a fresh timestamped directory under `backup_root`.
///
/// Every copied file is synced to disk before this returns, so a removal
/// that follows can always be undone from the backup.
pub fn create_backup(locales_dir: &Path, backup_root: &Path) -> SyncResult<PathBuf> {
    let stamp = timestamp(OffsetDateTime::now_utc())
        .map_err(|e| SyncError::write(backup_root, io::Error::other(e)))?;
    let target = unique_dir(backup_root, &stamp);
    fs::create_dir_all(&target).map_err(|e| SyncError::write(&target, e))?;

    let mut copied = 0;
    let walker = WalkDir::new(locales_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(backup_root));
    for entry in walker {
        let entry = entry.map_err(|e| SyncError::read(locales_dir, e.into()))?;
        let Ok(relative) = entry.path().strip_prefix(locales_dir) else {
            continue;
        };
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| SyncError::write(&dest, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest).map_err(|e| SyncError::write(&dest, e))?;
            File::open(&dest)
                .and_then(|f| f.sync_all())
                .map_err(|e| SyncError::write(&dest, e))?;
            copied += 1;
        }
    }

    tracing::info!(path = %target.display(), files = copied, "created locale backup");
    Ok(target)
}

/// `20260118T093005123Z`
const BACKUP_STAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year][month][day]T[hour][minute][second][subsecond digits:3]Z"
);

fn timestamp(now: OffsetDateTime) -> Result<String, time::error::Format> {
    now.format(BACKUP_STAMP)
}

fn unique_dir(root: &Path, name: &str) -> PathBuf {
    let mut candidate = root.join(name);
    let mut n = 1;
    while candidate.exists() {
        candidate = root.join(format!("{}-{}", name, n));
        n += 1;
    }
    candidate
}
