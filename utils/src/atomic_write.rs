//! Atomic file write helpers.
//!
//! Snapshots are written to a temp file in the destination directory and then
//! renamed over the target, so a reader sees either the previous complete file
//! or the new one. Where rename-over-existing fails (Windows), the old file is
//! moved to `.bak` first and restored if the final rename fails.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Recover from an interrupted atomic write by restoring the `.bak` file.
///
/// If `path` does not exist but `path.bak` does, a crash happened between
/// moving the old snapshot aside and renaming the new one into place.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if !path.exists() && backup.exists() {
        match fs::rename(&backup, path) {
            Ok(()) => {
                tracing::warn!(
                    path = %path.display(),
                    "Recovered .bak file from interrupted atomic write"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to recover .bak file: {e}"
                );
            }
        }
    }
}

/// Replace `path` with `bytes`: temp file in the same directory, `sync_all`,
/// rename, then a best-effort sync of the parent directory.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_dir(path);

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        if path.exists() {
            let backup_path = path.with_extension("bak");
            let _ = fs::remove_file(&backup_path);
            fs::rename(path, &backup_path)?;

            if let Err(rename_err) = err.file.persist(path) {
                let _ = fs::rename(&backup_path, path);
                return Err(rename_err.error);
            }
            if let Err(e) = fs::remove_file(&backup_path) {
                tracing::warn!(
                    path = %backup_path.display(),
                    "Failed to remove .bak after atomic write: {e}"
                );
            }
        } else {
            return Err(err.error);
        }
    }

    best_effort_sync_parent_dir(parent);

    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn best_effort_sync_parent_dir(parent: &Path) {
    #[cfg(unix)]
    if let Err(e) = fs::File::open(parent).and_then(|d| d.sync_all()) {
        debug!(path = %parent.display(), "Parent directory sync_all failed (best-effort): {e}");
    }

    #[cfg(not(unix))]
    let _ = parent;
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{atomic_write, recover_bak_file};

    #[test]
    fn atomic_write_overwrites_existing_and_cleans_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.json");

        atomic_write(&path, b"{}").expect("write one");
        atomic_write(&path, b"{\"a\":1}").expect("write two");

        let content = fs::read_to_string(&path).expect("read");
        assert_eq!(content, "{\"a\":1}");
        assert!(!path.with_extension("bak").exists());
    }

    #[test]
    fn atomic_write_fails_when_parent_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("file.json");
        assert!(atomic_write(&path, b"{}").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn atomic_write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.json");

        atomic_write(&path, b"[]").expect("write");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("file.json")]);
    }

    #[test]
    fn recover_bak_restores_interrupted_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.json");
        fs::write(path.with_extension("bak"), b"{\"old\":true}").expect("write bak");

        recover_bak_file(&path);

        assert_eq!(fs::read_to_string(&path).expect("read"), "{\"old\":true}");
        assert!(!path.with_extension("bak").exists());
    }

    #[test]
    fn recover_bak_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file.json");
        fs::write(&path, b"current").expect("write");
        fs::write(path.with_extension("bak"), b"stale").expect("write bak");

        recover_bak_file(&path);

        assert_eq!(fs::read_to_string(&path).expect("read"), "current");
    }
}
