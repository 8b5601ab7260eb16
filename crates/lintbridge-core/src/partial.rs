//! Partial-results directory maintenance.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Per-module result file the analyzer writes during its report phase.
/// Keeping it in the partial results makes outputs depend on the reporting
/// run, so it is removed before they are exported.
pub const DEFINITE_RESULTS_FILE: &str = "lint-definite-all.xml";

/// Remove `dir` with its contents and recreate it empty.
pub fn reset(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io("remove directory", dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io("create directory", dir, e))
}

/// Delete every [`DEFINITE_RESULTS_FILE`] under `dir`; returns the count.
pub fn prune(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for path in list_files(dir)? {
        if path.file_name().is_some_and(|n| n == DEFINITE_RESULTS_FILE) {
            fs::remove_file(&path).map_err(|e| Error::io("remove file", &path, e))?;
            debug!(path = %path.display(), "pruned partial result");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Files beneath `dir` in sorted walk order. Missing directories have none.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_removes_only_definite_results() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("app");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join(DEFINITE_RESULTS_FILE), "").unwrap();
        fs::write(module.join("lint-partial-all.xml"), "").unwrap();
        fs::write(dir.path().join(DEFINITE_RESULTS_FILE), "").unwrap();

        assert_eq!(prune(dir.path()).unwrap(), 2);
        assert_eq!(
            list_files(dir.path()).unwrap(),
            vec![module.join("lint-partial-all.xml")]
        );
    }

    #[test]
    fn prune_of_missing_dir_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(prune(&dir.path().join("nope")).unwrap(), 0);
    }

    #[test]
    fn reset_empties_directory() {
        let dir = tempfile::tempdir().unwrap();
        let partial = dir.path().join("partial");
        fs::create_dir_all(partial.join("nested")).unwrap();
        fs::write(partial.join("nested").join("x.xml"), "x").unwrap();

        reset(&partial).unwrap();

        assert!(partial.is_dir());
        assert!(list_files(&partial).unwrap().is_empty());
    }
}
