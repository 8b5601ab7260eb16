//! Baseline file bookkeeping around an analyzer run.
//!
//! The analyzer updates its baseline in place, so it is pointed at a working
//! copy. After the run the copy is sanitized into the declared output so it
//! carries no sandbox-specific paths.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::sanitize::Sanitizer;

pub const WORKING_BASELINE: &str = "baseline.xml";

/// Copy `original` into `<working_dir>/baseline.xml` if it exists.
///
/// Returns the working path either way; a missing file lets the analyzer
/// start a fresh baseline there.
pub fn prepare_baseline(working_dir: &Path, original: Option<&Path>) -> Result<PathBuf> {
    let target = working_dir.join(WORKING_BASELINE);
    if let Some(original) = original.filter(|p| p.is_file()) {
        fs::copy(original, &target).map_err(|e| Error::io("copy baseline", original, e))?;
        debug!(from = %original.display(), to = %target.display(), "prepared working baseline");
    }
    Ok(target)
}

/// Write the sanitized form of `new_baseline` to `updated`.
pub fn post_process(new_baseline: &Path, updated: &Path, sanitizer: &Sanitizer) -> Result<()> {
    if let Some(parent) = updated.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
    }
    sanitizer.sanitize_file(new_baseline, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedEnv;

    #[test]
    fn copies_existing_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("lint_baseline.xml");
        fs::write(&original, "<issues/>").unwrap();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();

        let path = prepare_baseline(&work, Some(&original)).unwrap();

        assert_eq!(path, work.join("baseline.xml"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<issues/>");
    }

    #[test]
    fn missing_baseline_only_returns_path() {
        let dir = tempfile::tempdir().unwrap();

        let path = prepare_baseline(dir.path(), Some(&dir.path().join("absent.xml"))).unwrap();
        assert!(!path.exists());

        let path = prepare_baseline(dir.path(), None).unwrap();
        assert_eq!(path, dir.path().join("baseline.xml"));
    }

    #[test]
    fn post_process_sanitizes_into_output() {
        let dir = tempfile::tempdir().unwrap();
        let exec_root = "private/var/tmp/_bazel_root/abc/sandbox/linux-sandbox/4/execroot/ws";
        let raw = dir.path().join("raw.xml");
        fs::write(
            &raw,
            format!("<location\n        file=\"../../{exec_root}/app/res/values.xml\"/>\n"),
        )
        .unwrap();
        let updated = dir.path().join("out").join("baseline.xml");
        let sanitizer = Sanitizer::from_env(&FixedEnv::new(format!("/{exec_root}")));

        post_process(&raw, &updated, &sanitizer).unwrap();

        assert_eq!(
            fs::read_to_string(updated).unwrap(),
            "<location\n        file=\"app/res/values.xml\"/>\n"
        );
    }
}
