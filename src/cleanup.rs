//! End-of-run artifact removal
//!
//! Runs once per invocation, after the loop ends or is stopped. Only regular files whose name
//! is a derived artifact name are touched. Removal failures are logged and otherwise ignored.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::TestFile;
use crate::errors::HarnessError;

/// What cleanup did.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<HarnessError>,
}

/// Artifact names for every file in `files`, deduplicated. Files without an extension have no
/// artifact and are skipped.
pub fn artifact_names<'a>(files: impl IntoIterator<Item = &'a TestFile>) -> BTreeSet<String> {
    files
        .into_iter()
        .filter_map(|f| f.artifact_name().map(str::to_string))
        .collect()
}

/// Remove each file in `dir` whose name is in `names`.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), candidates = names.len()))]
pub fn cleanup_artifacts(dir: &Path, names: &BTreeSet<String>) -> CleanupReport {
    let mut report = CleanupReport::default();

    for name in names {
        let path = dir.join(name);
        let is_file = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.is_file() || meta.file_type().is_symlink(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                report.failed.push(HarnessError::Cleanup { path, source: e });
                continue;
            }
        };
        if !is_file {
            tracing::debug!(path = %path.display(), "not a file, leaving in place");
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => report.failed.push(HarnessError::Cleanup { path, source: e }),
        }
    }

    for err in &report.failed {
        tracing::warn!("{}", err);
    }
    tracing::debug!(removed = report.removed.len(), "cleanup finished");
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_dedupe_and_skip_extensionless() {
        let files = [TestFile::new("goodA.dj"), TestFile::new("goodA.dj"), TestFile::new("README")];
        let names = artifact_names(&files);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["goodA".to_string()]);
    }

    #[test]
    fn removes_only_named_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("goodA"), "bin").unwrap();
        fs::write(dir.path().join("goodA.dj"), "src").unwrap();
        fs::write(dir.path().join("goodish"), "keep").unwrap();
        fs::create_dir(dir.path().join("goodC")).unwrap();

        let names: BTreeSet<String> = ["goodA", "goodB", "goodC"].iter().map(|s| s.to_string()).collect();
        let report = cleanup_artifacts(dir.path(), &names);

        assert_eq!(report.removed, vec![dir.path().join("goodA")]);
        assert!(report.failed.is_empty());
        assert!(!dir.path().join("goodA").exists());
        assert!(dir.path().join("goodA.dj").exists());
        assert!(dir.path().join("goodish").exists());
        assert!(dir.path().join("goodC").is_dir());
    }
}
