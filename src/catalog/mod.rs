//! Corpus catalog
//!
//! Lists the candidate test programs in the corpus directory and holds the named categories
//! that filter them. Category membership is exact filename match; there is no globbing.
//!
//! ## Notes
//!
//! - The listing is every entry name in the directory. An optional extension filter narrows it
//!   for corpora that share a directory with other files; it is off unless configured.
//! - Categories are decoupled from the listing: a category may name files that are not on
//!   disk. `CategoryCatalog::validate` reports those as warnings instead of failing.

pub mod categories;

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{HarnessError, HarnessResult};

pub use categories::KNOWN_FAILURES;

// ============================================================================
// Test files
// ============================================================================

/// A test program, identified by its filename within the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestFile {
    name: String,
}

impl TestFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Filename, e.g. `good01.dj`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the binary the compiler produces: the filename with its extension removed.
    ///
    /// Returns `None` when the name has no extension, since the artifact would then share the
    /// source file's name.
    pub fn artifact_name(&self) -> Option<&str> {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(stem),
            _ => None,
        }
    }

    /// Path of the source file inside `corpus_dir`.
    pub fn path_in(&self, corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(&self.name)
    }
}

impl std::fmt::Display for TestFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// List the names of the entries in `dir`.
///
/// With `extension` set, only names ending in `.<extension>` are kept. Names that are not valid
/// UTF-8 cannot be passed through the category catalog and are skipped.
///
/// ## Errors
///
/// `CorpusUnavailable` if the directory is missing or cannot be read.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn list_corpus(dir: &Path, extension: Option<&str>) -> HarnessResult<BTreeSet<String>> {
    let unavailable = |source| HarnessError::CorpusUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let entries = fs::read_dir(dir).map_err(unavailable)?;
    let mut files = BTreeSet::new();

    for entry in entries {
        let entry = entry.map_err(unavailable)?;

        match entry.file_name().into_string() {
            Ok(name) => {
                if let Some(ext) = extension {
                    if Path::new(&name).extension().and_then(|e| e.to_str()) != Some(ext) {
                        continue;
                    }
                }
                files.insert(name);
            }
            Err(name) => {
                tracing::debug!("skipping non UTF-8 corpus entry {:?}", name);
            }
        }
    }

    tracing::debug!(count = files.len(), "corpus listed");
    Ok(files)
}

// ============================================================================
// Categories
// ============================================================================

/// A named, ordered list of corpus filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
}

impl CategorySet {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn contains(&self, file: &str) -> bool {
        self.members.iter().any(|m| m == file)
    }
}

/// Problems found when checking categories against the corpus listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// A category names a file that is not in the corpus directory
    MissingFile { category: String, file: String },
    /// A category lists the same file more than once
    DuplicateMember { category: String, file: String },
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogWarning::MissingFile { category, file } => {
                write!(f, "category '{}' lists '{}', which is not in the corpus", category, file)
            }
            CatalogWarning::DuplicateMember { category, file } => {
                write!(f, "category '{}' lists '{}' more than once", category, file)
            }
        }
    }
}

/// All declared categories, including the default exclusion set.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    default_exclusion: CategorySet,
    subsets: Vec<CategorySet>,
}

impl CategoryCatalog {
    /// Build a catalog from a default exclusion set and any number of named subsets.
    pub fn new(default_exclusion: CategorySet, subsets: Vec<CategorySet>) -> Self {
        Self {
            default_exclusion,
            subsets,
        }
    }

    /// The categories compiled into the harness.
    pub fn builtin() -> Self {
        let mut sets = categories::BUILTIN.iter().map(|decl| {
            CategorySet::new(decl.name, decl.members.iter().copied()).with_description(decl.description)
        });
        // BUILTIN always starts with the known-failures set
        let default_exclusion = sets
            .next()
            .unwrap_or_else(|| CategorySet::new(KNOWN_FAILURES, Vec::<String>::new()));
        Self::new(default_exclusion, sets.collect())
    }

    /// Files excluded when no category is requested.
    pub fn default_exclusion(&self) -> &CategorySet {
        &self.default_exclusion
    }

    /// Look up a category by exact name. The default exclusion set can be requested too.
    pub fn get(&self, name: &str) -> Option<&CategorySet> {
        self.iter().find(|set| set.name == name)
    }

    /// Every category, default exclusion first, then subsets in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CategorySet> {
        std::iter::once(&self.default_exclusion).chain(self.subsets.iter())
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|set| set.name.clone()).collect()
    }

    /// Check every category against the corpus listing.
    pub fn validate(&self, corpus: &BTreeSet<String>) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();

        for set in self.iter() {
            let mut seen = HashSet::new();
            for member in &set.members {
                if !seen.insert(member.as_str()) {
                    warnings.push(CatalogWarning::DuplicateMember {
                        category: set.name.clone(),
                        file: member.clone(),
                    });
                    continue;
                }
                if !corpus.contains(member) {
                    warnings.push(CatalogWarning::MissingFile {
                        category: set.name.clone(),
                        file: member.clone(),
                    });
                }
            }
        }

        warnings
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn corpus(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn artifact_name_strips_extension() {
        assert_eq!(TestFile::new("goodA.dj").artifact_name(), Some("goodA"));
        assert_eq!(TestFile::new("good.v2.dj").artifact_name(), Some("good.v2"));
    }

    #[test]
    fn artifact_name_requires_extension() {
        assert_eq!(TestFile::new("goodA").artifact_name(), None);
        assert_eq!(TestFile::new(".dj").artifact_name(), None);
        assert_eq!(TestFile::new("goodA.").artifact_name(), None);
    }

    #[test]
    fn builtin_catalog_starts_with_known_failures() {
        let catalog = CategoryCatalog::builtin();
        assert_eq!(catalog.default_exclusion().name, KNOWN_FAILURES);
        assert!(catalog.default_exclusion().contains("good06.dj"));
        assert_eq!(catalog.names()[0], KNOWN_FAILURES);
        assert!(catalog.get("vtables").is_some());
        assert!(catalog.get("null-handling").is_some());
        assert!(catalog.get("undotted-calls").is_some());
    }

    #[test]
    fn builtin_categories_are_duplicate_free() {
        let catalog = CategoryCatalog::builtin();
        let all: BTreeSet<String> = catalog.iter().flat_map(|s| s.members.clone()).collect();
        assert!(catalog.validate(&all).is_empty());
    }

    #[test]
    fn validate_reports_missing_and_duplicate_members() {
        let catalog = CategoryCatalog::new(
            CategorySet::new(KNOWN_FAILURES, ["goodB.dj"]),
            vec![CategorySet::new("vtables", ["goodA.dj", "goodZ.dj", "goodA.dj"])],
        );
        let warnings = catalog.validate(&corpus(&["goodA.dj", "goodB.dj"]));
        assert_eq!(
            warnings,
            vec![
                CatalogWarning::MissingFile {
                    category: "vtables".to_string(),
                    file: "goodZ.dj".to_string()
                },
                CatalogWarning::DuplicateMember {
                    category: "vtables".to_string(),
                    file: "goodA.dj".to_string()
                },
            ]
        );
    }

    #[test]
    fn list_corpus_returns_every_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("goodA.dj"), "").unwrap();
        fs::write(dir.path().join("goodB.java"), "").unwrap();
        fs::write(dir.path().join("README"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_corpus(dir.path(), None).unwrap();
        assert_eq!(files, corpus(&["README", "goodA.dj", "goodB.java", "nested"]));
    }

    #[test]
    fn list_corpus_extension_filter() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("goodB.dj"), "").unwrap();
        fs::write(dir.path().join("goodA.dj"), "").unwrap();
        fs::write(dir.path().join("goodA"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = list_corpus(dir.path(), Some("dj")).unwrap();
        assert_eq!(files, corpus(&["goodA.dj", "goodB.dj"]));
    }

    #[test]
    fn list_corpus_missing_dir_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = list_corpus(&missing, None).unwrap_err();
        assert!(matches!(err, HarnessError::CorpusUnavailable { path, .. } if path == missing));
    }
}
