//! Selection of the files to run
//!
//! - No category: every corpus file not in the default exclusion set, sorted by filename.
//! - A known category: its members in declaration order, whether or not they exist on disk.
//! - An unknown category: `UnknownCategory`, before anything is compiled or run.

use std::collections::BTreeSet;

use crate::catalog::{CategoryCatalog, TestFile};
use crate::errors::{HarnessError, HarnessResult};

/// Resolve the ordered list of files for this run.
pub fn select(
    corpus: &BTreeSet<String>,
    catalog: &CategoryCatalog,
    requested: Option<&str>,
) -> HarnessResult<Vec<TestFile>> {
    let Some(name) = requested else {
        let excluded = catalog.default_exclusion();
        // BTreeSet iteration is already ascending lexicographic
        return Ok(corpus
            .iter()
            .filter(|file| !excluded.contains(file))
            .map(TestFile::new)
            .collect());
    };

    let set = catalog.get(name).ok_or_else(|| HarnessError::UnknownCategory {
        name: name.to_string(),
        known: catalog.names(),
    })?;

    Ok(set.members.iter().map(TestFile::new).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CategorySet, KNOWN_FAILURES};

    fn corpus(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn names(files: &[TestFile]) -> Vec<&str> {
        files.iter().map(TestFile::name).collect()
    }

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(
            CategorySet::new(KNOWN_FAILURES, ["goodB.dj"]),
            vec![CategorySet::new("vtables", ["goodZ.dj", "goodA.dj"])],
        )
    }

    #[test]
    fn default_selection_excludes_and_sorts() {
        let files = select(&corpus(&["goodC.dj", "goodA.dj", "goodB.dj"]), &catalog(), None).unwrap();
        assert_eq!(names(&files), vec!["goodA.dj", "goodC.dj"]);
    }

    #[test]
    fn named_category_keeps_declaration_order() {
        let files = select(&corpus(&["goodA.dj"]), &catalog(), Some("vtables")).unwrap();
        assert_eq!(names(&files), vec!["goodZ.dj", "goodA.dj"]);
    }

    #[test]
    fn default_exclusion_can_be_requested_by_name() {
        let files = select(&corpus(&[]), &catalog(), Some(KNOWN_FAILURES)).unwrap();
        assert_eq!(names(&files), vec!["goodB.dj"]);
    }

    #[test]
    fn unknown_category_fails() {
        let err = select(&corpus(&["goodA.dj"]), &catalog(), Some("vtable")).unwrap_err();
        match err {
            HarnessError::UnknownCategory { name, known } => {
                assert_eq!(name, "vtable");
                assert_eq!(known, vec![KNOWN_FAILURES.to_string(), "vtables".to_string()]);
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let files = select(&corpus(&["goodB.dj"]), &catalog(), None).unwrap();
        assert!(files.is_empty());
    }
}
