//! Built-in category declarations
//!
//! Every list is a plain filename list; order is the order programs are run in when the
//! category is requested by name, so keep the smallest reproducer first.
//!
//! `known-failures` is the default exclusion set. It should only ever shrink as dj2ll
//! improves; when a file has to be added, say why next to it.

/// Name of the default exclusion category.
pub const KNOWN_FAILURES: &str = "known-failures";

/// A statically declared category: name, one-line description, ordered members.
pub struct CategoryDecl {
    pub name: &'static str,
    pub description: &'static str,
    pub members: &'static [&'static str],
}

pub const BUILTIN: &[CategoryDecl] = &[
    CategoryDecl {
        name: KNOWN_FAILURES,
        description: "programs dj2ll does not yet compile or run correctly (excluded by default)",
        members: &[
            "good06.dj",
            "good07.dj",
            "good08.dj",
            "good09.dj",
            "good15.dj",
            "good17.dj",
            "good19.dj",
            "good20.dj",
            "good21.dj",
            "good22.dj",
            "good30.dj",
            "good33.dj",
            "goodMine1.dj",
        ],
    },
    CategoryDecl {
        name: "undotted-calls",
        description: "method calls written without an explicit receiver",
        members: &["good15.dj", "good06.dj", "good21.dj", "good33.dj"],
    },
    CategoryDecl {
        name: "vtables",
        description: "virtual dispatch through class method tables",
        members: &["good07.dj", "good08.dj", "good09.dj", "good19.dj", "good20.dj"],
    },
    CategoryDecl {
        name: "null-handling",
        description: "null literals, null comparisons and null object fields",
        members: &["good17.dj", "good22.dj", "good30.dj", "goodMine1.dj"],
    },
];
