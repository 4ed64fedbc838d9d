//! Layering guardrails to keep the library independent of the CLI.
//!
//! Selection, pipeline, run loop and cleanup must stay usable without the terminal front end
//! (the integration tests drive them directly). This test scans their sources and fails if
//! any of them imports from `crate::cli`.

const LIBRARY_SOURCES: &[(&str, &str)] = &[
    ("catalog/mod.rs", include_str!("../src/catalog/mod.rs")),
    ("catalog/categories.rs", include_str!("../src/catalog/categories.rs")),
    ("cleanup.rs", include_str!("../src/cleanup.rs")),
    ("config.rs", include_str!("../src/config.rs")),
    ("errors.rs", include_str!("../src/errors.rs")),
    ("gate.rs", include_str!("../src/gate.rs")),
    ("highlight.rs", include_str!("../src/highlight.rs")),
    ("pipeline.rs", include_str!("../src/pipeline.rs")),
    ("run_loop.rs", include_str!("../src/run_loop.rs")),
    ("selector.rs", include_str!("../src/selector.rs")),
];

#[test]
fn library_modules_do_not_depend_on_cli() {
    for (file, source) in LIBRARY_SOURCES {
        for (lineno, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.starts_with("//") {
                continue;
            }
            assert!(
                !line.contains("crate::cli"),
                "src/{}:{} imports from the CLI layer: `{}`",
                file,
                lineno + 1,
                line
            );
        }
    }
}

#[test]
fn only_the_cli_exits_the_process() {
    for (file, source) in LIBRARY_SOURCES {
        assert!(
            !source.contains("process::exit"),
            "src/{} calls process::exit; return an error instead",
            file
        );
    }
}
