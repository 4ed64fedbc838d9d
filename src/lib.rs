#![forbid(unsafe_code)]
//! djharness: interactive regression driver for the dj2ll compiler
//!
//! The harness lists the `.dj` programs in a corpus directory, narrows them down with
//! statically declared categories, and walks the result one file at a time: show the
//! source, compile it with the external compiler, run the produced binary, then wait
//! for the operator before moving on. Generated binaries are removed when the run ends.
//!
//! ## Flow
//!
//! `catalog` -> `selector` -> `run_loop` (driving `pipeline` per file) -> `cleanup`
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The crate denies
//!   `clippy::unwrap_used` and `clippy::expect_used`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests (`#[allow]` on the test module).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod catalog;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod errors;
pub mod gate;
pub mod highlight;
pub mod pipeline;
pub mod run_loop;
pub mod selector;
pub mod version;

pub use catalog::{CategoryCatalog, CategorySet, TestFile, list_corpus};
pub use config::HarnessConfig;
pub use errors::{HarnessError, HarnessResult};
pub use run_loop::{RunLoop, RunReport};
pub use selector::select;
