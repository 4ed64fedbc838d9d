//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::catalog::{CategoryCatalog, TestFile, list_corpus};
use crate::cleanup::{CleanupReport, artifact_names, cleanup_artifacts};
use crate::config::HarnessConfig;
use crate::gate::{OperatorGate, stdin_gate};
use crate::highlight::{Highlighter, PlainHighlighter, PygmentizeHighlighter};
use crate::pipeline::{PipelineExecutor, ProcessPipeline};
use crate::run_loop::{RunLoop, RunReport};
use crate::selector::select;

use super::{CliError, CliResult, ExitCode};

/// Run the selected programs interactively, then clean up their artifacts.
///
/// Corpus and category problems are reported before anything is compiled. Once the loop has
/// started, the exit code is success: whether each program behaved is for the operator to judge.
pub fn run_harness(config: &HarnessConfig, category: Option<&str>) -> CliResult<ExitCode> {
    let corpus = list_corpus(&config.corpus_dir, config.source_extension.as_deref())?;
    let catalog = CategoryCatalog::builtin();
    for warning in catalog.validate(&corpus) {
        tracing::warn!("{}", warning);
    }

    let files = select(&corpus, &catalog, category)?;
    tracing::info!(
        category = category.unwrap_or("<default>"),
        selected = files.len(),
        corpus = corpus.len(),
        "selection resolved"
    );

    let mut pipeline = ProcessPipeline::new(config);
    let highlighter: Box<dyn Highlighter> = if config.highlight {
        Box::new(PygmentizeHighlighter::new())
    } else {
        Box::new(PlainHighlighter)
    };
    let mut gate = stdin_gate();
    let mut stdout = io::stdout();

    let (run, _cleanup) = run_selection(
        config,
        &corpus,
        &files,
        &mut pipeline,
        highlighter.as_ref(),
        &mut gate,
        &mut stdout,
    );

    run.map(|_| ExitCode::SUCCESS)
        .map_err(|e| CliError::failure(format!("Error writing to terminal: {}", e)))
}

/// Drive the run loop over `files`, then remove artifacts exactly once, whether the loop ran to
/// the end, was stopped by the operator, or failed writing its output.
///
/// Cleanup targets the artifact names of the whole corpus listing plus the selection, since a
/// category may name files that are not in the listing.
pub fn run_selection<W: Write>(
    config: &HarnessConfig,
    corpus: &BTreeSet<String>,
    files: &[TestFile],
    pipeline: &mut dyn PipelineExecutor,
    highlighter: &dyn Highlighter,
    gate: &mut dyn OperatorGate,
    out: &mut W,
) -> (io::Result<RunReport>, CleanupReport) {
    let run = RunLoop::new(&config.corpus_dir, &config.prompt, pipeline, highlighter, gate).run(files, out);

    let corpus_files: Vec<TestFile> = corpus.iter().map(TestFile::new).collect();
    let names = artifact_names(corpus_files.iter().chain(files.iter()));
    let cleanup = cleanup_artifacts(&config.artifact_dir, &names);

    (run, cleanup)
}

/// Print every declared category with its description and size.
pub fn list_categories() -> CliResult<ExitCode> {
    let catalog = CategoryCatalog::builtin();
    let width = catalog.iter().map(|set| set.name.len()).max().unwrap_or(0);

    let mut stdout = io::stdout().lock();
    for set in catalog.iter() {
        writeln!(
            stdout,
            "{:<width$}  {:>3} file(s)  {}",
            set.name,
            set.members.len(),
            set.description,
            width = width
        )
        .map_err(|e| CliError::failure(format!("Error writing to terminal: {}", e)))?;
    }
    Ok(ExitCode::SUCCESS)
}
