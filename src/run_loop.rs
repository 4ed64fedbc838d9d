//! Sequential run loop with an operator gate after every file
//!
//! ## States
//!
//! - `Idle`: nothing shown yet; an empty selection goes straight to `Done`
//! - `Presenting(i)`: banner, highlighted source, compile, execute for file `i`
//! - `AwaitingConfirmation(i)`: blocked on the operator prompt
//! - `Done`: terminal; no further pipeline runs
//!
//! A blank reply moves on to the next file, any other reply stops the loop. The prompt is shown
//! after the last file too, so its output stays on screen until the operator is done reading.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::catalog::TestFile;
use crate::gate::{GateReply, OperatorGate};
use crate::highlight::Highlighter;
use crate::pipeline::{PipelineExecutor, PipelineOutcome, StepStatus, run_pipeline};

/// Character the banners are drawn with.
pub const BANNER_MARKER: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Presenting(usize),
    AwaitingConfirmation(usize),
    Done,
}

/// What happened during one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files whose pipeline ran, in order
    pub visited: Vec<TestFile>,
    /// Outcome per visited file, same order as `visited`
    pub outcomes: Vec<PipelineOutcome>,
    /// The operator stopped the run before the selection was exhausted
    pub aborted: bool,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }
}

/// The `File = <name>` line and its marker rule, which has the same length.
pub fn banner(file: &TestFile) -> (String, String) {
    let info = format!("File = {}", file.name());
    let rule = BANNER_MARKER.to_string().repeat(info.chars().count());
    (info, rule)
}

/// Drives the pipeline over a selection, one file at a time.
pub struct RunLoop<'a> {
    corpus_dir: PathBuf,
    prompt: String,
    pipeline: &'a mut dyn PipelineExecutor,
    highlighter: &'a dyn Highlighter,
    gate: &'a mut dyn OperatorGate,
}

impl<'a> RunLoop<'a> {
    pub fn new(
        corpus_dir: impl Into<PathBuf>,
        prompt: impl Into<String>,
        pipeline: &'a mut dyn PipelineExecutor,
        highlighter: &'a dyn Highlighter,
        gate: &'a mut dyn OperatorGate,
    ) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            prompt: prompt.into(),
            pipeline,
            highlighter,
            gate,
        }
    }

    /// Visit `files` in order, writing banners and previews to `out`.
    ///
    /// ## Errors
    ///
    /// Only failures writing to `out`. Pipeline failures are recorded in the report, and a
    /// gate that cannot be read ends the loop as if the operator had stopped it.
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub fn run<W: Write>(&mut self, files: &[TestFile], out: &mut W) -> io::Result<RunReport> {
        let mut report = RunReport::default();
        let mut state = RunState::Idle;

        loop {
            state = match state {
                RunState::Idle => {
                    if files.is_empty() {
                        tracing::info!("nothing selected");
                        RunState::Done
                    } else {
                        RunState::Presenting(0)
                    }
                }
                RunState::Presenting(i) => {
                    let file = &files[i];
                    let outcome = self.present(file, out)?;
                    tracing::debug!(file = %file, ?outcome, "pipeline finished");
                    report.visited.push(file.clone());
                    report.outcomes.push(outcome);
                    RunState::AwaitingConfirmation(i)
                }
                RunState::AwaitingConfirmation(i) => {
                    out.flush()?;
                    let reply = self.gate.ask(&self.prompt).unwrap_or_else(|e| {
                        tracing::warn!("could not read operator reply, stopping: {}", e);
                        GateReply::Stop
                    });
                    let has_next = i + 1 < files.len();
                    match reply {
                        GateReply::Continue if has_next => RunState::Presenting(i + 1),
                        GateReply::Continue => RunState::Done,
                        GateReply::Stop => {
                            report.aborted = has_next;
                            RunState::Done
                        }
                    }
                }
                RunState::Done => break,
            };
        }

        tracing::info!(
            visited = report.visited.len(),
            passed = report.passed(),
            aborted = report.aborted,
            "run finished"
        );
        Ok(report)
    }

    fn present<W: Write>(&mut self, file: &TestFile, out: &mut W) -> io::Result<PipelineOutcome> {
        let (info, rule) = banner(file);
        writeln!(out, "{rule}\n{info}\n{rule}")?;

        match fs::read_to_string(file.path_in(&self.corpus_dir)) {
            Ok(source) => {
                let rendered = self.highlighter.render(&source);
                writeln!(out, "{}", rendered.trim_end_matches('\n'))?;
            }
            Err(e) => {
                tracing::warn!(file = %file, "cannot read source for preview: {}", e);
                writeln!(out, "(source unavailable: {})", e)?;
            }
        }
        out.flush()?;

        let mut write_err = None;
        let outcome = run_pipeline(&mut *self.pipeline, file, |_| {
            if let Err(e) = writeln!(out, "{rule}").and_then(|_| out.flush()) {
                write_err = Some(e);
            }
        });
        if let Some(e) = write_err {
            return Err(e);
        }
        if outcome.execute == StepStatus::Skipped {
            let artifact = file.artifact_name().unwrap_or(file.name());
            writeln!(out, "(compile failed, not running {artifact})")?;
        }

        writeln!(out, "{rule}")?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn banner_rule_matches_info_length() {
        let (info, rule) = banner(&TestFile::new("good01.dj"));
        assert_eq!(info, "File = good01.dj");
        assert_eq!(rule, "*".repeat(16));
    }
}
