//! Compile-then-run pipeline for a single test program
//!
//! ## Steps
//!
//! 1. Compile: `<compiler> <corpus>/<file> [compiler args...]`. The exit status is recorded but,
//!    unless `check_compile_status` is set, does not gate the next step. The operator judges
//!    the compiler's output on the terminal.
//! 2. Execute: `<artifact dir>/<artifact name>` with no arguments. A missing artifact shows up as
//!    a spawn failure, which is reported on stderr and recorded like any other failed run.
//!
//! Both children inherit stdin/stdout/stderr; nothing is captured or compared.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::SystemTime;

use crate::catalog::TestFile;
use crate::config::HarnessConfig;
use crate::errors::HarnessError;

// ============================================================================
// Outcome
// ============================================================================

/// Result of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Exited with status 0
    Succeeded,
    /// Exited nonzero; `None` when terminated by a signal
    Failed(Option<i32>),
    /// The process could not be started (e.g. the artifact does not exist)
    Unavailable(String),
    /// Not attempted
    Skipped,
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded)
    }

    fn from_exit(status: ExitStatus) -> Self {
        if status.success() {
            StepStatus::Succeeded
        } else {
            StepStatus::Failed(status.code())
        }
    }
}

/// Per-file result. Transient: used for logging and the end-of-run summary only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub compile: StepStatus,
    /// Whether this compile step created or rewrote the artifact. A binary left over from an
    /// earlier run with an unchanged modification time does not count.
    pub artifact_produced: bool,
    pub execute: StepStatus,
}

impl PipelineOutcome {
    /// Both steps exited with status 0.
    pub fn passed(&self) -> bool {
        self.compile.is_success() && self.execute.is_success()
    }
}

// ============================================================================
// Executor trait
// ============================================================================

/// Runs the pipeline for one file. Implementations must not fail the run loop: every problem
/// is folded into the returned outcome.
pub trait PipelineExecutor {
    /// Called between the compile banner and the execute banner.
    fn compile(&mut self, file: &TestFile) -> StepStatus;

    /// Modification time of the artifact for `file`, or `None` if there is none.
    fn artifact_modified(&self, file: &TestFile) -> Option<SystemTime>;

    fn artifact_exists(&self, file: &TestFile) -> bool {
        self.artifact_modified(file).is_some()
    }

    /// Run the artifact for `file`.
    fn execute(&mut self, file: &TestFile) -> StepStatus;

    /// Skip the execute step when the compiler fails.
    fn gates_on_compile_status(&self) -> bool {
        false
    }
}

// ============================================================================
// Process-backed implementation
// ============================================================================

/// Invokes the real compiler and artifacts as child processes.
#[derive(Debug, Clone)]
pub struct ProcessPipeline {
    compiler: PathBuf,
    compiler_args: Vec<String>,
    corpus_dir: PathBuf,
    artifact_dir: PathBuf,
    check_compile_status: bool,
}

impl ProcessPipeline {
    pub fn new(config: &HarnessConfig) -> Self {
        let in_cwd = config.artifact_dir == Path::new(".");
        // Children run inside the artifact directory, so relative paths must be anchored first
        let anchor = |p: &Path| {
            if in_cwd || p.is_absolute() {
                p.to_path_buf()
            } else {
                std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
            }
        };
        // A bare program name is looked up on PATH and needs no anchoring
        let compiler = if config.compiler.components().count() > 1 {
            anchor(&config.compiler)
        } else {
            config.compiler.clone()
        };

        Self {
            compiler,
            compiler_args: config.compiler_args.clone(),
            corpus_dir: anchor(&config.corpus_dir),
            artifact_dir: anchor(&config.artifact_dir),
            check_compile_status: config.check_compile_status,
        }
    }

    /// Path the artifact for `file` is invoked from: `./<name>` in the working directory,
    /// otherwise an absolute path into the artifact directory.
    pub fn artifact_path(&self, file: &TestFile) -> Option<PathBuf> {
        file.artifact_name().map(|name| self.artifact_dir.join(name))
    }

    fn spawn(&self, command: &mut Command, program: &Path) -> StepStatus {
        // Keep our banners ahead of whatever the child prints
        let _ = io::stdout().flush();

        match command.current_dir(&self.artifact_dir).status() {
            Ok(status) => StepStatus::from_exit(status),
            Err(e) => {
                let err = HarnessError::ExternalInvocation {
                    program: program.display().to_string(),
                    reason: e.to_string(),
                };
                eprintln!("{}", err);
                tracing::warn!("{}", err);
                StepStatus::Unavailable(e.to_string())
            }
        }
    }
}

impl PipelineExecutor for ProcessPipeline {
    #[tracing::instrument(skip_all, fields(file = %file))]
    fn compile(&mut self, file: &TestFile) -> StepStatus {
        let source = file.path_in(&self.corpus_dir);
        let mut command = Command::new(&self.compiler);
        command.arg(&source).args(&self.compiler_args);

        let status = self.spawn(&mut command, &self.compiler);
        tracing::debug!(?status, "compile step finished");
        status
    }

    fn artifact_modified(&self, file: &TestFile) -> Option<SystemTime> {
        let meta = self.artifact_path(file)?.metadata().ok()?;
        if !meta.is_file() {
            return None;
        }
        // Filesystems without mtime support still report the file as present
        Some(meta.modified().unwrap_or(SystemTime::UNIX_EPOCH))
    }

    #[tracing::instrument(skip_all, fields(file = %file))]
    fn execute(&mut self, file: &TestFile) -> StepStatus {
        let Some(artifact) = self.artifact_path(file) else {
            let err = HarnessError::ExternalInvocation {
                program: file.to_string(),
                reason: "file name has no extension to strip, so there is no artifact name".to_string(),
            };
            eprintln!("{}", err);
            tracing::warn!("{}", err);
            return StepStatus::Unavailable(err.to_string());
        };

        let mut command = Command::new(&artifact);
        let status = self.spawn(&mut command, &artifact);
        tracing::debug!(?status, "execute step finished");
        status
    }

    fn gates_on_compile_status(&self) -> bool {
        self.check_compile_status
    }
}

/// Run both steps for `file` through `executor`, honoring the compile-status gate.
///
/// `between` is called after the compile step, before the execute step; the run loop prints
/// its separator banner there.
pub fn run_pipeline<E, F>(executor: &mut E, file: &TestFile, mut between: F) -> PipelineOutcome
where
    E: PipelineExecutor + ?Sized,
    F: FnMut(&StepStatus),
{
    let before = executor.artifact_modified(file);
    let compile = executor.compile(file);
    let after = executor.artifact_modified(file);
    let artifact_produced = after.is_some() && after != before;
    if !artifact_produced && after.is_some() {
        tracing::debug!(file = %file, "artifact predates this compile step");
    }
    between(&compile);

    let execute = if executor.gates_on_compile_status() && !compile.is_success() {
        tracing::info!(file = %file, "compile failed, skipping execute step");
        StepStatus::Skipped
    } else {
        executor.execute(file)
    };

    PipelineOutcome {
        compile,
        artifact_produced,
        execute,
    }
}
