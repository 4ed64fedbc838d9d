//! CLI module for the harness
//!
//! ## Usage
//!
//! - `djharness` - run every corpus program except the known failures
//! - `djharness <CATEGORY>` - run exactly the programs listed in one category
//! - `djharness --list-categories` - show the declared categories
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        CliError::failure(format!("Error: {}", err))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Interactive regression driver for the dj2ll compiler
#[derive(Parser, Debug)]
#[command(name = "djharness")]
#[command(version = HARNESS_VERSION)]
#[command(
    about = "Compile and run the dj test corpus one program at a time",
    long_about = "Compile and run the dj test corpus one program at a time.\n\n\
                  Without a category, every program except the known failures is run in \
                  filename order. With a category, exactly its listed programs are run in \
                  their declared order. After each program, press enter to continue or type \
                  anything to stop."
)]
pub struct Cli {
    /// Category of programs to run (default: everything except known failures)
    #[arg(value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Directory holding the test programs [env: DJ_CORPUS_DIR]
    #[arg(long = "corpus", value_name = "DIR")]
    pub corpus_dir: Option<PathBuf>,

    /// Compiler invoked as `<COMPILER> <file>` [env: DJ_COMPILER]
    #[arg(long, value_name = "PATH")]
    pub compiler: Option<PathBuf>,

    /// Extra flag passed to the compiler after the file path (repeatable)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub compiler_args: Vec<String>,

    /// Directory the compiler writes binaries into
    #[arg(long, value_name = "DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Only treat corpus entries with this extension as test programs (e.g. `dj`)
    #[arg(long, value_name = "EXT")]
    pub only_extension: Option<String>,

    /// Show sources without syntax highlighting
    #[arg(long)]
    pub no_highlight: bool,

    /// Skip running a program when the compiler exits nonzero
    #[arg(long = "check-compile")]
    pub check_compile: bool,

    /// List the declared categories and exit
    #[arg(long, conflicts_with = "category")]
    pub list_categories: bool,
}

impl Cli {
    /// Layer command-line flags over `base`.
    pub fn apply_to(&self, base: HarnessConfig) -> HarnessConfig {
        let mut config = base
            .with_highlight(!self.no_highlight)
            .with_check_compile_status(self.check_compile);
        if let Some(dir) = &self.corpus_dir {
            config = config.with_corpus_dir(dir);
        }
        if let Some(compiler) = &self.compiler {
            config = config.with_compiler(compiler);
        }
        if !self.compiler_args.is_empty() {
            config = config.with_compiler_args(self.compiler_args.clone());
        }
        if let Some(dir) = &self.artifact_dir {
            config = config.with_artifact_dir(dir);
        }
        if let Some(ext) = &self.only_extension {
            config = config.with_source_extension(ext.trim_start_matches('.'));
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if cli.list_categories {
        return commands::list_categories();
    }

    let config = cli.apply_to(HarnessConfig::from_env());
    commands::run_harness(&config, cli.category.as_deref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        let cli = Cli::try_parse_from(["djharness"]).unwrap();
        assert!(cli.category.is_none());
        assert!(!cli.list_categories);
        assert_eq!(cli.apply_to(HarnessConfig::default()), HarnessConfig::default());
    }

    #[test]
    fn test_cli_parse_category() {
        let cli = Cli::try_parse_from(["djharness", "vtables"]).unwrap();
        assert_eq!(cli.category.as_deref(), Some("vtables"));
    }

    #[test]
    fn test_cli_rejects_second_positional() {
        assert!(Cli::try_parse_from(["djharness", "vtables", "null-handling"]).is_err());
    }

    #[test]
    fn test_cli_compiler_args_accept_flags() {
        let cli = Cli::try_parse_from([
            "djharness",
            "--compiler-arg",
            "--emit-llvm",
            "--compiler-arg",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.compiler_args, vec!["--emit-llvm", "--verbose"]);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "djharness",
            "--corpus",
            "progs",
            "--compiler",
            "/usr/local/bin/dj2ll",
            "--artifact-dir",
            "out",
            "--no-highlight",
            "--check-compile",
        ])
        .unwrap();
        let config = cli.apply_to(HarnessConfig::default().with_corpus_dir("from-env"));
        assert_eq!(config.corpus_dir, PathBuf::from("progs"));
        assert_eq!(config.compiler, PathBuf::from("/usr/local/bin/dj2ll"));
        assert_eq!(config.artifact_dir, PathBuf::from("out"));
        assert!(!config.highlight);
        assert!(config.check_compile_status);
    }

    #[test]
    fn test_cli_only_extension_enables_filter() {
        let cli = Cli::try_parse_from(["djharness", "--only-extension", ".dj"]).unwrap();
        let config = cli.apply_to(HarnessConfig::default());
        assert_eq!(config.source_extension.as_deref(), Some("dj"));
    }

    #[test]
    fn test_cli_env_value_survives_without_flag() {
        let cli = Cli::try_parse_from(["djharness"]).unwrap();
        let config = cli.apply_to(HarnessConfig::default().with_corpus_dir("from-env"));
        assert_eq!(config.corpus_dir, PathBuf::from("from-env"));
    }

    #[test]
    fn test_cli_list_conflicts_with_category() {
        assert!(Cli::try_parse_from(["djharness", "--list-categories"]).unwrap().list_categories);
        assert!(Cli::try_parse_from(["djharness", "vtables", "--list-categories"]).is_err());
    }
}
