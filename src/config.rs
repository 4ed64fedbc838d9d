//! Harness configuration
//!
//! Defaults match the layout of a dj2ll checkout: the compiler binary sits in the working
//! directory, the corpus lives in `test_programs/good`, and artifacts land next to the
//! compiler. Environment variables override the defaults; command-line flags override both.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the corpus directory.
pub const CORPUS_DIR_ENV: &str = "DJ_CORPUS_DIR";
/// Environment variable overriding the compiler binary.
pub const COMPILER_ENV: &str = "DJ_COMPILER";

/// Default operator prompt shown after each file.
pub const DEFAULT_PROMPT: &str = "(press [enter] to continue):";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding the test source programs
    pub corpus_dir: PathBuf,
    /// When set, only corpus entries with this extension (without the dot) are listed.
    /// Off by default: every entry in the corpus directory is a candidate.
    pub source_extension: Option<String>,
    /// External compiler invoked with the test file path
    pub compiler: PathBuf,
    /// Extra compiler flags, passed after the file path
    pub compiler_args: Vec<String>,
    /// Directory the compiler writes artifacts into; artifacts are run and removed from here
    pub artifact_dir: PathBuf,
    /// Render sources through the highlighter before compiling
    pub highlight: bool,
    /// Skip the execute step when the compiler exits nonzero
    pub check_compile_status: bool,
    /// Text of the operator prompt
    pub prompt: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("test_programs/good"),
            source_extension: None,
            compiler: PathBuf::from("./dj2ll"),
            compiler_args: Vec::new(),
            artifact_dir: PathBuf::from("."),
            highlight: true,
            check_compile_status: false,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Defaults with `DJ_CORPUS_DIR` / `DJ_COMPILER` applied when set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Apply environment overrides through a lookup function (injectable for tests).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(CORPUS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.corpus_dir = PathBuf::from(dir);
        }
        if let Some(compiler) = lookup(COMPILER_ENV).filter(|v| !v.is_empty()) {
            self.compiler = PathBuf::from(compiler);
        }
        self
    }

    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = dir.into();
        self
    }

    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = Some(ext.into());
        self
    }

    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_compiler_args(mut self, args: Vec<String>) -> Self {
        self.compiler_args = args;
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_check_compile_status(mut self, check: bool) -> Self {
        self.check_compile_status = check;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_checkout_layout() {
        let config = HarnessConfig::default();
        assert_eq!(config.corpus_dir, PathBuf::from("test_programs/good"));
        assert_eq!(config.compiler, PathBuf::from("./dj2ll"));
        assert_eq!(config.artifact_dir, PathBuf::from("."));
        assert!(config.compiler_args.is_empty());
        assert!(!config.check_compile_status);
        assert_eq!(config.source_extension, None);
    }

    #[test]
    fn extension_filter_is_opt_in() {
        let config = HarnessConfig::default().with_source_extension("dj");
        assert_eq!(config.source_extension.as_deref(), Some("dj"));
    }

    #[test]
    fn env_overrides_apply_when_set() {
        let config = HarnessConfig::default().with_env_overrides(|key| match key {
            CORPUS_DIR_ENV => Some("corpus".to_string()),
            COMPILER_ENV => Some("/opt/dj2ll".to_string()),
            _ => None,
        });
        assert_eq!(config.corpus_dir, PathBuf::from("corpus"));
        assert_eq!(config.compiler, PathBuf::from("/opt/dj2ll"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let config = HarnessConfig::default().with_env_overrides(|_| Some(String::new()));
        assert_eq!(config, HarnessConfig::default());
    }
}
