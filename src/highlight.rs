//! Source preview rendering
//!
//! Highlighting is display-only. A highlighter that fails hands back the raw text, so a
//! missing `pygmentize` never affects the run.

use std::io::Write;
use std::process::{Command, Stdio};

/// Renders source text for the terminal.
pub trait Highlighter {
    fn render(&self, source: &str) -> String;
}

/// Passes source through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn render(&self, source: &str) -> String {
        source.to_string()
    }
}

/// Pipes source through `pygmentize` with a 256-colour terminal formatter.
///
/// dj has no lexer of its own; its C-family syntax reads well enough through the Java lexer.
#[derive(Debug, Clone)]
pub struct PygmentizeHighlighter {
    program: String,
    lexer: String,
    style: String,
}

impl Default for PygmentizeHighlighter {
    fn default() -> Self {
        Self {
            program: "pygmentize".to_string(),
            lexer: "java".to_string(),
            style: "monokai".to_string(),
        }
    }
}

impl PygmentizeHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn try_render(&self, source: &str) -> std::io::Result<String> {
        let mut child = Command::new(&self.program)
            .args(["-l", self.lexer.as_str(), "-f", "terminal256", "-O"])
            .arg(format!("style={}", self.style))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(std::io::Error::other(format!("{} exited with {}", self.program, output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Highlighter for PygmentizeHighlighter {
    fn render(&self, source: &str) -> String {
        match self.try_render(source) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::debug!("highlighting unavailable, showing plain source: {}", e);
                source.to_string()
            }
        }
    }
}
