//! Operator confirmation between files
//!
//! After each file the run blocks on a text prompt. A reply that is empty after trimming
//! continues; anything else stops the run. There is no timeout.

use std::io::{self, BufRead, Write};

/// What the operator answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateReply {
    Continue,
    Stop,
}

impl GateReply {
    /// Interpret a raw line of input.
    pub fn from_input(line: &str) -> Self {
        if line.trim().is_empty() {
            GateReply::Continue
        } else {
            GateReply::Stop
        }
    }
}

/// Source of operator replies.
pub trait OperatorGate {
    /// Show `prompt` and block until the operator answers.
    fn ask(&mut self, prompt: &str) -> io::Result<GateReply>;
}

/// Reads replies line by line from any buffered reader, echoing the prompt to a writer.
///
/// End of input counts as a stop, so a closed stdin ends the run cleanly.
pub struct LineGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> OperatorGate for LineGate<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<GateReply> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(GateReply::Stop);
        }
        Ok(GateReply::from_input(&line))
    }
}

/// The terminal gate: prompt on stdout, reply from stdin.
pub type StdinGate = LineGate<io::StdinLock<'static>, io::Stdout>;

pub fn stdin_gate() -> StdinGate {
    LineGate::new(io::stdin().lock(), io::stdout())
}
