//! Shutdown infrastructure: interrupt delivery and exit confirmation.
//!
//! The run loop waits on an [`InterruptSource`] and, when one fires, asks a
//! [`ConfirmPrompt`] whether to exit.  Production uses [`CtrlCInterrupts`] and
//! [`StdioPrompt`]; tests use the scripted doubles in [`mock`].
//!
//! # Testability
//!
//! Neither trait touches the terminal directly, so the whole
//! interrupt → confirm → terminate-or-resume cycle runs in unit tests.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use dm_core::is_exit_confirmed;

pub mod mock;

/// Text shown when asking for exit confirmation.
pub const EXIT_PROMPT: &str = "Are you sure you want to exit? [Y/n] : ";

/// Something that delivers user interrupts to the run loop.
#[async_trait]
pub trait InterruptSource: Send {
    /// Waits until the next interrupt arrives.  There is no timeout.
    async fn next_interrupt(&mut self) -> io::Result<()>;
}

/// Asks the operator whether the engine should exit.
pub trait ConfirmPrompt {
    /// Returns `true` to terminate, `false` to resume.
    fn confirm_exit(&mut self) -> io::Result<bool>;
}

// ── Ctrl-C ────────────────────────────────────────────────────────────────────

/// Interrupts from Ctrl-C (SIGINT on Unix).
///
/// Each call subscribes afresh, so a Ctrl-C pressed while the engine is
/// blocked at the exit prompt is lost; the next one counts.
#[derive(Debug, Default)]
pub struct CtrlCInterrupts;

#[async_trait]
impl InterruptSource for CtrlCInterrupts {
    async fn next_interrupt(&mut self) -> io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}

// ── Line prompt ───────────────────────────────────────────────────────────────

/// Writes [`EXIT_PROMPT`] and reads one answer line.
///
/// An empty line or end of input confirms; otherwise the first character
/// decides (`y`/`Y` confirms).
#[derive(Debug)]
pub struct StdioPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompt and returns the writer, for inspecting output.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl StdioPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt bound to the controlling terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfirmPrompt for StdioPrompt<R, W> {
    fn confirm_exit(&mut self) -> io::Result<bool> {
        self.output.write_all(b"\n")?;
        self.output.write_all(EXIT_PROMPT.as_bytes())?;
        self.output.flush()?;

        let mut answer = String::new();
        // Zero bytes read means end of input, which reads as an empty answer.
        self.input.read_line(&mut answer)?;
        Ok(is_exit_confirmed(&answer))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> bool {
        let mut prompt = StdioPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        prompt.confirm_exit().expect("prompt io")
    }

    #[test]
    fn test_prompt_writes_question() {
        // Arrange
        let mut prompt = StdioPrompt::new(Cursor::new(b"y\n".to_vec()), Vec::new());

        // Act
        prompt.confirm_exit().unwrap();

        // Assert
        let written = String::from_utf8(prompt.into_output()).unwrap();
        assert!(written.ends_with(EXIT_PROMPT));
    }

    #[test]
    fn test_prompt_confirms_on_empty_line_and_yes() {
        assert!(answer("\n"));
        assert!(answer("y\n"));
        assert!(answer("Yes\n"));
    }

    #[test]
    fn test_prompt_rejects_on_no() {
        assert!(!answer("n\n"));
        assert!(!answer("no\n"));
    }

    #[test]
    fn test_prompt_confirms_at_end_of_input() {
        assert!(answer(""));
    }

    #[test]
    fn test_prompt_reads_one_line_per_question() {
        let mut prompt = StdioPrompt::new(Cursor::new(b"n\ny\n".to_vec()), Vec::new());

        assert!(!prompt.confirm_exit().unwrap());
        assert!(prompt.confirm_exit().unwrap());
    }
}
