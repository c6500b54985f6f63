//! Scripted interrupt source and prompt for tests.
//!
//! [`ScriptedInterrupts`] fires a fixed number of interrupts immediately and
//! then reports the script as exhausted, so a run loop that never confirms
//! returns an error instead of hanging.

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use dm_core::is_exit_confirmed;

use super::{ConfirmPrompt, InterruptSource};

/// Fires `count` interrupts, then fails with [`io::ErrorKind::UnexpectedEof`].
#[derive(Debug)]
pub struct ScriptedInterrupts {
    remaining: usize,
    delivered: usize,
}

impl ScriptedInterrupts {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            delivered: 0,
        }
    }

    /// Number of interrupts handed out so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

#[async_trait]
impl InterruptSource for ScriptedInterrupts {
    async fn next_interrupt(&mut self) -> io::Result<()> {
        if self.remaining == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "interrupt script exhausted",
            ));
        }
        self.remaining -= 1;
        self.delivered += 1;
        tokio::task::yield_now().await;
        Ok(())
    }
}

/// Answers exit prompts from a queue.  An empty queue behaves like end of
/// input and confirms.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Answers consumed so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    fn confirm_exit(&mut self) -> io::Result<bool> {
        let answer = self.answers.pop_front().unwrap_or_default();
        let confirmed = is_exit_confirmed(&answer);
        self.asked.push(answer);
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_interrupts_fire_then_exhaust() {
        // Arrange
        let mut source = ScriptedInterrupts::new(2);

        // Act / Assert
        assert!(source.next_interrupt().await.is_ok());
        assert!(source.next_interrupt().await.is_ok());
        let err = source.next_interrupt().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(source.delivered(), 2);
    }

    #[test]
    fn test_scripted_prompt_answers_in_order() {
        let mut prompt = ScriptedPrompt::new(["no", "Yes"]);

        assert!(!prompt.confirm_exit().unwrap());
        assert!(prompt.confirm_exit().unwrap());
        assert_eq!(prompt.asked(), ["no", "Yes"]);
    }

    #[test]
    fn test_scripted_prompt_confirms_when_empty() {
        let mut prompt = ScriptedPrompt::default();
        assert!(prompt.confirm_exit().unwrap());
    }
}
