//! The interactive boundary of the session engine.
//!
//! The engine never talks to a terminal directly. It asks a [`Prompter`],
//! implemented in `amt-prompts` by a terminal-backed prompter and by a
//! scripted one for tests.

use crate::model::Answer;

/// Outcome of a single prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// The operator answered.
    Value(T),
    /// The operator interrupted the prompt.
    Cancelled,
}

impl<T> Reply<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Reply::Cancelled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Value(v) => Reply::Value(f(v)),
            Reply::Cancelled => Reply::Cancelled,
        }
    }
}

impl<T> From<Option<T>> for Reply<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reply::Value(v),
            None => Reply::Cancelled,
        }
    }
}

/// Asks the operator questions. Every call blocks until the operator
/// answers or interrupts.
///
/// Errors are reserved for I/O failures; an interruption is
/// [`Reply::Cancelled`].
pub trait Prompter {
    /// Free-form text entry.
    fn free_text(&mut self, prompt: &str) -> anyhow::Result<Reply<Answer>>;

    /// Choose exactly one of `options`.
    fn select(&mut self, prompt: &str, options: &[String]) -> anyhow::Result<Reply<Answer>>;

    /// Choose any subset of `options`.
    fn multi_select(&mut self, prompt: &str, options: &[String])
        -> anyhow::Result<Reply<Answer>>;

    /// Yes/no question.
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<Reply<bool>>;

    /// Show a line of text to the operator.
    fn say(&mut self, message: &str) -> anyhow::Result<()>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn free_text(&mut self, prompt: &str) -> anyhow::Result<Reply<Answer>> {
        (**self).free_text(prompt)
    }

    fn select(&mut self, prompt: &str, options: &[String]) -> anyhow::Result<Reply<Answer>> {
        (**self).select(prompt, options)
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> anyhow::Result<Reply<Answer>> {
        (**self).multi_select(prompt, options)
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<Reply<bool>> {
        (**self).confirm(prompt)
    }

    fn say(&mut self, message: &str) -> anyhow::Result<()> {
        (**self).say(message)
    }
}
