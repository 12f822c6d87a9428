//! Terminal prompter backed by `dialoguer`.

use std::io;

use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use amt_core::model::Answer;
use amt_core::traits::{Prompter, Reply};

/// Asks questions on the controlling terminal.
///
/// Ctrl-C inside a prompt, and Esc/`q` in the list and confirm prompts, come
/// back as [`Reply::Cancelled`].
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            term: Term::stdout(),
        }
    }

    /// Map a dialoguer result onto a reply, treating an interrupted read as a
    /// cancellation.
    fn reply<T>(&self, result: dialoguer::Result<Option<T>>) -> anyhow::Result<Reply<T>> {
        match result {
            Ok(value) => Ok(Reply::from(value)),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
                // dialoguer hides the cursor while a prompt is active
                let _ = self.term.show_cursor();
                let _ = self.term.write_line("");
                Ok(Reply::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn free_text(&mut self, prompt: &str) -> anyhow::Result<Reply<Answer>> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map(Some);
        Ok(self.reply(result)?.map(Answer::Single))
    }

    fn select(&mut self, prompt: &str, options: &[String]) -> anyhow::Result<Reply<Answer>> {
        if options.is_empty() {
            tracing::warn!("'{}' has no options, asking for free text", prompt);
            return self.free_text(prompt);
        }
        let result = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_on_opt(&self.term);
        Ok(self
            .reply(result)?
            .map(|index| Answer::Single(options[index].clone())))
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> anyhow::Result<Reply<Answer>> {
        if options.is_empty() {
            tracing::warn!("'{}' has no options, recording an empty selection", prompt);
            return Ok(Reply::Value(Answer::Multiple(Vec::new())));
        }
        let result = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .interact_on_opt(&self.term);
        Ok(self.reply(result)?.map(|indices| {
            Answer::Multiple(indices.into_iter().map(|i| options[i].clone()).collect())
        }))
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<Reply<bool>> {
        let result = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(true)
            .interact_on_opt(&self.term);
        self.reply(result)
    }

    fn say(&mut self, message: &str) -> anyhow::Result<()> {
        self.term.write_line(message)?;
        Ok(())
    }
}
