//! Scripted prompter for testing.

use std::collections::VecDeque;

use anyhow::bail;

use amt_core::model::Answer;
use amt_core::traits::{Prompter, Reply};

/// One scripted operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Answer a free-text, select, or multi-select prompt.
    Answer(Answer),
    /// Answer a keep-this-answer prompt.
    Confirm(bool),
    /// Interrupt whatever prompt comes next.
    Cancel,
}

/// Something the session engine did to the scripted operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    FreeText(String),
    Select(String),
    MultiSelect(String),
    Confirm(String),
    Say(String),
}

/// A prompter that replays a fixed script, for driving the session engine
/// without a terminal.
///
/// Choice answers are checked against the offered options, the way the
/// terminal widgets only allow listed options. Once the script runs out
/// every prompt is cancelled.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    script: VecDeque<Scripted>,
    /// Reply to every confirm prompt without consuming the script.
    always_confirm: Option<bool>,
    transcript: Vec<Interaction>,
}

impl ScriptedPrompter {
    /// Create a prompter that plays `script` in order.
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: script.into_iter().collect(),
            always_confirm: None,
            transcript: Vec::new(),
        }
    }

    /// Create a prompter that answers every confirm prompt with `keep` and
    /// plays `script` for everything else.
    pub fn always_confirming(keep: bool, script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            always_confirm: Some(keep),
            ..Self::new(script)
        }
    }

    /// Everything the prompter was asked or shown, in order.
    pub fn transcript(&self) -> &[Interaction] {
        &self.transcript
    }

    /// Number of prompts (not messages) issued.
    pub fn prompt_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|i| !matches!(i, Interaction::Say(_)))
            .count()
    }

    /// Messages shown via `say`, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|i| match i {
                Interaction::Say(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Script entries not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn next_answer(&mut self, prompt: &str) -> anyhow::Result<Reply<Answer>> {
        match self.script.pop_front() {
            None | Some(Scripted::Cancel) => Ok(Reply::Cancelled),
            Some(Scripted::Answer(answer)) => Ok(Reply::Value(answer)),
            Some(Scripted::Confirm(_)) => {
                bail!("script has a confirmation where '{prompt}' expects an answer")
            }
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn free_text(&mut self, prompt: &str) -> anyhow::Result<Reply<Answer>> {
        self.transcript.push(Interaction::FreeText(prompt.to_string()));
        self.next_answer(prompt)
    }

    fn select(&mut self, prompt: &str, options: &[String]) -> anyhow::Result<Reply<Answer>> {
        self.transcript.push(Interaction::Select(prompt.to_string()));
        let reply = self.next_answer(prompt)?;
        if let Reply::Value(answer) = &reply {
            match answer {
                Answer::Single(choice) if options.contains(choice) => {}
                other => bail!("'{other}' is not one of the options for '{prompt}'"),
            }
        }
        Ok(reply)
    }

    fn multi_select(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> anyhow::Result<Reply<Answer>> {
        self.transcript
            .push(Interaction::MultiSelect(prompt.to_string()));
        let reply = self.next_answer(prompt)?;
        if let Reply::Value(answer) = &reply {
            match answer {
                Answer::Multiple(choices) if choices.iter().all(|c| options.contains(c)) => {}
                other => bail!("'{other}' is not a selection of the options for '{prompt}'"),
            }
        }
        Ok(reply)
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<Reply<bool>> {
        self.transcript.push(Interaction::Confirm(prompt.to_string()));
        if let Some(keep) = self.always_confirm {
            return Ok(Reply::Value(keep));
        }
        match self.script.pop_front() {
            None | Some(Scripted::Cancel) => Ok(Reply::Cancelled),
            Some(Scripted::Confirm(keep)) => Ok(Reply::Value(keep)),
            Some(Scripted::Answer(answer)) => {
                bail!("script has answer '{answer}' where '{prompt}' expects a confirmation")
            }
        }
    }

    fn say(&mut self, message: &str) -> anyhow::Result<()> {
        self.transcript.push(Interaction::Say(message.to_string()));
        Ok(())
    }
}
