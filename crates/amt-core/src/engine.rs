//! Interactive session engine.
//!
//! Walks each questionnaire in order, offers previously given answers for
//! keeping, asks fresh questions through a [`Prompter`], and persists the
//! result of every questionnaire it touched. An interruption ends the whole
//! run after the current questionnaire's partial answers are saved.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::answers::persist_answers;
use crate::model::{
    Answer, PriorAnswerIndex, PriorAnswers, Question, QuestionKind, Questionnaire, SessionResult,
};
use crate::traits::{Prompter, Reply};

/// Prompt used to offer a previously given answer.
pub const KEEP_ANSWER_PROMPT: &str = "Keep this answer?";

/// Shown after a questionnaire's answers have been saved.
pub const FINISHED_MESSAGE: &str = "You have finished filling out this questionnaire.";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    /// Every question has an answer.
    Completed,
    /// The operator interrupted a prompt.
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Aborted)
    }
}

/// One pass over one questionnaire.
#[derive(Debug)]
pub struct Session<'a> {
    questionnaire: &'a Questionnaire,
    prior: Option<&'a PriorAnswers>,
    result: SessionResult,
    state: SessionState,
    next: usize,
}

impl<'a> Session<'a> {
    pub fn new(questionnaire: &'a Questionnaire, prior: Option<&'a PriorAnswers>) -> Self {
        Self {
            questionnaire,
            prior,
            result: SessionResult::new(),
            state: SessionState::NotStarted,
            next: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn result(&self) -> &SessionResult {
        &self.result
    }

    /// Advance by at most one question and return the new state.
    ///
    /// Terminal states are sticky: stepping a completed or aborted session
    /// asks nothing.
    pub fn step<P: Prompter + ?Sized>(&mut self, prompter: &mut P) -> Result<SessionState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        self.state = SessionState::InProgress;

        let questionnaire = self.questionnaire;
        let Some(question) = questionnaire.questions.get(self.next) else {
            self.state = SessionState::Completed;
            return Ok(self.state);
        };

        match resolve(question, self.prior, prompter)? {
            Reply::Value(answer) => {
                self.result.record(&question.key, answer);
                self.next += 1;
                if self.next == questionnaire.questions.len() {
                    self.state = SessionState::Completed;
                }
            }
            Reply::Cancelled => {
                tracing::info!(
                    "user aborted {} after {} answer(s)",
                    questionnaire.name,
                    self.result.len()
                );
                self.state = SessionState::Aborted;
            }
        }

        Ok(self.state)
    }

    /// Step until the session completes or is aborted.
    pub fn run<P: Prompter + ?Sized>(mut self, prompter: &mut P) -> Result<SessionOutcome> {
        while !self.step(prompter)?.is_terminal() {}
        Ok(SessionOutcome {
            questionnaire: self.questionnaire.name.clone(),
            state: self.state,
            result: self.result,
        })
    }
}

/// Final state and answers of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub questionnaire: String,
    pub state: SessionState,
    pub result: SessionResult,
}

impl SessionOutcome {
    pub fn is_aborted(&self) -> bool {
        self.state == SessionState::Aborted
    }
}

/// Decide the answer to one question: keep the prior answer if the operator
/// confirms it, otherwise ask fresh.
fn resolve<P: Prompter + ?Sized>(
    question: &Question,
    prior: Option<&PriorAnswers>,
    prompter: &mut P,
) -> Result<Reply<Answer>> {
    if let Some(previous) = prior.and_then(|answers| answers.get(&question.key)) {
        prompter.say(&question.prompt)?;
        prompter.say(&format!("Previously given answer: {previous}"))?;

        match prompter.confirm(KEEP_ANSWER_PROMPT)? {
            Reply::Cancelled => return Ok(Reply::Cancelled),
            // Kept verbatim, even if the options have changed since.
            Reply::Value(true) => {
                tracing::debug!("keeping prior answer for '{}'", question.key);
                return Ok(Reply::Value(previous.clone()));
            }
            Reply::Value(false) => {
                tracing::debug!("replacing prior answer for '{}'", question.key);
            }
        }
    }

    ask(question, prompter)
}

fn ask<P: Prompter + ?Sized>(question: &Question, prompter: &mut P) -> Result<Reply<Answer>> {
    match &question.kind {
        QuestionKind::FreeText => prompter.free_text(&question.prompt),
        QuestionKind::SingleChoice { options } => prompter.select(&question.prompt, options),
        QuestionKind::MultiChoice { options } => prompter.multi_select(&question.prompt, options),
    }
}

/// A questionnaire whose answers were written during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuestionnaire {
    pub questionnaire: String,
    pub path: PathBuf,
    pub answered: usize,
    pub state: SessionState,
}

/// What an assessment run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Saved questionnaires, in processing order.
    pub saved: Vec<SavedQuestionnaire>,
    /// The operator interrupted the run.
    pub aborted: bool,
}

/// Run every questionnaire in order, one at a time, persisting each one to
/// `output_dir` as soon as its session ends.
///
/// After an abort the partial answers are saved and no further
/// questionnaire is started.
pub fn run_assessment<P: Prompter + ?Sized>(
    questionnaires: &[Questionnaire],
    prior: &PriorAnswerIndex,
    output_dir: &Path,
    prompter: &mut P,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for questionnaire in questionnaires {
        prompter.say(&format!("Questionnaire: {}", questionnaire.name))?;

        let outcome = Session::new(questionnaire, prior.get(&questionnaire.name)).run(prompter)?;
        let path = persist_answers(&questionnaire.name, &outcome.result, output_dir)?;

        prompter.say(FINISHED_MESSAGE)?;
        summary.saved.push(SavedQuestionnaire {
            questionnaire: outcome.questionnaire.clone(),
            path,
            answered: outcome.result.len(),
            state: outcome.state,
        });

        if outcome.is_aborted() {
            summary.aborted = true;
            break;
        }
    }

    Ok(summary)
}
