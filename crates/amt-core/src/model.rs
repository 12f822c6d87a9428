//! Core data model types for amt.
//!
//! Questions and questionnaires come from definition files, answers come from
//! the operator or from a previous run, and both flow through the session
//! engine in definition order.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The interaction a question needs, which also fixes the shape of its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free-form text entry.
    FreeText,
    /// Pick exactly one of the options.
    SingleChoice { options: Vec<String> },
    /// Pick any subset of the options.
    MultiChoice { options: Vec<String> },
}

impl QuestionKind {
    /// The options offered for choice kinds; empty for free text.
    pub fn options(&self) -> &[String] {
        match self {
            QuestionKind::FreeText => &[],
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                options
            }
        }
    }
}

/// A single question presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// How the question is asked.
    pub kind: QuestionKind,
    /// Canonical identifier, stable across runs. Prior answers are matched on it.
    pub key: String,
    /// Text shown to the operator.
    pub prompt: String,
}

impl Question {
    /// Build a question whose key and prompt are both the definition text.
    pub fn new(kind: QuestionKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            key: text.clone(),
            prompt: text,
        }
    }
}

/// A named, ordered collection of questions from one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    /// File stem of the definition file.
    pub name: String,
    /// Questions in presentation order.
    pub questions: Vec<Question>,
}

/// An answer as given by the operator or loaded from a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Free text or a single selected option.
    Single(String),
    /// The selected options of a multi-choice question, in option order.
    Multiple(Vec<String>),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(value) => write!(f, "{value}"),
            Answer::Multiple(values) => write!(f, "{}", values.join(", ")),
        }
    }
}

/// One persisted question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: Answer,
}

/// Answers from a previous run for one questionnaire, keyed by question key.
pub type PriorAnswers = HashMap<String, Answer>;

/// Prior answers for every questionnaire, keyed by questionnaire name.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct PriorAnswerIndex {
    entries: HashMap<String, PriorAnswers>,
}

impl PriorAnswerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prior answers for a questionnaire, if a valid answer file existed.
    pub fn get(&self, questionnaire: &str) -> Option<&PriorAnswers> {
        self.entries.get(questionnaire)
    }

    pub fn contains(&self, questionnaire: &str) -> bool {
        self.entries.contains_key(questionnaire)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, questionnaire: String, answers: PriorAnswers) {
        self.entries.insert(questionnaire, answers);
    }
}

/// Answers accumulated during one pass over a questionnaire, in the order
/// they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResult {
    records: Vec<AnswerRecord>,
}

impl SessionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. A key that was already recorded keeps its position
    /// and takes the new value.
    pub fn record(&mut self, key: &str, answer: Answer) {
        match self.records.iter_mut().find(|r| r.question == key) {
            Some(existing) => existing.answer = answer,
            None => self.records.push(AnswerRecord {
                question: key.to_string(),
                answer,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.records
            .iter()
            .find(|r| r.question == key)
            .map(|r| &r.answer)
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
