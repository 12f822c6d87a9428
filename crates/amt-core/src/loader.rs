//! Questionnaire definition loader.
//!
//! Reads every `.json` definition in a directory, validates it in advisory
//! mode and flattens its groups into an ordered list of questions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::AssessmentError;
use crate::model::{Question, QuestionKind, Questionnaire};
use crate::schema::{Schema, ValidationPolicy};

/// Extension of questionnaire definition files.
pub const QUESTIONNAIRE_EXTENSION: &str = "json";

/// List the files in `dir` with the given extension, in file-name order.
///
/// Everything else (other extensions, subdirectories) is skipped with a
/// warning.
pub(crate) fn matching_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::error!("got invalid argument: {} must be a directory", dir.display());
        return Err(AssessmentError::NotADirectory(dir.to_path_buf()).into());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        entries.push(entry?.path());
    }
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        if path.is_dir() {
            tracing::warn!("ignoring subdirectory {}", path.display());
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        } else {
            let found = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            tracing::warn!("ignoring unexpected file format '{}' ({})", found, path.display());
        }
    }

    Ok(files)
}

/// Load every questionnaire in `dir`.
///
/// An unknown question type anywhere fails the whole load; no partial list
/// is returned.
pub fn load_questionnaires(dir: &Path, schema: &Schema) -> Result<Vec<Questionnaire>> {
    let mut questionnaires = Vec::new();

    for path in matching_files(dir, QUESTIONNAIRE_EXTENSION)? {
        questionnaires.push(load_questionnaire(&path, schema)?);
    }

    tracing::info!(
        "loaded {} questionnaire(s) from {}",
        questionnaires.len(),
        dir.display()
    );
    Ok(questionnaires)
}

/// Load a single questionnaire definition file.
pub fn load_questionnaire(path: &Path, schema: &Schema) -> Result<Questionnaire> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read questionnaire: {}", path.display()))?;
    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse questionnaire JSON: {}", path.display()))?;

    ValidationPolicy::Advisory.admits(schema, &document, path);

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let questions = parse_questions(&document, path)?;

    Ok(Questionnaire { name, questions })
}

/// Flatten the groups of a decoded definition into questions, group order
/// first, then in-group order.
///
/// Extraction is best-effort because the document may have failed advisory
/// validation: missing `groups`/`questions` arrays count as empty.
pub fn parse_questions(document: &Value, source: &Path) -> Result<Vec<Question>> {
    let mut questions = Vec::new();

    for group in array_field(document, "groups") {
        for entry in array_field(group, "questions") {
            if let Some(question) = parse_question(entry, source)? {
                questions.push(question);
            }
        }
    }

    Ok(questions)
}

fn parse_question(entry: &Value, source: &Path) -> Result<Option<Question>> {
    let kind = match entry.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => return Err(unsupported(source, &other.to_string())),
        None => return Err(unsupported(source, "<missing>")),
    };

    match kind {
        "FREESINGLE" | "CHOICESINGLE" | "CHOICEMULTIPLE" => {}
        // Multi-line free text has no interaction yet.
        "FREEMULTIPLE" => {
            tracing::debug!(
                "dropping FREEMULTIPLE question {:?}",
                entry.get("question").and_then(serde_json::Value::as_str)
            );
            return Ok(None);
        }
        other => return Err(unsupported(source, other)),
    }

    let text = entry
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| AssessmentError::MalformedQuestionnaire {
            path: source.to_path_buf(),
            reason: format!("{kind} question without question text"),
        })?;

    let kind = match kind {
        "CHOICESINGLE" => QuestionKind::SingleChoice {
            options: options(entry, text, source),
        },
        "CHOICEMULTIPLE" => QuestionKind::MultiChoice {
            options: options(entry, text, source),
        },
        _ => QuestionKind::FreeText,
    };

    Ok(Some(Question::new(kind, text)))
}

fn options(entry: &Value, text: &str, source: &Path) -> Vec<String> {
    match entry.get("options").and_then(Value::as_array) {
        Some(values) => values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => {
            tracing::warn!(
                "choice question '{}' in {} has no options",
                text,
                source.display()
            );
            Vec::new()
        }
    }
}

fn array_field<'a>(value: &'a Value, field: &str) -> &'a [Value] {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn unsupported(source: &Path, kind: &str) -> anyhow::Error {
    tracing::error!("got unexpected question type {} in {}", kind, source.display());
    AssessmentError::UnsupportedQuestionType {
        path: source.to_path_buf(),
        kind: kind.to_string(),
    }
    .into()
}
