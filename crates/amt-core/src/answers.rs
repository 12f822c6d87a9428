//! Answer files: loading prior answers and persisting new ones.
//!
//! Each questionnaire has one YAML file in the output directory, named after
//! the questionnaire, holding an ordered list of `{question, answer}`
//! records.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::loader::matching_files;
use crate::model::{AnswerRecord, PriorAnswerIndex, PriorAnswers, SessionResult};
use crate::schema::{Schema, ValidationPolicy};

/// Extension of persisted answer files.
pub const ANSWER_EXTENSION: &str = "yaml";

/// Path of the answer file for a questionnaire.
pub fn answer_path(output_dir: &Path, questionnaire: &str) -> PathBuf {
    output_dir.join(format!("{questionnaire}.{ANSWER_EXTENSION}"))
}

/// Build the prior answer index from the answer files in `output_dir`.
///
/// Files that fail to decode or violate the schema are excluded entirely.
pub fn load_prior_answers(output_dir: &Path, schema: &Schema) -> Result<PriorAnswerIndex> {
    let mut index = PriorAnswerIndex::new();

    for path in matching_files(output_dir, ANSWER_EXTENSION)? {
        if let Some(records) = read_answer_file(&path, schema)? {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let answers: PriorAnswers = records
                .into_iter()
                .map(|r| (r.question, r.answer))
                .collect();
            tracing::debug!("loaded {} prior answer(s) for {}", answers.len(), name);
            index.insert(name, answers);
        }
    }

    Ok(index)
}

/// Read one answer file. `Ok(None)` means the file was skipped.
fn read_answer_file(path: &Path, schema: &Schema) -> Result<Option<Vec<AnswerRecord>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;

    let document: Value = match serde_yaml::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("answers {} are not valid YAML, ignoring them: {}", path.display(), e);
            return Ok(None);
        }
    };

    if !ValidationPolicy::Strict.admits(schema, &document, path) {
        return Ok(None);
    }

    match serde_json::from_value(document) {
        Ok(records) => Ok(Some(records)),
        Err(e) => {
            tracing::warn!("answers {} could not be decoded, ignoring them: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Write the answers of one questionnaire, replacing any earlier file.
///
/// Creates `output_dir` if needed and returns the written path.
pub fn persist_answers(
    questionnaire: &str,
    result: &SessionResult,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let path = answer_path(output_dir, questionnaire);
    let yaml = serde_yaml::to_string(result.records())
        .with_context(|| format!("failed to serialize answers of {questionnaire}"))?;
    std::fs::write(&path, yaml)
        .with_context(|| format!("failed to write answers to {}", path.display()))?;

    tracing::info!("saved answers of {} to {}", questionnaire, path.display());
    Ok(path)
}
