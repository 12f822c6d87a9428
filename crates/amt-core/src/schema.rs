//! Structural validation of questionnaire and answer documents.
//!
//! Both document kinds are decoded into `serde_json::Value` first and checked
//! against a JSON Schema. What a violation means depends on the
//! [`ValidationPolicy`] of the caller.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use thiserror::Error;

use crate::error::AssessmentError;

/// File name of the questionnaire schema inside the schemas directory.
pub const QUESTIONS_SCHEMA_FILE: &str = "questions.json";

/// File name of the answers schema inside the schemas directory.
pub const ANSWERS_SCHEMA_FILE: &str = "answers.json";

/// Default schema for questionnaire definition files.
pub const DEFAULT_QUESTIONS_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Questionnaire",
  "type": "object",
  "required": ["groups"],
  "properties": {
    "name": { "type": "string" },
    "description": { "type": "string" },
    "groups": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["questions"],
        "properties": {
          "name": { "type": "string" },
          "questions": {
            "type": "array",
            "items": {
              "type": "object",
              "required": ["question", "type"],
              "properties": {
                "question": { "type": "string" },
                "type": {
                  "enum": ["FREESINGLE", "FREEMULTIPLE", "CHOICESINGLE", "CHOICEMULTIPLE"]
                },
                "options": {
                  "type": "array",
                  "items": { "type": "string" }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// Default schema for persisted answer files.
pub const DEFAULT_ANSWERS_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Answers",
  "type": "array",
  "items": {
    "type": "object",
    "required": ["question", "answer"],
    "additionalProperties": false,
    "properties": {
      "question": { "type": "string" },
      "answer": {
        "anyOf": [
          { "type": "string" },
          { "type": "array", "items": { "type": "string" } }
        ]
      }
    }
  }
}
"#;

/// The first place a document departs from its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// JSON pointer to the violating node, `/` for the document root.
    pub path: String,
    /// Validator message.
    pub reason: String,
}

/// A compiled schema together with the file it came from.
pub struct Schema {
    source: PathBuf,
    validator: jsonschema::Validator,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Load and compile a schema file. An unreadable file is a
    /// [`AssessmentError::MissingSchema`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("failed to read schema {}: {}", path.display(), e);
            AssessmentError::MissingSchema {
                path: path.to_path_buf(),
            }
        })?;
        Self::parse(&content, path)
    }

    /// Compile a schema from JSON text; `source` is only used in messages.
    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| AssessmentError::InvalidSchema {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_value(&value, source)
    }

    /// Compile an already decoded schema.
    pub fn from_value(value: &Value, source: &Path) -> Result<Self> {
        let validator =
            jsonschema::validator_for(value).map_err(|e| AssessmentError::InvalidSchema {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            source: source.to_path_buf(),
            validator,
        })
    }

    /// The built-in questionnaire schema.
    pub fn default_questions() -> Result<Self> {
        Self::parse(DEFAULT_QUESTIONS_SCHEMA, Path::new(QUESTIONS_SCHEMA_FILE))
    }

    /// The built-in answers schema.
    pub fn default_answers() -> Result<Self> {
        Self::parse(DEFAULT_ANSWERS_SCHEMA, Path::new(ANSWERS_SCHEMA_FILE))
    }

    /// Check a document, reporting the first violation.
    pub fn validate(&self, document: &Value) -> Result<(), SchemaViolation> {
        match self.validator.iter_errors(document).next() {
            None => Ok(()),
            Some(error) => {
                let path = error.instance_path.to_string();
                Err(SchemaViolation {
                    path: if path.is_empty() { "/".to_string() } else { path },
                    reason: error.to_string(),
                })
            }
        }
    }
}

/// What a schema violation does to the document that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// The document is rejected.
    Strict,
    /// The violation is logged and the document is used anyway.
    Advisory,
}

impl ValidationPolicy {
    /// Validate `document` and decide whether the caller should use it.
    /// Violations are logged with the offending file and node in both modes.
    pub fn admits(self, schema: &Schema, document: &Value, source: &Path) -> bool {
        match schema.validate(document) {
            Ok(()) => true,
            Err(violation) => match self {
                ValidationPolicy::Strict => {
                    tracing::warn!(
                        "{} has invalid schema, ignoring it ({})",
                        source.display(),
                        violation
                    );
                    false
                }
                ValidationPolicy::Advisory => {
                    tracing::warn!(
                        "{} has invalid schema, loading it anyway ({})",
                        source.display(),
                        violation
                    );
                    true
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_schemas_compile() {
        assert!(Schema::default_questions().is_ok());
        assert!(Schema::default_answers().is_ok());
    }

    #[test]
    fn answers_schema_accepts_strings_and_sequences() {
        let schema = Schema::default_answers().unwrap();
        let doc = json!([
            { "question": "Q1", "answer": "yes" },
            { "question": "Q2", "answer": ["a", "b"] }
        ]);
        assert!(schema.validate(&doc).is_ok());
    }

    #[test]
    fn answers_schema_reports_violating_path() {
        let schema = Schema::default_answers().unwrap();
        let doc = json!([
            { "question": "Q1", "answer": "yes" },
            { "question": "Q2", "answer": 42 }
        ]);
        let violation = schema.validate(&doc).unwrap_err();
        assert!(
            violation.path.starts_with("/1"),
            "unexpected path {}",
            violation.path
        );
    }

    #[test]
    fn questions_schema_rejects_unknown_type() {
        let schema = Schema::default_questions().unwrap();
        let doc = json!({
            "groups": [{ "questions": [{ "question": "Q", "type": "BOGUS" }] }]
        });
        assert!(schema.validate(&doc).is_err());
    }

    #[test]
    fn root_violation_uses_slash() {
        let schema = Schema::default_answers().unwrap();
        let violation = schema.validate(&json!({ "not": "a list" })).unwrap_err();
        assert_eq!(violation.path, "/");
    }

    #[test]
    fn policies_differ_only_on_violation() {
        let schema = Schema::default_answers().unwrap();
        let good = json!([]);
        let bad = json!("nope");
        let src = Path::new("out/x.yaml");

        assert!(ValidationPolicy::Strict.admits(&schema, &good, src));
        assert!(ValidationPolicy::Advisory.admits(&schema, &good, src));
        assert!(!ValidationPolicy::Strict.admits(&schema, &bad, src));
        assert!(ValidationPolicy::Advisory.admits(&schema, &bad, src));
    }

    #[test]
    fn missing_schema_file_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schema::load(&dir.path().join("questions.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::MissingSchema { .. })
        ));
    }

    #[test]
    fn malformed_schema_file_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Schema::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::InvalidSchema { .. })
        ));
    }
}
