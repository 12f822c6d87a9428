//! The `amt --action init` command.

use std::path::Path;

use anyhow::{Context, Result};

use amt_core::config::AmtConfig;
use amt_core::schema::{DEFAULT_ANSWERS_SCHEMA, DEFAULT_QUESTIONS_SCHEMA};

pub fn execute(config: &AmtConfig) -> Result<()> {
    write_if_missing(&config.questions_schema_path(), DEFAULT_QUESTIONS_SCHEMA)?;
    write_if_missing(&config.answers_schema_path(), DEFAULT_ANSWERS_SCHEMA)?;
    write_if_missing(
        &config.questions_dir.join("example.json"),
        EXAMPLE_QUESTIONNAIRE,
    )?;

    println!("\nNext steps:");
    println!(
        "  1. Add questionnaires to {}",
        config.questions_dir.display()
    );
    println!("  2. Run: amt --action status");
    println!("  3. Run: amt --action assessment");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const EXAMPLE_QUESTIONNAIRE: &str = r#"{
  "name": "Example assessment",
  "groups": [
    {
      "name": "Purpose",
      "questions": [
        {
          "question": "What is the system used for?",
          "type": "FREESINGLE"
        },
        {
          "question": "Does the system make decisions about people?",
          "type": "CHOICESINGLE",
          "options": ["yes", "no", "unknown"]
        }
      ]
    },
    {
      "name": "Data",
      "questions": [
        {
          "question": "Which kinds of data does the system process?",
          "type": "CHOICEMULTIPLE",
          "options": ["personal data", "special category data", "public data", "synthetic data"]
        }
      ]
    }
  ]
}
"#;
