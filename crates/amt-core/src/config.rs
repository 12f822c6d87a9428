//! Run configuration.
//!
//! Loaded from an optional `amt.toml`; command-line flags override
//! individual fields.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::schema::{Schema, ANSWERS_SCHEMA_FILE, QUESTIONS_SCHEMA_FILE};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "amt.toml";

/// Top-level amt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtConfig {
    /// Directory holding questionnaire definitions.
    #[serde(default = "default_questions_dir")]
    pub questions_dir: PathBuf,
    /// Directory answers are read from and written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory holding `questions.json` and `answers.json`.
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,
    /// Directory for `amt.log`.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Where the HTML report goes; defaults to `report.html` in the output dir.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

fn default_questions_dir() -> PathBuf {
    PathBuf::from("assessments")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}
fn default_schemas_dir() -> PathBuf {
    PathBuf::from("schemas")
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for AmtConfig {
    fn default() -> Self {
        Self {
            questions_dir: default_questions_dir(),
            output_dir: default_output_dir(),
            schemas_dir: default_schemas_dir(),
            log_dir: default_log_dir(),
            report_path: None,
        }
    }
}

impl AmtConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: AmtConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, else `amt.toml` if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn questions_schema_path(&self) -> PathBuf {
        self.schemas_dir.join(QUESTIONS_SCHEMA_FILE)
    }

    pub fn answers_schema_path(&self) -> PathBuf {
        self.schemas_dir.join(ANSWERS_SCHEMA_FILE)
    }

    /// Load the questionnaire schema. Missing is fatal.
    pub fn questions_schema(&self) -> Result<Schema> {
        Schema::load(&self.questions_schema_path())
    }

    /// Load the answers schema. Missing is fatal.
    pub fn answers_schema(&self) -> Result<Schema> {
        Schema::load(&self.answers_schema_path())
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join("report.html"))
    }
}
