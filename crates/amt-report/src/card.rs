//! System card loading.
//!
//! A system card is a YAML document describing an ML system. Parts of it
//! can live in other files and be pulled in with `!include <path>`, which
//! is how answer files written by an assessment end up in the report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Includes nested deeper than this are assumed to be a cycle.
const MAX_INCLUDE_DEPTH: usize = 16;

/// Errors specific to system card structure.
#[derive(Debug, Error)]
pub enum CardError {
    /// The card root is not a mapping.
    #[error("system card {} must be a mapping", .0.display())]
    NotAMapping(PathBuf),

    /// An `!include` tag does not hold a path.
    #[error("invalid !include in {}: {reason}", .path.display())]
    InvalidInclude { path: PathBuf, reason: String },

    /// Includes nested too deep, most likely a cycle.
    #[error("!include nesting too deep at {}", .0.display())]
    IncludeTooDeep(PathBuf),
}

/// A loaded system card with all includes resolved.
#[derive(Debug, Clone)]
pub struct SystemCard {
    /// File the card was loaded from.
    pub source: PathBuf,
    /// Card contents.
    pub data: Mapping,
}

impl SystemCard {
    /// Load a card, resolving `!include` tags relative to the including file
    /// and renaming `model-index` to `model_index` in every model.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match load_yaml(path, 0)? {
            Value::Mapping(mapping) => mapping,
            _ => return Err(CardError::NotAMapping(path.to_path_buf()).into()),
        };

        let mut card = SystemCard {
            source: path.to_path_buf(),
            data,
        };
        card.normalise_models();
        tracing::info!("loaded system card {}", path.display());
        Ok(card)
    }

    /// Card title: its `name` field, else the file stem.
    pub fn name(&self) -> String {
        match self.data.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => self
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "system card".to_string()),
        }
    }

    fn normalise_models(&mut self) {
        if let Some(Value::Sequence(models)) = self.data.get_mut("models") {
            for model in models.iter_mut() {
                if let Value::Mapping(model) = model {
                    if let Some(index) = model.remove("model-index") {
                        model.insert(Value::String("model_index".into()), index);
                    }
                }
            }
        }
    }
}

fn load_yaml(path: &Path, depth: usize) -> Result<Value> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(CardError::IncludeTooDeep(path.to_path_buf()).into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse YAML: {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_includes(value, base_dir, path, depth)
}

fn resolve_includes(value: Value, base_dir: &Path, source: &Path, depth: usize) -> Result<Value> {
    match value {
        Value::Tagged(tagged) if tagged.tag.to_string().trim_start_matches('!') == "include" => {
            let Value::String(relative) = tagged.value else {
                return Err(CardError::InvalidInclude {
                    path: source.to_path_buf(),
                    reason: "expected a file path".into(),
                }
                .into());
            };
            load_yaml(&base_dir.join(relative), depth + 1)
        }
        Value::Tagged(mut tagged) => {
            tagged.value = resolve_includes(tagged.value, base_dir, source, depth)?;
            Ok(Value::Tagged(tagged))
        }
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| resolve_includes(item, base_dir, source, depth))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Mapping(mapping) => {
            let mut resolved = Mapping::new();
            for (key, value) in mapping {
                resolved.insert(key, resolve_includes(value, base_dir, source, depth)?);
            }
            Ok(Value::Mapping(resolved))
        }
        scalar => Ok(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_includes_relative_to_card() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("out")).unwrap();
        std::fs::write(
            dir.path().join("out/safety.yaml"),
            "- question: Q1\n  answer: yes please\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("card.yaml"),
            "name: Loan ranker\nassessments:\n  safety: !include out/safety.yaml\n",
        )
        .unwrap();

        let card = SystemCard::load(&dir.path().join("card.yaml")).unwrap();
        assert_eq!(card.name(), "Loan ranker");

        let included = &card.data["assessments"]["safety"];
        assert_eq!(included[0]["answer"], Value::String("yes please".into()));
    }

    #[test]
    fn renames_model_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("card.yaml"),
            "models:\n  - name: m1\n    model-index:\n      - results: []\n",
        )
        .unwrap();

        let card = SystemCard::load(&dir.path().join("card.yaml")).unwrap();
        let model = &card.data["models"][0];
        assert!(model.get("model-index").is_none());
        assert!(model.get("model_index").is_some());
    }

    #[test]
    fn include_cycle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yaml"), "next: !include b.yaml\n").unwrap();
        std::fs::write(dir.path().join("b.yaml"), "next: !include a.yaml\n").unwrap();

        let err = SystemCard::load(&dir.path().join("a.yaml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CardError>(),
            Some(CardError::IncludeTooDeep(_))
        ));
    }

    #[test]
    fn non_mapping_card_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("card.yaml"), "- just\n- a list\n").unwrap();

        let err = SystemCard::load(&dir.path().join("card.yaml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CardError>(),
            Some(CardError::NotAMapping(_))
        ));
    }

    #[test]
    fn name_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my_system.yaml"), "owner: team\n").unwrap();

        let card = SystemCard::load(&dir.path().join("my_system.yaml")).unwrap();
        assert_eq!(card.name(), "my_system");
    }
}
