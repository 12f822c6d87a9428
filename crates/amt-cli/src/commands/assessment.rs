//! The `amt --action assessment` command.

use anyhow::{Context, Result};

use amt_core::answers::load_prior_answers;
use amt_core::config::AmtConfig;
use amt_core::engine::{run_assessment, SessionState};
use amt_core::error::AssessmentError;
use amt_core::loader::load_questionnaires;
use amt_prompts::TerminalPrompter;

pub fn execute(config: &AmtConfig) -> Result<()> {
    // Configuration problems surface before the first prompt.
    let questions_schema = config.questions_schema()?;
    let answers_schema = config.answers_schema()?;

    if config.output_dir.exists() && !config.output_dir.is_dir() {
        return Err(AssessmentError::NotADirectory(config.output_dir.clone()).into());
    }
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    println!("{}", "=".repeat(50));
    println!("Welcome to AMT! We have a few questions for you.");
    println!("{}", "=".repeat(50));

    let questionnaires = load_questionnaires(&config.questions_dir, &questions_schema)?;
    let prior = load_prior_answers(&config.output_dir, &answers_schema)?;

    let mut prompter = TerminalPrompter::new();
    let summary = run_assessment(&questionnaires, &prior, &config.output_dir, &mut prompter)?;

    println!();
    for saved in &summary.saved {
        let note = match saved.state {
            SessionState::Aborted => " (partial)",
            _ => "",
        };
        println!(
            "  {}: {} answer(s) saved to {}{note}",
            saved.questionnaire,
            saved.answered,
            saved.path.display()
        );
    }

    if summary.aborted {
        let skipped = questionnaires.len() - summary.saved.len();
        println!("\nAborted. {skipped} questionnaire(s) not started; run again to resume.");
    } else if questionnaires.is_empty() {
        println!(
            "No questionnaires found in {}.",
            config.questions_dir.display()
        );
    } else {
        println!("\nAll questionnaires completed.");
    }

    Ok(())
}
