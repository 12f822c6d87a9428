//! The `amt --action status` command.

use anyhow::Result;
use comfy_table::Table;

use amt_core::answers::{answer_path, load_prior_answers};
use amt_core::config::AmtConfig;
use amt_core::loader::load_questionnaires;

pub fn execute(config: &AmtConfig) -> Result<()> {
    let questions_schema = config.questions_schema()?;
    let answers_schema = config.answers_schema()?;

    let questionnaires = load_questionnaires(&config.questions_dir, &questions_schema)?;
    let prior = if config.output_dir.is_dir() {
        load_prior_answers(&config.output_dir, &answers_schema)?
    } else {
        Default::default()
    };

    let mut table = Table::new();
    table.set_header(vec!["Questionnaire", "Questions", "Answered", "Answer file"]);

    let mut total_answered = 0;
    let mut total_questions = 0;
    for questionnaire in &questionnaires {
        let answers = prior.get(&questionnaire.name);
        let answered = questionnaire
            .questions
            .iter()
            .filter(|q| answers.is_some_and(|a| a.contains_key(&q.key)))
            .count();
        let file = if answers.is_some() {
            answer_path(&config.output_dir, &questionnaire.name)
                .display()
                .to_string()
        } else if answer_path(&config.output_dir, &questionnaire.name).exists() {
            "invalid".to_string()
        } else {
            "-".to_string()
        };

        table.add_row(vec![
            questionnaire.name.clone(),
            questionnaire.questions.len().to_string(),
            answered.to_string(),
            file,
        ]);
        total_answered += answered;
        total_questions += questionnaire.questions.len();
    }

    println!("{table}");
    println!(
        "{} questionnaire(s), {total_answered}/{total_questions} question(s) answered.",
        questionnaires.len()
    );

    Ok(())
}
