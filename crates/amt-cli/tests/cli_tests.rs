//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn amt() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("amt").unwrap()
}

/// A temp working directory with the starter files from `init`.
fn initialized_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    amt()
        .current_dir(dir.path())
        .args(["--action", "init"])
        .assert()
        .success();
    dir
}

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn help_output() {
    amt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Terminal assessment tool for machine-learning systems",
        ));
}

#[test]
fn version_output() {
    amt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("amt"));
}

#[test]
fn action_is_required() {
    amt().assert().failure();
}

#[test]
fn unknown_action_is_rejected() {
    amt()
        .args(["--action", "transform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("transform"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    amt()
        .current_dir(dir.path())
        .args(["--action", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created schemas/questions.json"))
        .stdout(predicate::str::contains("Created schemas/answers.json"))
        .stdout(predicate::str::contains("Created assessments/example.json"));

    assert!(dir.path().join("schemas/questions.json").exists());
    assert!(dir.path().join("schemas/answers.json").exists());
    assert!(dir.path().join("assessments/example.json").exists());
    assert!(dir.path().join("logs/amt.log").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized_dir();

    amt()
        .current_dir(dir.path())
        .args(["--action", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn status_lists_questionnaires() {
    let dir = initialized_dir();

    amt()
        .current_dir(dir.path())
        .args(["--action", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example"))
        .stdout(predicate::str::contains("0/3 question(s) answered"));
}

#[test]
fn status_counts_saved_answers() {
    let dir = initialized_dir();
    write(
        dir.path(),
        "out/example.yaml",
        "- question: What is the system used for?\n  answer: Ranking loan applications\n",
    );

    amt()
        .current_dir(dir.path())
        .args(["--action", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/3 question(s) answered"));
}

#[test]
fn status_fails_on_unsupported_question_type() {
    let dir = initialized_dir();
    write(
        dir.path(),
        "assessments/bogus.json",
        r#"{"groups": [{"questions": [{"question": "Q", "type": "BOGUS"}]}]}"#,
    );

    amt()
        .current_dir(dir.path())
        .args(["--action", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected question type BOGUS"));
}

#[test]
fn assessment_requires_schemas() {
    let dir = TempDir::new().unwrap();

    amt()
        .current_dir(dir.path())
        .args(["--action", "assessment"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema file not found"))
        .stderr(predicate::str::contains("amt --action init"))
        .stdout(predicate::str::contains("Welcome").not());
}

#[test]
fn assessment_rejects_outputdir_that_is_a_file() {
    let dir = initialized_dir();
    write(dir.path(), "answers.txt", "not a directory");

    amt()
        .current_dir(dir.path())
        .args(["--action", "assessment", "--outputdir", "answers.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("answers.txt must be a directory"))
        .stderr(predicate::str::contains("amt --action init"))
        .stdout(predicate::str::contains("Welcome").not());
}

#[test]
fn assessment_rejects_missing_inputdir() {
    let dir = initialized_dir();

    amt()
        .current_dir(dir.path())
        .args(["--action", "assessment", "--inputdir", "no-such-dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a directory"));
}

#[test]
fn assessment_with_no_questionnaires() {
    let dir = initialized_dir();
    std::fs::create_dir(dir.path().join("empty")).unwrap();

    amt()
        .current_dir(dir.path())
        .args(["--action", "assessment", "--inputdir", "empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No questionnaires found"));

    assert!(dir.path().join("out").is_dir());
}

#[test]
fn assessment_writes_empty_questionnaire_without_prompting() {
    let dir = initialized_dir();
    write(
        dir.path(),
        "only_free/notes.json",
        r#"{"groups": [{"questions": [{"question": "Anything else?", "type": "FREEMULTIPLE"}]}]}"#,
    );

    amt()
        .current_dir(dir.path())
        .args([
            "--action",
            "assessment",
            "--inputdir",
            "only_free",
            "--outputdir",
            "results",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You have finished filling out this questionnaire.",
        ))
        .stdout(predicate::str::contains("All questionnaires completed"));

    let saved = std::fs::read_to_string(dir.path().join("results/notes.yaml")).unwrap();
    let records: Vec<serde_yaml::Value> = serde_yaml::from_str(&saved).unwrap();
    assert!(records.is_empty());
}

#[test]
fn shap_is_unsupported() {
    let dir = TempDir::new().unwrap();

    amt()
        .current_dir(dir.path())
        .args(["--action", "shap", "--model", "model.sav", "--data", "data.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported action shap"))
        .stderr(predicate::str::contains("amt --action init").not());
}

#[test]
fn shap_requires_model_and_data() {
    amt()
        .args(["--action", "shap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--model"));
}

#[test]
fn report_requires_card() {
    let dir = TempDir::new().unwrap();

    amt()
        .current_dir(dir.path())
        .args(["--action", "report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--card is required for the report action",
        ));
}

#[test]
fn report_renders_card_with_included_answers() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "out/example.yaml",
        "- question: What is the system used for?\n  answer: Ranking loan applications\n",
    );
    write(
        dir.path(),
        "system_card.yaml",
        "name: Loan ranker\nassessments:\n  example: !include out/example.yaml\n",
    );

    amt()
        .current_dir(dir.path())
        .args(["--action", "report", "--card", "system_card.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let html = std::fs::read_to_string(dir.path().join("out/report.html")).unwrap();
    assert!(html.contains("Loan ranker"));
    assert!(html.contains("Ranking loan applications"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = initialized_dir();
    write(dir.path(), "amt.toml", "report_path = \"site/index.html\"\n");
    write(dir.path(), "card.yaml", "name: Configured\n");

    amt()
        .current_dir(dir.path())
        .args(["--action", "report", "--card", "card.yaml"])
        .assert()
        .success();

    assert!(dir.path().join("site/index.html").exists());
}
