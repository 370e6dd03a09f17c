//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bank_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/questions.json")
}

/// Command isolated from any user config and judge credentials.
fn jagdkurs(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("jagdkurs").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("CHATGPT_API_KEY")
        .env_remove("OPENAI_MODEL")
        .env_remove("REPORT_WEBHOOK_URL")
        .env_remove("REPORT_MAIL_RELAY_URL")
        .env_remove("REPORT_MAIL_TO");
    cmd
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn subjects_lists_bank_and_combined_subject() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .arg("subjects")
        .arg("--bank")
        .arg(bank_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wildkunde"))
        .stdout(predicate::str::contains("Jagdrecht"))
        .stdout(predicate::str::contains("Wildkrankheiten & Hunde (combined)"));
}

#[test]
fn validate_sample_bank() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .arg("validate")
        .arg("--bank")
        .arg(bank_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4 subjects"))
        .stdout(predicate::str::contains("duplicate of"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_missing_bank() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn generate_json_is_reproducible_with_seed() {
    let home = TempDir::new().unwrap();
    let run = || {
        let output = jagdkurs(&home)
            .args(["generate", "--subject", "Wildkunde", "--seed", "42", "--bank"])
            .arg(bank_path())
            .output()
            .unwrap();
        assert!(output.status.success());
        stdout_json(&output.stdout)
    };

    let first = run();
    let second = run();
    assert_eq!(first["subject"], "Wildkunde");
    let questions = first["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 20);
    assert!(questions.iter().all(|q| q["Pruefungsfach"] == "Wildkunde"));
    assert_eq!(first["questions"], second["questions"]);
}

#[test]
fn generate_combined_subject() {
    let home = TempDir::new().unwrap();
    let output = jagdkurs(&home)
        .args([
            "generate",
            "--subject",
            "Wildkrankheiten & Hunde",
            "--seed",
            "7",
            "--bank",
        ])
        .arg(bank_path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let set = stdout_json(&output.stdout);
    assert_eq!(set["subject"], "Wildkrankheiten & Hunde");
    assert_eq!(set["questions"].as_array().unwrap().len(), 20);
}

#[test]
fn generate_unknown_subject_fails() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .args(["generate", "--subject", "Waffenkunde", "--bank"])
        .arg(bank_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn generate_html_sheet_with_answer_key() {
    let home = TempDir::new().unwrap();
    let sheet = home.path().join("jagdrecht.html");

    jagdkurs(&home)
        .args(["generate", "--subject", "Jagdrecht", "--format", "html", "--answer-key"])
        .arg("--output")
        .arg(&sheet)
        .arg("--bank")
        .arg(bank_path())
        .assert()
        .success();

    let html = std::fs::read_to_string(&sheet).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Jagdkurs - Jagdrecht"));
    assert!(html.contains("Jagdkurs - Lösungen - Jagdrecht"));
}

#[test]
fn answer_key_requires_html() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .args(["generate", "--subject", "Jagdrecht", "--answer-key", "--bank"])
        .arg(bank_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--answer-key requires --format html"));
}

#[test]
fn generate_mc_full_writes_one_file_per_subject() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("sets");

    jagdkurs(&home)
        .args(["generate-mc-full", "--seed", "3", "--output-dir"])
        .arg(&out)
        .arg("--bank")
        .arg(bank_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4 set(s) written."));

    for name in [
        "mc-wildkunde.json",
        "mc-jagdrecht.json",
        "mc-hundewesen.json",
        "mc-wildkrankheiten.json",
    ] {
        let content = std::fs::read_to_string(out.join(name)).unwrap();
        let set: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(set["questions"].as_array().unwrap().len(), 20, "{name}");
    }
    assert!(!out.join("mc-wildkrankheiten-hunde.json").exists());
}

#[test]
fn evaluate_offline_uses_heuristic() {
    let home = TempDir::new().unwrap();
    let output = jagdkurs(&home)
        .args([
            "evaluate",
            "--question",
            "Was trägt der Rehbock?",
            "--model-answer",
            "Der Rehbock trägt ein Gehörn",
            "--user-answer",
            "der rehbock trägt ein gehörn",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output.stdout);
    assert_eq!(result["score"], 2);
    assert_eq!(result["mode"], "heuristic");
}

#[test]
fn evaluate_without_question_fails() {
    let home = TempDir::new().unwrap();
    jagdkurs(&home)
        .args(["evaluate", "--model-answer", "Gehörn", "--user-answer", "Gehörn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("question"));
}

#[tokio::test(flavor = "multi_thread")]
async fn evaluate_through_configured_judge() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "output_text": "{\"score\":1,\"reason\":\"unvollständig\"}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let config = home.path().join("jagdkurs.toml");
    std::fs::write(
        &config,
        format!(
            "[judge]\napi_key = \"test-key\"\nbase_url = \"{}\"\ntimeout_secs = 5\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = jagdkurs(&home);
    cmd.args([
        "evaluate",
        "--question",
        "Welche Wildart hält Winterruhe?",
        "--model-answer",
        "Dachs",
        "--user-answer",
        "ein Marder",
    ])
    .arg("--config")
    .arg(&config);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output.stdout);
    assert_eq!(result["score"], 1);
    assert_eq!(result["mode"], "llm");
    assert_eq!(result["reason"], "unvollständig");
}

#[test]
fn followup_offline_falls_back() {
    let home = TempDir::new().unwrap();
    let output = jagdkurs(&home)
        .args([
            "followup",
            "--question",
            "Was trägt der Rehbock?",
            "--model-answer",
            "Ein Gehörn",
            "--followup",
            "Wird das Gehörn abgeworfen?",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let answer = stdout_json(&output.stdout);
    assert_eq!(answer["mode"], "fallback");
    assert!(answer["answer"]
        .as_str()
        .unwrap()
        .starts_with("Hinweis: Die folgende Antwort ist nicht mit Sicherheit korrekt."));
}

#[test]
fn report_without_channels_is_acknowledged() {
    let home = TempDir::new().unwrap();
    let output = jagdkurs(&home)
        .args([
            "report",
            "--subject",
            "Wildkunde",
            "--mode",
            "mc",
            "--question",
            "Wie heißt der Schwanz des Fuchses?",
            "--answer",
            "Lunte",
            "--reason",
            "Standarte fehlt als Alternative",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let receipt = stdout_json(&output.stdout);
    assert_eq!(receipt["ok"], true);
    assert_eq!(receipt["webhook"]["status"], "skipped");
    assert_eq!(receipt["email"]["status"], "skipped");
}

#[test]
fn init_creates_config() {
    let home = TempDir::new().unwrap();

    jagdkurs(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created jagdkurs.toml"));
    assert!(home.path().join("jagdkurs.toml").exists());

    jagdkurs(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
