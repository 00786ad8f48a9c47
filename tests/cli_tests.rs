use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn aula() -> Command {
    Command::cargo_bin("aula").expect("binary built")
}

#[test]
fn help_lists_the_main_commands() {
    aula()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("content"))
        .stdout(predicate::str::contains("forum"))
        .stdout(predicate::str::contains("leaderboard"))
        .stdout(predicate::str::contains("tutor"));
}

#[test]
fn content_help_lists_the_editing_commands() {
    aula()
        .args(["content", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("cover"));
}

#[test]
fn check_config_accepts_a_valid_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("aula.toml");
    fs::write(
        &path,
        r#"
[store]
url = "http://localhost:54321"
anon_key = "anon-key"

[webhook]
chat_url = "http://localhost:5678/webhook/chat"
ingest_url = "http://localhost:5678/webhook/upload-document"

[logging]
level = "info"
format = "pretty"
"#,
    )
    .expect("write config");

    aula()
        .args(["--config"])
        .arg(&path)
        .args(["check", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration file is valid"));
}

#[test]
fn check_config_fails_on_a_missing_file() {
    aula()
        .args(["--config", "/nonexistent/aula.toml", "check", "config"])
        .assert()
        .failure();
}

#[test]
fn commands_fail_cleanly_without_a_config() {
    aula()
        .args(["--config", "/nonexistent/aula.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn forum_post_requires_an_actor() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("aula.toml");
    fs::write(
        &path,
        r#"
[store]
url = "http://localhost:54321"
anon_key = "anon-key"

[webhook]
chat_url = "http://localhost:5678/webhook/chat"
ingest_url = "http://localhost:5678/webhook/upload-document"

[logging]
level = "error"
format = "pretty"
"#,
    )
    .expect("write config");

    aula()
        .args(["--config"])
        .arg(&path)
        .args(["forum", "post", "A title", "some content that is long enough"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("authenticated user"));
}
