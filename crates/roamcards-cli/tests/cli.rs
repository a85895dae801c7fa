use std::process::Command;
use tempfile::TempDir;

const EXPORT: &str = r#"[
  {"title": "Geography", "children": [
    {"string": "Capital of France? #ankify", "uid": "basic0001",
     "children": [{"string": "Paris", "uid": "answer001"}]},
    {"string": "{Rome} is in Italy #ankify", "uid": "cloze0001"},
    {"string": "not a card", "uid": "plain0001"}
  ]}
]"#;

fn roamcards(args: &[&str], config_dir: &TempDir) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_roamcards"))
        .args(args)
        .arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn prints_one_note_per_line() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("graph.json");
    std::fs::write(&export, EXPORT).unwrap();

    let output = roamcards(&[export.to_str().unwrap()], &dir);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let notes: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["modelName"], "Roam Basic");
    assert_eq!(notes[0]["fields"]["Back"], r#"<div class="back-side">Paris</div>"#);
    assert_eq!(notes[1]["modelName"], "Roam Cloze");
    assert_eq!(notes[1]["fields"]["uid"], "cloze0001");
}

#[test]
fn config_file_supplies_export_and_deck() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("graph.json");
    std::fs::write(&export, EXPORT).unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!("export_path = {:?}\ndeck = \"Travel\"\n", export.to_str().unwrap()),
    )
    .unwrap();

    let output = roamcards(&["--deck", "Override"], &dir);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["deckName"], "Override");
}

#[test]
fn missing_export_path_fails() {
    let dir = TempDir::new().unwrap();

    let output = roamcards(&[], &dir);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No export path provided"));
}
