use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("uk-ner-highlight").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn analyze_prints_highlight_and_summary() {
    let mut cmd = Command::cargo_bin("uk-ner-highlight").expect("binary exists");
    let output = cmd
        .env("NER_BACKEND", "gazetteer")
        .env_remove("NER_GAZETTEER_PATH")
        .args(["analyze", "--text", "Я відвідав Рим."])
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Я відвідав <span style='color:blue; font-weight:bold;'>Рим</span>."));
    assert!(stdout.contains("Рим (LOC)"));
}

#[test]
fn analyze_reads_stdin_and_reports_nothing_found() {
    let mut cmd = Command::cargo_bin("uk-ner-highlight").expect("binary exists");
    let output = cmd
        .env("NER_BACKEND", "gazetteer")
        .env_remove("NER_GAZETTEER_PATH")
        .arg("analyze")
        .write_stdin("просто слова")
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Власні назви не знайдено."));
}
