use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn text_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes())
        .expect("write temp file");
    file
}

#[test]
fn tokenize_prints_treeviz_by_default() {
    let input = text_file("hello [name] world\n\nplain\n");
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize").arg(input.path());

    let output_pred = predicate::str::contains("⊕ \"[name]\"")
        .and(predicate::str::contains("◦ \"hello \""))
        .and(predicate::str::contains("¶ plain"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn tokenize_json_output() {
    let input = text_file("[id]");
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize")
        .arg(input.path())
        .arg("--format")
        .arg("json");

    let output_pred = predicate::str::contains("\"type\": \"variable\"")
        .and(predicate::str::contains("\"mode\": \"token\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn tokenize_reads_stdin() {
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize").arg("-").arg("--format").arg("html");
    cmd.write_stdin("Dear [customer]");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<p><span>Dear </span><span style=\"color: #0070F3;"));
}

#[test]
fn config_file_changes_theme_and_format() {
    let config = text_file(
        "[editor.theme.variable]\ncolor = \"#123456\"\n\n[output]\nformat = \"html\"\n",
    );
    let input = text_file("[x]");
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize")
        .arg(input.path())
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("color: #123456"));
}

#[test]
fn normalize_tokenizes_saved_state() {
    let state = text_file(
        r#"{"root":{"children":[{"children":[{"text":"a [b]","type":"text"}],"type":"paragraph"}],"type":"root"}}"#,
    );
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("normalize")
        .arg(state.path())
        .arg("--format")
        .arg("text");

    cmd.assert().success().stdout("a [b]\n");
}

#[test]
fn normalize_rejects_unknown_node_type() {
    let state = text_file(
        r#"{"root":{"children":[{"children":[{"text":"@bob","type":"mention"}],"type":"paragraph"}],"type":"root"}}"#,
    );
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("normalize").arg(state.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown node type 'mention'"));
}

#[test]
fn unknown_format_fails() {
    let input = text_file("[x]");
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize")
        .arg(input.path())
        .arg("--format")
        .arg("pdf");

    let error_pred = predicate::str::contains("unknown format 'pdf'")
        .and(predicate::str::contains("treeviz"));

    cmd.assert().failure().stderr(error_pred);
}

#[test]
fn missing_input_fails() {
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("tokenize").arg("/nonexistent/input.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read '/nonexistent/input.txt'"));
}

#[test]
fn verbose_logs_conversions_to_stderr() {
    let input = text_file("[x]");
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("--verbose").arg("tokenize").arg(input.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Converted marker to variable"));
}

#[test]
fn formats_lists_all() {
    let mut cmd = cargo_bin_cmd!("vartok");
    cmd.arg("formats");

    let output_pred = predicate::str::contains("treeviz")
        .and(predicate::str::contains("json"))
        .and(predicate::str::contains("yaml"))
        .and(predicate::str::contains("html"))
        .and(predicate::str::contains("text"));

    cmd.assert().success().stdout(output_pred);
}
