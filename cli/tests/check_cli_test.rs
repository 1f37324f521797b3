use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn reports_errors_with_exit_code_one() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = dir.path().join("bad.42AHH");
    fs::write(&script, "int count = \"many\";\nprint(count);\n")?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "bad.42AHH"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("bad.42AHH:1:13: error[assignment-type]"));

    Ok(())
}

#[test]
fn clean_file_exits_zero() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("ok.42AHH"),
        "tantrum int twice(int n) {\n    return n * 2;\n}\n\ntantrum main() {\n    print(twice(4));\n}\n",
    )?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "ok.42AHH"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 error(s), 0 warning(s)"));

    Ok(())
}

#[test]
fn warnings_alone_do_not_fail() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("warn.42AHH"), "int unused = 1;\n")?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "warn.42AHH"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("warning[unused-variable]"));

    Ok(())
}

#[test]
fn json_output_lists_each_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.42AHH"), "print(1 / 0);\n")?;
    fs::write(dir.path().join("b.42AHH"), "print(2);\n")?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "a.42AHH", "b.42AHH", "--format", "json"]);
    let output = cmd.output()?;
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let files = value.as_array().expect("array of file reports");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file"], "a.42AHH");
    assert_eq!(files[0]["diagnostics"][0]["rule"], "division-by-zero");
    assert_eq!(files[1]["diagnostics"].as_array().map(Vec::len), Some(0));

    Ok(())
}

#[test]
fn config_file_disables_rules() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.42AHH"), "print(1 / 0);\n")?;
    fs::write(dir.path().join("tantrums-lint.toml"), "disabled = [\"division-by-zero\"]\n")?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "a.42AHH"]);
    cmd.assert().success();

    Ok(())
}

#[test]
fn unknown_rule_in_config_is_a_load_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.42AHH"), "print(1);\n")?;
    fs::write(dir.path().join("lint.toml"), "disabled = [\"no-such-rule\"]\n")?;

    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "a.42AHH", "--config", "lint.toml"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("no-such-rule"));

    Ok(())
}

#[test]
fn missing_file_exits_two() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.current_dir(dir.path()).args(["check", "nope.42AHH"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read file 'nope.42AHH'"));

    Ok(())
}

#[test]
fn rules_subcommand_lists_codes() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("tantrums-lint")?;
    cmd.arg("rules");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("missing-semicolon"))
        .stdout(predicate::str::contains("division-by-zero"));

    Ok(())
}
