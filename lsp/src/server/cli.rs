use std::path::{Component, Path};

use anyhow::{bail, Context};

use crate::analyzer::TantrumsAnalyzer;

const USAGE: &str = "Usage: tantrums-lsp --analyze [--errors-only] <relative-file-path>
  --analyze <file>     : analyse one file and print JSON
  --errors-only        : print only errors, one per line";

/// One-shot analysis from the command line. `None` means start the server.
pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    cli_analyze(&args)
}

fn cli_analyze(args: &[String]) -> anyhow::Result<Option<String>> {
    if !args.iter().any(|a| a == "--analyze") {
        return Ok(None);
    }
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("{USAGE}");
    };
    let errors_only = args.iter().any(|a| a == "--errors-only");

    let content = read_file_content(path)?;
    let analysis = TantrumsAnalyzer::new().analyze(&content);

    if !errors_only {
        return Ok(Some(serde_json::to_string_pretty(&analysis)?));
    }
    let errors: Vec<String> = analysis
        .errors()
        .map(|d| format!("Line {}:{}: {}", d.range.start.line + 1, d.range.start.character + 1, d.message))
        .collect();
    if errors.is_empty() {
        Ok(Some("No errors found".to_string()))
    } else {
        Ok(Some(errors.join("\n")))
    }
}

/// Only plain relative paths below the working directory are accepted.
pub(crate) fn is_safe_path(path: &str) -> bool {
    let p = Path::new(path);
    if p.as_os_str().is_empty() || p.is_absolute() {
        return false;
    }
    if p.components().any(|c| matches!(c, Component::ParentDir | Component::Prefix(_))) {
        return false;
    }
    if path.chars().any(char::is_control) {
        return false;
    }
    // drive letters such as `C:foo`
    !matches!(path.as_bytes(), [_, b':', ..])
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        bail!("Refusing to read '{path}': only relative paths inside the working directory are allowed");
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{path}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_safe_paths() {
        assert!(is_safe_path("main.42AHH"));
        assert!(is_safe_path("src/lib/util.42AHH"));
        assert!(!is_safe_path(""));
        assert!(!is_safe_path("/etc/passwd"));
        assert!(!is_safe_path("../secret.42AHH"));
        assert!(!is_safe_path("a/../../b.42AHH"));
        assert!(!is_safe_path("C:evil.42AHH"));
        assert!(!is_safe_path("bad\nname.42AHH"));
    }

    #[test]
    fn test_without_flag_starts_server() {
        assert!(cli_analyze(&args(&["--stdio"])).unwrap().is_none());
        assert!(cli_analyze(&[]).unwrap().is_none());
    }

    #[test]
    fn test_missing_path_is_usage_error() {
        let err = cli_analyze(&args(&["--analyze", "--errors-only"])).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_unsafe_path_rejected() {
        let err = cli_analyze(&args(&["--analyze", "../x.42AHH"])).unwrap_err();
        assert!(err.to_string().contains("Refusing"));
    }
}
