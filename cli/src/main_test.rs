mod tests {
    use crate::report::{render_json, render_rules, render_text, FileReport};
    use crate::*;
    use tantrums_core::analyze;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("src/main.42AHH").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("src/main.42AHH"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("src/../main.42AHH").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_check_args() {
        let args = CliArgs::try_parse_from(["tantrums-lint", "check", "a.42AHH", "b.42AHH", "--format", "json", "--errors-only"])
            .expect("should parse");
        match args.command {
            Commands::Check {
                files,
                format,
                errors_only,
                config,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.42AHH"), PathBuf::from("b.42AHH")]);
                assert_eq!(format, OutputFormat::Json);
                assert!(errors_only);
                assert!(config.is_none());
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn test_check_requires_a_file() {
        assert!(CliArgs::try_parse_from(["tantrums-lint", "check"]).is_err());
    }

    #[test]
    fn test_text_report_lines() {
        let report = FileReport::new("main.42AHH", analyze("print(4 / 0);"), false);
        let text = render_text(&[report]);
        assert!(text.starts_with("main.42AHH:1:9: error[division-by-zero]:"), "{text}");
        assert!(text.ends_with("1 file(s) checked: 1 error(s), 0 warning(s)\n"), "{text}");
    }

    #[test]
    fn test_errors_only_drops_warnings() {
        let report = FileReport::new("main.42AHH", analyze("int x = 5;"), true);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_json_report_shape() {
        let report = FileReport::new("main.42AHH", analyze("print(4 / 0);"), false);
        let value: serde_json::Value = serde_json::from_str(&render_json(&[report]).unwrap()).unwrap();
        assert_eq!(value[0]["file"], "main.42AHH");
        assert_eq!(value[0]["diagnostics"][0]["rule"], "division-by-zero");
        assert_eq!(value[0]["diagnostics"][0]["severity"], "error");
        assert!(value[0].get("truncated").is_none());
    }

    #[test]
    fn test_rules_listing_covers_every_rule() {
        let listing = render_rules();
        assert_eq!(listing.lines().count(), tantrums_core::RuleId::ALL.len());
        assert!(listing.contains("static-missing-return-type"));
    }
}
