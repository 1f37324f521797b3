use super::*;

fn regions(line: &str) -> Vec<Region> {
    scan_line(line, LexState::default()).regions
}

#[test]
fn test_plain_code_is_code() {
    assert!(regions("x = 1;").iter().all(|r| *r == Region::Code));
}

#[test]
fn test_string_quotes_and_body() {
    let r = regions(r#"a "bc" d"#);
    assert_eq!(r[0], Region::Code);
    assert_eq!(r[2], Region::Quote);
    assert_eq!(r[3], Region::String);
    assert_eq!(r[4], Region::String);
    assert_eq!(r[5], Region::Quote);
    assert_eq!(r[7], Region::Code);
}

#[test]
fn test_escaped_quote_does_not_close_string() {
    let scan = scan_line(r#"s = "a\"b";"#, LexState::default());
    assert_eq!(scan.unterminated_string, None);
    // the escaped quote is part of the body
    assert_eq!(scan.regions[6], Region::String);
    assert_eq!(scan.regions[7], Region::String);
    assert_eq!(scan.regions[9], Region::Quote);
    assert_eq!(scan.regions[10], Region::Code);
}

#[test]
fn test_line_comment_runs_to_end_of_line() {
    let scan = scan_line(r#"x = 1; // "not a string"#, LexState::default());
    assert_eq!(scan.unterminated_string, None);
    assert!(scan.regions[7..].iter().all(|r| *r == Region::LineComment));
    assert!(!scan.carry.in_line_comment);
}

#[test]
fn test_comment_markers_inside_string_are_ignored() {
    let scan = scan_line(r#"url = "http://x/*y";"#, LexState::default());
    assert!(!scan.carry.in_block_comment);
    assert_eq!(scan.regions.last(), Some(&Region::Code));
}

#[test]
fn test_block_comment_carries_across_lines() {
    let scans = scan_lines(["a /* start", "still \"inside", "end */ b"]);
    assert!(scans[0].carry.in_block_comment);
    assert!(scans[1].regions.iter().all(|r| *r == Region::BlockComment));
    assert_eq!(scans[1].unterminated_string, None);
    assert!(!scans[2].carry.in_block_comment);
    assert_eq!(scans[2].regions.last(), Some(&Region::Code));
}

#[test]
fn test_unterminated_string_is_closed_at_end_of_line() {
    let scans = scan_lines([r#"x = "abc"#, "y = 2;"]);
    assert_eq!(scans[0].unterminated_string, Some(4));
    assert!(!scans[0].carry.in_string);
    assert!(scans[1].regions.iter().all(|r| *r == Region::Code));
}

#[test]
fn test_strip_keeps_columns() {
    let line = r#"s = "a, b"; // note"#;
    let scan = scan_line(line, LexState::default());
    let stripped = strip_line(line, &scan);
    assert_eq!(stripped.chars().count(), line.chars().count());
    assert_eq!(stripped.trim_end(), r#"s = "    ";"#);
}

#[test]
fn test_strip_multibyte_string_body() {
    let line = "s = \"héllo\";";
    let stripped = strip_line(line, &scan_line(line, LexState::default()));
    assert_eq!(stripped, "s = \"     \";");
}
