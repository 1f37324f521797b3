use super::state::{LineScan, Region};

/// Blank out string bodies and comments while keeping every column in place.
///
/// Quotes survive so callers can still tell that a literal was present; every
/// other non-code character becomes a single space.
pub fn strip_line(line: &str, scan: &LineScan) -> String {
    line.chars()
        .enumerate()
        .map(|(col, c)| match scan.region(col) {
            Some(Region::Code) | None => c,
            Some(Region::Quote) => '"',
            Some(_) => ' ',
        })
        .collect()
}

