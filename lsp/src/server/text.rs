use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// Rope char index for an LSP position (UTF-16 columns). Columns past the
/// end of a line clamp to it; lines past the end map to the end of text.
pub(crate) fn char_index(text: &Rope, pos: Position) -> usize {
    let row = pos.line as usize;
    if row >= text.len_lines() {
        return text.len_chars();
    }
    let line_start = text.line_to_char(row);
    let line = text.line(row);
    let target = pos.character as usize;

    if let Some(s) = line.as_str().filter(|s| s.is_ascii()) {
        return line_start + target.min(s.trim_end_matches(['\n', '\r']).len());
    }

    let mut units = 0usize;
    let mut offset = 0usize;
    for ch in line.chars().take_while(|c| !matches!(c, '\n' | '\r')) {
        let width = ch.len_utf16();
        if units + width > target {
            break;
        }
        units += width;
        offset += 1;
    }
    line_start + offset
}

/// Apply one content change; a change without a range replaces everything.
pub(crate) fn apply_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = &change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let a = char_index(text, range.start);
    let b = char_index(text, range.end);
    let (start, end) = (a.min(b), a.max(b));
    if start < end {
        text.remove(start..end);
    }
    if !change.text.is_empty() {
        text.insert(start, &change.text);
    }
}
