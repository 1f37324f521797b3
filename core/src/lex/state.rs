/// Scanner state carried from one character to the next.
///
/// At most one flag is set at any time. Only `in_block_comment` survives a
/// line break: line comments end with their line, and an unterminated string
/// is closed at end of line so it cannot corrupt the lines that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexState {
    pub in_string: bool,
    pub in_block_comment: bool,
    pub in_line_comment: bool,
}

impl LexState {
    /// State handed to the next line.
    pub fn carry(self) -> Self {
        Self {
            in_string: false,
            in_block_comment: self.in_block_comment,
            in_line_comment: false,
        }
    }
}

/// What governs a single character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    /// An opening or closing `"` of a string literal.
    Quote,
    /// String body, escape pairs included.
    String,
    LineComment,
    BlockComment,
}

impl Region {
    pub fn is_string(self) -> bool {
        matches!(self, Region::Quote | Region::String)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Region::LineComment | Region::BlockComment)
    }
}

/// Classification of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    /// One entry per `char` of the line.
    pub regions: Vec<Region>,
    /// State to feed into the next line.
    pub carry: LexState,
    /// Column of the opening quote when a string is still open at end of line.
    pub unterminated_string: Option<usize>,
}

impl LineScan {
    pub fn region(&self, col: usize) -> Option<Region> {
        self.regions.get(col).copied()
    }
}

/// Classify every character of `line`, starting from `incoming`.
pub fn scan_line(line: &str, incoming: LexState) -> LineScan {
    let chars: Vec<char> = line.chars().collect();
    let mut regions = Vec::with_capacity(chars.len());
    let mut state = LexState {
        in_line_comment: false,
        ..incoming
    };
    let mut string_start = state.in_string.then_some(0);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if state.in_block_comment {
            if c == '*' && next == Some('/') {
                regions.extend([Region::BlockComment; 2]);
                state.in_block_comment = false;
                i += 2;
            } else {
                regions.push(Region::BlockComment);
                i += 1;
            }
            continue;
        }

        if state.in_line_comment {
            regions.push(Region::LineComment);
            i += 1;
            continue;
        }

        if state.in_string {
            match c {
                // escape pair: never opens or closes anything
                '\\' => {
                    regions.push(Region::String);
                    if next.is_some() {
                        regions.push(Region::String);
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                '"' => {
                    regions.push(Region::Quote);
                    state.in_string = false;
                    string_start = None;
                    i += 1;
                }
                _ => {
                    regions.push(Region::String);
                    i += 1;
                }
            }
            continue;
        }

        match (c, next) {
            ('/', Some('*')) => {
                regions.extend([Region::BlockComment; 2]);
                state.in_block_comment = true;
                i += 2;
            }
            ('/', Some('/')) => {
                regions.extend([Region::LineComment; 2]);
                state.in_line_comment = true;
                i += 2;
            }
            ('"', _) => {
                regions.push(Region::Quote);
                state.in_string = true;
                string_start = Some(i);
                i += 1;
            }
            _ => {
                regions.push(Region::Code);
                i += 1;
            }
        }
    }

    LineScan {
        regions,
        carry: state.carry(),
        unterminated_string: if state.in_string { string_start } else { None },
    }
}

/// Scan consecutive lines, threading the carry state through them.
pub fn scan_lines<'a, I>(lines: I) -> Vec<LineScan>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut carry = LexState::default();
    lines
        .into_iter()
        .map(|line| {
            let scan = scan_line(line, carry);
            carry = scan.carry;
            scan
        })
        .collect()
}
