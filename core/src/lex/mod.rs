//! Line-oriented lexical tracking.
//!
//! Everything that needs to know whether a character sits inside a string
//! literal or a comment goes through [`scan_line`]: a line plus the incoming
//! carry state in, per-character [`Region`]s plus the outgoing carry state
//! out. The rules never look at quotes or comment markers themselves, so a
//! real tokenizer can replace this module without touching them.

mod state;
mod strip;

#[cfg(test)]
mod lex_test;

pub use state::{scan_line, scan_lines, LexState, LineScan, Region};
pub use strip::strip_line;
