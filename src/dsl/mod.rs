//! Rule language: text rules → Commands.
//!
//! ```text
//! every 5s play C,E,G arpeggio
//! at 1m:30s play C
//! ```

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod token;
pub mod units;

pub use ast::*;
pub use error::{ErrorKind, SyntaxError};
pub use note::Note;

use crate::event::command::Command;

/// User-facing reference for the rule syntax.
pub const SYNTAX_HELP: &str = "\
Rule syntax (one rule per line):

  <at|every> <timestamp> play <notes> [<mode>]

- at: play once, at the given time
- every: play again each time the given period elapses

- timestamp: segments joined by ':' such as 1h:30m or 5s:5ds
   * units: h (hours), m (minutes), s (seconds), ds (deciseconds)
   * each unit at most once, in any order

- notes: comma-separated list such as C,E,G or F#,Bb
   * letters A to G, optionally followed by # or b

- mode (every only, has no effect on at):
   * repeat [n] (default): the whole chord, stacked one more time
     on each firing, up to n times (default 1)
   * scale: one note per firing, walking the list
   * arpeggio: one more note of the list on each firing

examples:

- every 5s play C,E,G arpeggio
   * (C then CE then CEG then C...)
- every 1m play C repeat 3
   * (C then CC then CCC then C...)
- every 1h play C,E,G repeat 2
   * (CEG then CEGCEG then CEG...)
- at 1m:30s play C
   * (plays C once)
";

/// The rule compiler.
///
/// Lexes, parses and lowers rule text line by line.
pub struct Compiler;

impl Compiler {
    /// Compile rule text into commands, in line order.
    pub fn compile(text: &str) -> Result<Vec<Command>, SyntaxError> {
        compile::compile_rules(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_examples_compile() {
        let examples: Vec<&str> = SYNTAX_HELP
            .lines()
            .filter_map(|l| l.strip_prefix("- "))
            .filter(|l| l.starts_with("at ") || l.starts_with("every "))
            .collect();
        assert_eq!(examples.len(), 4);
        for rule in examples {
            assert!(Compiler::compile(rule).is_ok(), "{rule}");
        }
    }
}
