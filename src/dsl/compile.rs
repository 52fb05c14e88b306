//! Rule compiler: turns rule text into [`Command`]s.
//!
//! Each line is lexed, parsed and lowered in order. The first bad line
//! aborts compilation and is reported with its index and text.

use std::num::NonZeroU64;

use crate::event::command::{Command, PlayMode};

use super::ast::*;
use super::error::{ErrorKind, LineError, SyntaxError};
use super::lexer::Lexer;
use super::parser::Parser;

/// Lower one parsed rule into a command.
pub fn compile_rule(rule: &RuleDef) -> Result<Command, LineError> {
    match rule.kind {
        // Play mode has no effect on a single firing.
        CommandKind::At => Ok(Command::at(rule.timestamp_ms, rule.notes.clone())),
        CommandKind::Every => {
            let period = NonZeroU64::new(rule.timestamp_ms).ok_or_else(|| {
                LineError::new(
                    ErrorKind::Timestamp,
                    "the period of an 'every' rule must be greater than zero",
                    rule.timestamp_col,
                )
            })?;
            let play_mode = match rule.play_mode {
                Some(PlayModeDef::Scale) => PlayMode::Scale,
                Some(PlayModeDef::Arpeggio) => PlayMode::Arpeggio,
                Some(PlayModeDef::Repeat { count }) => PlayMode::Repeat {
                    max: count.unwrap_or(1),
                },
                None => PlayMode::Repeat { max: 1 },
            };
            Ok(Command::every(period, rule.notes.clone(), play_mode))
        }
    }
}

/// Lex, parse and lower a single line.
pub fn compile_line(line: &str) -> Result<Command, LineError> {
    let tokens = Lexer::new(line).tokenize()?;
    let rule = Parser::new(tokens).parse_rule()?;
    compile_rule(&rule)
}

/// Split rule text into lines. Line terminators at the very end of the
/// text are dropped and a trailing `\r` is stripped from each line; any
/// other empty line is kept so it can be rejected.
pub fn split_lines(text: &str) -> Vec<&str> {
    let body = text.trim_end_matches(['\n', '\r']);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Compile a whole rule text, one rule per line.
pub fn compile_rules(text: &str) -> Result<Vec<Command>, SyntaxError> {
    let mut commands = Vec::new();

    for (index, line) in split_lines(text).into_iter().enumerate() {
        let command = compile_line(line).map_err(|e| e.at_line(index, line))?;
        tracing::debug!(
            line = index,
            kind = ?command.kind(),
            timestamp_ms = command.timestamp_ms(),
            notes = command.notes().len(),
            "compiled rule"
        );
        commands.push(command);
    }

    Ok(commands)
}
