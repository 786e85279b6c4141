use std::fmt;

use thiserror::Error;

/// A resolved source position. Lines and columns are 1-based; the column
/// counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolve a byte offset against `source`.
    pub fn of(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..floor_char_boundary(source, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Errors that can occur while lexing or building the token tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated string literal at {0}")]
    UnterminatedString(Location),

    #[error("unterminated character literal at {0}")]
    UnterminatedChar(Location),

    #[error("unterminated text block at {0}")]
    UnterminatedTextBlock(Location),

    #[error("unterminated block comment at {0}")]
    UnterminatedComment(Location),

    #[error("unexpected character '{ch}' at {at}")]
    UnexpectedChar { ch: char, at: Location },

    #[error("unclosed '{open}' opened at {at}")]
    UnclosedDelimiter { open: char, at: Location },

    #[error("unexpected '{found}' at {at}")]
    UnexpectedCloseDelimiter { found: char, at: Location },

    #[error("'{open}' opened at {opened} closed by '{found}' at {at}")]
    MismatchedDelimiter {
        open: char,
        opened: Location,
        found: char,
        at: Location,
    },
}

impl ParseError {
    /// Where the error was detected.
    pub fn location(&self) -> Location {
        match self {
            ParseError::UnterminatedString(at)
            | ParseError::UnterminatedChar(at)
            | ParseError::UnterminatedTextBlock(at)
            | ParseError::UnterminatedComment(at) => *at,
            ParseError::UnexpectedChar { at, .. }
            | ParseError::UnclosedDelimiter { at, .. }
            | ParseError::UnexpectedCloseDelimiter { at, .. }
            | ParseError::MismatchedDelimiter { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_counts_lines_and_chars() {
        let src = "ab\ncdé\nf";
        assert_eq!(Location::of(src, 0).to_string(), "1:1");
        assert_eq!(Location::of(src, 3).to_string(), "2:1");
        // 'é' is two bytes but one column
        assert_eq!(Location::of(src, 7).to_string(), "2:4");
        assert_eq!(Location::of(src, 9).line, 3);
    }
}
