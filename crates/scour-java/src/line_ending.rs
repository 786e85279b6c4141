use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// How to pick the line terminator a file is split and rejoined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndingHint {
    Lf,
    Crlf,
    /// Whichever terminator occurs most often (LF on a tie)
    #[default]
    Auto,
    /// The first terminator in the file
    Preserve,
}

impl LineEndingHint {
    /// Resolve the hint against `text`.
    ///
    /// `Auto` and `Preserve` give `None` when `text` has no line terminator
    /// at all; explicit hints always resolve.
    pub fn resolve(self, text: &str) -> Option<LineEnding> {
        match self {
            LineEndingHint::Lf => Some(LineEnding::Lf),
            LineEndingHint::Crlf => Some(LineEnding::Crlf),
            LineEndingHint::Auto => {
                let total = text.matches('\n').count();
                if total == 0 {
                    return None;
                }
                let crlf = text.matches("\r\n").count();
                if crlf > total - crlf {
                    Some(LineEnding::Crlf)
                } else {
                    Some(LineEnding::Lf)
                }
            }
            LineEndingHint::Preserve => {
                let first = text.find('\n')?;
                if text[..first].ends_with('\r') {
                    Some(LineEnding::Crlf)
                } else {
                    Some(LineEnding::Lf)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown line ending '{0}' (expected lf, crlf, auto or preserve)")]
pub struct UnknownLineEnding(pub String);

impl FromStr for LineEndingHint {
    type Err = UnknownLineEnding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(LineEndingHint::Lf),
            "crlf" => Ok(LineEndingHint::Crlf),
            "auto" => Ok(LineEndingHint::Auto),
            "preserve" => Ok(LineEndingHint::Preserve),
            _ => Err(UnknownLineEnding(s.to_string())),
        }
    }
}

impl fmt::Display for LineEndingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineEndingHint::Lf => "lf",
            LineEndingHint::Crlf => "crlf",
            LineEndingHint::Auto => "auto",
            LineEndingHint::Preserve => "preserve",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_picks_dominant_terminator() {
        assert_eq!(LineEndingHint::Auto.resolve("a\r\nb\r\nc\n"), Some(LineEnding::Crlf));
        assert_eq!(LineEndingHint::Auto.resolve("a\r\nb\nc\n"), Some(LineEnding::Lf));
        // tie goes to LF
        assert_eq!(LineEndingHint::Auto.resolve("a\r\nb\n"), Some(LineEnding::Lf));
    }

    #[test]
    fn test_preserve_uses_first_terminator() {
        assert_eq!(LineEndingHint::Preserve.resolve("a\r\nb\nc\n"), Some(LineEnding::Crlf));
        assert_eq!(LineEndingHint::Preserve.resolve("a\nb\r\n"), Some(LineEnding::Lf));
    }

    #[test]
    fn test_terminator_free_text() {
        assert_eq!(LineEndingHint::Auto.resolve("class A {}"), None);
        assert_eq!(LineEndingHint::Preserve.resolve(""), None);
        assert_eq!(LineEndingHint::Lf.resolve(""), Some(LineEnding::Lf));
    }

    #[test]
    fn test_parse_and_display() {
        for hint in ["lf", "crlf", "auto", "preserve"] {
            assert_eq!(hint.parse::<LineEndingHint>().unwrap().to_string(), hint);
        }
        assert_eq!("CRLF".parse::<LineEndingHint>(), Ok(LineEndingHint::Crlf));
        assert!("cr".parse::<LineEndingHint>().is_err());
    }
}
