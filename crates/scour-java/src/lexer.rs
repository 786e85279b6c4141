//! Lexer and token-tree builder.

use crate::Span;
use crate::error::{Location, ParseError};
use crate::tree::{Delimiter, Group, Node, Spacing, Token, TokenKind, Trivia, TriviaPiece};

const PUNCT_CHARS: &str = "+-*/%=<>!~?:;,.&|^@";

/// Kept as leading trivia of the first token when it opens the file
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Multi-character operators, longest first. `>` never starts one so that
/// nested generic argument lists close one bracket at a time.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", "<<", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    Leaf(TokenKind),
    Open(Delimiter),
    Close(Delimiter),
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct RawToken {
    pub kind: RawKind,
    pub text: String,
    pub leading: Trivia,
    pub span: Span,
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    /// Lex the next token along with the trivia in front of it
    pub fn next_token(&mut self) -> Result<RawToken, ParseError> {
        let leading = self.trivia()?;
        let start = self.pos;

        let Some(ch) = self.peek_char() else {
            return Ok(RawToken {
                kind: RawKind::Eof,
                text: String::new(),
                leading,
                span: Span::new(start, start),
            });
        };

        let kind = match ch {
            '(' => self.single(RawKind::Open(Delimiter::Parenthesis)),
            '[' => self.single(RawKind::Open(Delimiter::Bracket)),
            '{' => self.single(RawKind::Open(Delimiter::Brace)),
            ')' => self.single(RawKind::Close(Delimiter::Parenthesis)),
            ']' => self.single(RawKind::Close(Delimiter::Bracket)),
            '}' => self.single(RawKind::Close(Delimiter::Brace)),
            '"' if self.rest().starts_with("\"\"\"") => {
                self.text_block()?;
                RawKind::Leaf(TokenKind::TextBlock)
            }
            '"' => {
                self.quoted('"', ParseError::UnterminatedString)?;
                RawKind::Leaf(TokenKind::Str)
            }
            '\'' => {
                self.quoted('\'', ParseError::UnterminatedChar)?;
                RawKind::Leaf(TokenKind::Char)
            }
            c if c.is_ascii_digit() => {
                self.number();
                RawKind::Leaf(TokenKind::Number)
            }
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number();
                RawKind::Leaf(TokenKind::Number)
            }
            c if is_ident_start(c) => {
                while self.peek_char().is_some_and(is_ident_continue) {
                    self.advance();
                }
                RawKind::Leaf(TokenKind::Ident)
            }
            c if PUNCT_CHARS.contains(c) => {
                let op_len = if c == '>' {
                    1
                } else {
                    OPERATORS
                        .iter()
                        .find(|op| self.rest().starts_with(**op))
                        .map(|op| op.len())
                        .unwrap_or(1)
                };
                self.pos += op_len;
                RawKind::Leaf(TokenKind::Punct(self.spacing()))
            }
            c => {
                return Err(ParseError::UnexpectedChar {
                    ch: c,
                    at: Location::of(self.input, start),
                });
            }
        };

        Ok(RawToken {
            kind,
            text: self.input[start..self.pos].to_string(),
            leading,
            span: Span::new(start, self.pos),
        })
    }

    fn trivia(&mut self) -> Result<Trivia, ParseError> {
        let mut trivia = Trivia::none();
        loop {
            let start = self.pos;
            let rest = self.rest();
            if rest.starts_with("//") {
                let mut end = rest.find('\n').unwrap_or(rest.len());
                if rest[..end].ends_with('\r') {
                    end -= 1;
                }
                self.pos += end;
                trivia
                    .pieces
                    .push(TriviaPiece::LineComment(self.input[start..self.pos].to_string()));
            } else if rest.starts_with("/*") {
                let Some(end) = rest[2..].find("*/") else {
                    return Err(ParseError::UnterminatedComment(Location::of(
                        self.input, start,
                    )));
                };
                self.pos += end + 4;
                trivia
                    .pieces
                    .push(TriviaPiece::BlockComment(self.input[start..self.pos].to_string()));
            } else if start == 0 && rest.starts_with(BYTE_ORDER_MARK) {
                self.advance();
                trivia
                    .pieces
                    .push(TriviaPiece::Whitespace(BYTE_ORDER_MARK.to_string()));
            } else if self.peek_char().is_some_and(char::is_whitespace) {
                while self.peek_char().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                trivia
                    .pieces
                    .push(TriviaPiece::Whitespace(self.input[start..self.pos].to_string()));
            } else {
                return Ok(trivia);
            }
        }
    }

    fn quoted(&mut self, quote: char, err: fn(Location) -> ParseError) -> Result<(), ParseError> {
        let start = self.pos;
        self.advance();
        loop {
            match self.peek_char() {
                None | Some('\n') => return Err(err(Location::of(self.input, start))),
                Some('\\') => {
                    self.advance();
                    if self.peek_char().is_none() {
                        return Err(err(Location::of(self.input, start)));
                    }
                    self.advance();
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn text_block(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 3;
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(ParseError::UnterminatedTextBlock(Location::of(
                    self.input, start,
                )));
            }
            if rest.starts_with("\"\"\"") {
                self.pos += 3;
                return Ok(());
            }
            if rest.starts_with('\\') {
                self.advance();
            }
            self.advance();
        }
    }

    fn number(&mut self) {
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") || rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return;
        }

        self.digits();
        if self.peek_char() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.digits();
            }
        }
        // Type suffix (`L`, `f`, `d`, ...)
        while self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
    }

    fn digits(&mut self) {
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_digit() || c == '_')
        {
            self.advance();
        }
    }

    /// Punctuation directly followed by more punctuation (not a comment) is joint.
    fn spacing(&self) -> Spacing {
        let rest = self.rest();
        let next_is_punct = rest.chars().next().is_some_and(|c| PUNCT_CHARS.contains(c));
        if next_is_punct && !rest.starts_with("//") && !rest.starts_with("/*") {
            Spacing::Joint
        } else {
            Spacing::Alone
        }
    }

    fn single(&mut self, kind: RawKind) -> RawKind {
        self.advance();
        kind
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Lex `source` and fold balanced delimiters into groups.
pub(crate) fn build_tree(source: &str) -> Result<Group, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut parents: Vec<Group> = Vec::new();
    let mut current = Group::new(Delimiter::None, Vec::new());
    let mut count = 0usize;

    loop {
        let raw = lexer.next_token()?;
        count += 1;
        if count % 10000 == 0 {
            log::trace!("Lexed {count} tokens, at offset {}", raw.span.start);
        }

        match raw.kind {
            RawKind::Leaf(kind) => current.children.push(Node::Token(Token {
                kind,
                text: raw.text,
                leading: raw.leading,
                span: raw.span,
            })),
            RawKind::Open(delimiter) => {
                let mut group = Group::new(delimiter, Vec::new());
                group.open = raw.leading;
                group.span = Span::new(raw.span.start, raw.span.end);
                parents.push(std::mem::replace(&mut current, group));
            }
            RawKind::Close(delimiter) => {
                let found = delimiter.close_char().unwrap_or_default();
                let at = Location::of(source, raw.span.start);
                let Some(parent) = parents.pop() else {
                    return Err(ParseError::UnexpectedCloseDelimiter { found, at });
                };
                if current.delimiter != delimiter {
                    return Err(ParseError::MismatchedDelimiter {
                        open: current.delimiter.open_char().unwrap_or_default(),
                        opened: Location::of(source, current.span.start),
                        found,
                        at,
                    });
                }
                let mut done = std::mem::replace(&mut current, parent);
                done.close = raw.leading;
                done.span.end = raw.span.end;
                current.children.push(Node::Group(done));
            }
            RawKind::Eof => {
                if !parents.is_empty() {
                    return Err(ParseError::UnclosedDelimiter {
                        open: current.delimiter.open_char().unwrap_or_default(),
                        at: Location::of(source, current.span.start),
                    });
                }
                current.close = raw.leading;
                current.span = Span::new(0, source.len());
                log::trace!("Built token tree from {count} tokens");
                return Ok(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<(RawKind, String)> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            if tok.kind == RawKind::Eof {
                return out;
            }
            out.push((tok.kind, tok.text));
        }
    }

    fn texts(src: &str) -> Vec<String> {
        lex(src).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_operators_and_generics() {
        assert_eq!(
            texts("a==b&&c!=d->e::f"),
            ["a", "==", "b", "&&", "c", "!=", "d", "->", "e", "::", "f"]
        );
        assert_eq!(
            texts("Map<K,List<V>> m"),
            ["Map", "<", "K", ",", "List", "<", "V", ">", ">", "m"]
        );
        let kinds: Vec<_> = lex("a >= b").into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds[1], RawKind::Leaf(TokenKind::Punct(Spacing::Joint)));
        assert_eq!(kinds[2], RawKind::Leaf(TokenKind::Punct(Spacing::Alone)));
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            texts(r#"0x1F 1_000L 3.14f 1e-9 .5 "a\"b" 'c' '\''"#),
            ["0x1F", "1_000L", "3.14f", "1e-9", ".5", r#""a\"b""#, "'c'", r"'\''"]
        );
        assert_eq!(texts("\"\"\"\n  hi \"\"\" x"), ["\"\"\"\n  hi \"\"\"", "x"]);
        assert_eq!(texts("x.y"), ["x", ".", "y"]);
    }

    #[test]
    fn test_trivia_attaches_to_following_token() {
        let mut lexer = Lexer::new("a /* b */ // c\r\n  d");
        lexer.next_token().unwrap();
        let d = lexer.next_token().unwrap();
        assert_eq!(d.text, "d");
        assert_eq!(
            d.leading.pieces,
            vec![
                TriviaPiece::Whitespace(" ".into()),
                TriviaPiece::BlockComment("/* b */".into()),
                TriviaPiece::Whitespace(" ".into()),
                TriviaPiece::LineComment("// c".into()),
                TriviaPiece::Whitespace("\r\n  ".into()),
            ]
        );
    }

    #[test]
    fn test_byte_order_mark_is_trivia() {
        let mut lexer = Lexer::new("\u{feff}class A");
        let class = lexer.next_token().unwrap();
        assert_eq!(class.text, "class");
        assert_eq!(class.span, Span::new(3, 8));
        assert_eq!(class.leading.text(), "\u{feff}");
        assert_eq!(texts("\u{feff}\n  a b"), ["a", "b"]);

        // Only at the start of the file
        let mut lexer = Lexer::new("a \u{feff}");
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(ParseError::UnexpectedChar { ch: '\u{feff}', .. })
        ));
    }

    #[test]
    fn test_lex_errors() {
        let err = |src: &str| {
            let mut lexer = Lexer::new(src);
            loop {
                match lexer.next_token() {
                    Ok(t) if t.kind == RawKind::Eof => panic!("expected error for {src:?}"),
                    Ok(_) => continue,
                    Err(e) => return e,
                }
            }
        };
        assert!(matches!(err("x = \"abc"), ParseError::UnterminatedString(_)));
        assert!(matches!(err("'a"), ParseError::UnterminatedChar(_)));
        assert!(matches!(err("\"\"\" abc"), ParseError::UnterminatedTextBlock(_)));
        assert!(matches!(err("/* abc"), ParseError::UnterminatedComment(_)));
        assert!(matches!(err("a # b"), ParseError::UnexpectedChar { ch: '#', .. }));
    }

    #[test]
    fn test_build_tree_errors() {
        assert!(matches!(
            build_tree("class A { void f() {}"),
            Err(ParseError::UnclosedDelimiter { open: '{', .. })
        ));
        assert!(matches!(
            build_tree("f(]"),
            Err(ParseError::MismatchedDelimiter { open: '(', found: ']', .. })
        ));
        let err = build_tree("a)\n").unwrap_err();
        assert_eq!(err.to_string(), "unexpected ')' at 1:2");
    }

    #[test]
    fn test_build_tree_groups() {
        let root = build_tree("f(a[0], {1}) // end\n").unwrap();
        assert_eq!(root.children.len(), 2);
        let args = root.children[1].as_group().unwrap();
        assert_eq!(args.delimiter, Delimiter::Parenthesis);
        assert_eq!(args.span, Span::new(1, 12));
        assert_eq!(root.close.text(), " // end\n");
    }
}
