//! A lossless token-tree parser for Java-family source that tracks source
//! spans for every token and regenerates text from the (possibly mutated)
//! tree.
//!
//! # Tree shape
//!
//! Source is lexed into tokens that carry their leading trivia (whitespace
//! and comments). Balanced `()`, `[]` and `{}` delimiters form [`Group`]s,
//! so the tree is reparsable and every node keeps a stable [`Span`].
//!
//! - [`AstDocument::parse`] - Parse a file into a document
//! - [`AstDocument::walk_mut`] - Pre-order traversal handing out `&mut Group`
//! - [`AstDocument::print`] - Regenerate text, normalising trivia

pub mod document;
mod error;
mod lexer;
pub mod line_ending;
pub mod printer;
pub mod symbols;
pub mod tree;

pub use document::{AstDocument, Generation, WalkCtx};
pub use error::{Location, ParseError};
pub use line_ending::{LineEnding, LineEndingHint, UnknownLineEnding};
pub use printer::PrintMode;
pub use symbols::{LineIndex, SymbolTable};
pub use tree::{
    Delimiter, Group, GroupKind, Node, Spacing, Token, TokenKind, Trivia, TriviaPiece,
};

/// Byte span in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty/synthetic span (for nodes built by mutators)
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Check if this is a synthetic (non-parsed) span
    pub fn is_synthetic(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Parse source text into a fresh document (generation zero).
pub fn parse(source: &str) -> Result<AstDocument, ParseError> {
    AstDocument::parse(source)
}
