//! Lexer for the kelp surface language.
//!
//! This module tokenizes source code into a flat stream of tokens (trivia
//! included) and folds that stream into [`SourceToken`]s: one entry per
//! significant token, each owning the whitespace and comments in front of
//! it. The folded stream always ends with an `Eof` sentinel that carries the
//! trailing trivia of the input.

mod tokens;

pub use tokens::TokenKind;

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A raw token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Lexer for kelp source code.
///
/// The lexer is an iterator over raw tokens. It handles all error recovery
/// internally - any unrecognized characters are returned as `TokenKind::Error`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the text of the current token.
    #[must_use]
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(Token::new(kind, range))
    }
}

/// Lex the entire source and return all raw tokens, trivia included.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return raw tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| {
            let text = &source[usize::from(token.range.start())..usize::from(token.range.end())];
            (token, text)
        })
        .collect()
}

/// What the trivia in front of a token contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Trivia {
    /// Any whitespace at all.
    pub whitespace: bool,
    /// A line break, either in whitespace or inside a comment.
    pub newline: bool,
    /// A line or block comment.
    pub comment: bool,
}

impl Trivia {
    /// Returns `true` if the token is directly adjacent to its predecessor.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.whitespace && !self.comment
    }

    fn absorb(&mut self, kind: TokenKind, text: &str) {
        if kind.is_comment() {
            self.comment = true;
        } else {
            self.whitespace = true;
        }
        if text.contains(['\n', '\r']) {
            self.newline = true;
        }
    }
}

/// A significant token with its leading trivia folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceToken {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token text itself.
    pub range: TextRange,
    /// The byte range of the leading trivia plus the token text.
    pub full_range: TextRange,
    /// Classification of the leading trivia.
    pub trivia: Trivia,
}

impl SourceToken {
    /// Returns the byte range of the leading trivia (possibly empty).
    #[must_use]
    pub fn trivia_range(&self) -> TextRange {
        TextRange::new(self.full_range.start(), self.range.start())
    }
}

/// Folds a raw token stream into significant tokens and appends the `Eof`
/// sentinel. Raw `Eof` tokens in the input are ignored.
#[must_use]
pub fn fold_trivia(source: &str, tokens: impl IntoIterator<Item = Token>) -> Vec<SourceToken> {
    let mut folded = Vec::new();
    let mut trivia = Trivia::default();
    let mut trivia_start: Option<TextSize> = None;

    for token in tokens {
        if token.kind == TokenKind::Eof {
            continue;
        }
        if token.kind.is_trivia() {
            let text = &source[usize::from(token.range.start())..usize::from(token.range.end())];
            trivia.absorb(token.kind, text);
            trivia_start.get_or_insert(token.range.start());
            continue;
        }

        let start = trivia_start.take().unwrap_or(token.range.start());
        folded.push(SourceToken {
            kind: token.kind,
            range: token.range,
            full_range: TextRange::new(start, token.range.end()),
            trivia: std::mem::take(&mut trivia),
        });
    }

    let end = TextSize::of(source);
    folded.push(SourceToken {
        kind: TokenKind::Eof,
        range: TextRange::empty(end),
        full_range: TextRange::new(trivia_start.unwrap_or(end), end),
        trivia,
    });
    folded
}

/// Lex and fold `source` in one step.
#[must_use]
pub fn tokenize(source: &str) -> Vec<SourceToken> {
    fold_trivia(source, Lexer::new(source))
}
