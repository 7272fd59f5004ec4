//! Whitespace-aware token source for the parser.
//!
//! `Source` wraps the folded token stream and answers the only trivia
//! question the grammar is allowed to ask: is there significant whitespace in
//! front of a token? Which trivia counts is decided by a [`WhitespacePolicy`]
//! passed with each query, never by productions poking at trivia themselves.

use crate::lexer::{SourceToken, TokenKind, Trivia};
use thiserror::Error;

/// Which leading trivia makes a token "preceded by significant whitespace".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WhitespacePolicy {
    /// A line break, in plain whitespace or inside a block comment.
    #[default]
    Newline,
    /// A line break or any comment.
    NewlineOrComment,
    /// Any trivia at all; used for adjacency checks such as labels.
    Any,
}

impl WhitespacePolicy {
    /// Applies the policy to a trivia classification.
    ///
    /// `newlines_enabled` is the state of the surrounding context; inside
    /// parentheses line breaks are never significant.
    #[must_use]
    pub fn is_significant(self, trivia: Trivia, newlines_enabled: bool) -> bool {
        match self {
            Self::Any => !trivia.is_empty(),
            Self::Newline => newlines_enabled && trivia.newline,
            Self::NewlineOrComment => newlines_enabled && (trivia.newline || trivia.comment),
        }
    }
}

/// `advance()` was called on the end-of-input sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected end of input")]
pub struct UnexpectedEndOfInput;

/// A token source that provides tokens to the parser.
pub struct Source<'t, 'src> {
    /// Folded tokens, always terminated by an `Eof` sentinel.
    tokens: &'t [SourceToken],
    source: &'src str,
    cursor: usize,
    /// Newline significance stack; the last entry is the active state.
    newlines: Vec<bool>,
}

impl<'t, 'src> Source<'t, 'src> {
    /// Creates a new source from folded tokens and source text.
    pub fn new(tokens: &'t [SourceToken], source: &'src str) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token stream must end with the Eof sentinel"
        );
        Self {
            tokens,
            source,
            cursor: 0,
            newlines: vec![true],
        }
    }

    /// Returns the current token kind, or `Eof` if at end.
    pub fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Peeks at the nth token ahead (0 = current).
    pub fn nth(&self, n: usize) -> TokenKind {
        self.nth_token(n).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Returns the nth token ahead, or `None` past the sentinel.
    pub fn nth_token(&self, n: usize) -> Option<&'t SourceToken> {
        self.tokens.get(self.cursor + n)
    }

    /// Returns the current token, or `None` once the sentinel was consumed.
    pub fn current_token(&self) -> Option<&'t SourceToken> {
        self.nth_token(0)
    }

    /// Returns the text of the nth token ahead.
    pub fn nth_text(&self, n: usize) -> &'src str {
        self.nth_token(n)
            .map_or("", |t| &self.source[usize::from(t.range.start())..usize::from(t.range.end())])
    }

    /// Returns the text of the current token.
    pub fn current_text(&self) -> &'src str {
        self.nth_text(0)
    }

    /// Returns `true` if at end of input.
    pub fn at_end(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    /// Consumes the current token and returns its index.
    pub fn advance(&mut self) -> Result<u32, UnexpectedEndOfInput> {
        if self.at_end() {
            return Err(UnexpectedEndOfInput);
        }
        let index = self.cursor as u32;
        self.cursor += 1;
        Ok(index)
    }

    /// Consumes the `Eof` sentinel itself. Only the entry dispatcher does this,
    /// to attach trailing trivia to the root.
    pub fn consume_end(&mut self) -> Option<u32> {
        if self.cursor + 1 != self.tokens.len() {
            return None;
        }
        let index = self.cursor as u32;
        self.cursor += 1;
        Some(index)
    }

    /// Returns the current position, for speculative parsing.
    pub fn position(&self) -> u32 {
        self.cursor as u32
    }

    /// Rewinds (or fast-forwards) to a position obtained from [`position`].
    ///
    /// [`position`]: Source::position
    pub fn reset(&mut self, position: u32) {
        self.cursor = (position as usize).min(self.tokens.len());
    }

    /// Returns `true` if the trivia before the current token is significant
    /// under `policy`.
    pub fn preceded_by_significant_whitespace(&self, policy: WhitespacePolicy) -> bool {
        self.nth_preceded_by(0, policy)
    }

    /// Same as [`preceded_by_significant_whitespace`] for the nth token ahead.
    ///
    /// [`preceded_by_significant_whitespace`]: Source::preceded_by_significant_whitespace
    pub fn nth_preceded_by(&self, n: usize, policy: WhitespacePolicy) -> bool {
        self.nth_token(n)
            .is_some_and(|t| policy.is_significant(t.trivia, self.newlines_enabled()))
    }

    /// Returns `true` if line breaks are significant in the current context.
    pub fn newlines_enabled(&self) -> bool {
        self.newlines.last().copied().unwrap_or(true)
    }

    /// Makes line breaks significant until the matching [`restore_newlines`].
    ///
    /// [`restore_newlines`]: Source::restore_newlines
    pub fn enable_newlines(&mut self) {
        self.newlines.push(true);
    }

    /// Makes line breaks insignificant until the matching [`restore_newlines`].
    ///
    /// [`restore_newlines`]: Source::restore_newlines
    pub fn disable_newlines(&mut self) {
        self.newlines.push(false);
    }

    /// Restores the newline state that was active before the last
    /// enable/disable call.
    pub fn restore_newlines(&mut self) {
        debug_assert!(self.newlines.len() > 1, "unbalanced restore_newlines");
        if self.newlines.len() > 1 {
            self.newlines.pop();
        }
    }

    /// Returns the depth of the newline stack, so speculation can restore it.
    pub fn newline_depth(&self) -> usize {
        self.newlines.len()
    }

    /// Truncates the newline stack back to `depth`.
    pub fn truncate_newlines(&mut self, depth: usize) {
        self.newlines.truncate(depth.max(1));
    }
}
