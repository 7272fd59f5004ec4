//! Parser for the kelp surface language.
//!
//! This module provides a hand-written recursive descent parser that records
//! a flat event log instead of allocating tree nodes. The log is frozen into a
//! [`TreeHandle`](crate::tree::TreeHandle) whose nodes are materialized lazily.
//!
//! # Architecture
//!
//! The parser uses a three-phase approach:
//!
//! 1. **Lexing**: Tokenize source text and fold trivia into the following
//!    token (see `lexer` module)
//! 2. **Parsing**: Build a flat stream of events (start node, add token,
//!    error, finish node) through markers
//! 3. **Freezing**: Resolve forward parents and index node spans so children
//!    can be computed on demand
//!
//! Whitespace is never visible to grammar rules directly; they ask the
//! [`Source`] whether the current token is preceded by significant
//! whitespace under a [`WhitespacePolicy`].

#![allow(clippy::module_inception)]

pub mod event;
mod grammar;
mod parser;
pub(crate) mod sink;
mod source;

pub use event::{BuilderError, MarkerStats};
pub use parser::{parse_file, parse_file_with, parse_script, parse_script_with, parse_tokens};
pub(crate) use parser::{CompletedMarker, Marker, Parser};
pub use source::{Source, UnexpectedEndOfInput, WhitespacePolicy};

use crate::syntax::SyntaxKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which top-level production a parse starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// A full source file: header followed by declarations.
    #[default]
    File,
    /// A script fragment: header followed by statements.
    Script,
}

impl EntryPoint {
    /// Kind of the root node produced for this entry point.
    #[must_use]
    pub fn root_kind(self) -> SyntaxKind {
        match self {
            Self::File => SyntaxKind::SourceFile,
            Self::Script => SyntaxKind::Script,
        }
    }
}

/// Cooperative cancellation flag shared between a parse and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Parses holding a clone stop at the next
    /// top-level item.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for a single parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Trivia that separates statements and blocks whitespace-sensitive
    /// constructs (calls, indexing, postfix operators).
    pub separator_policy: WhitespacePolicy,
    /// Polled once per top-level declaration or statement.
    pub cancellation: Option<CancellationToken>,
}

impl ParseOptions {
    /// Sets the separator policy.
    #[must_use]
    pub fn with_separator_policy(mut self, policy: WhitespacePolicy) -> Self {
        self.separator_policy = policy;
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// A parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The byte range where the error occurred.
    pub range: text_size::TextRange,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError {
            message: "expecting ')'".to_string(),
            range: text_size::TextRange::new(3.into(), 7.into()),
        };
        assert_eq!(error.to_string(), "expecting ')' at 3..7");
    }

    #[test]
    fn test_entry_point_roots() {
        assert_eq!(EntryPoint::File.root_kind(), SyntaxKind::SourceFile);
        assert_eq!(EntryPoint::Script.root_kind(), SyntaxKind::Script);
    }
}
