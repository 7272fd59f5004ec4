//! Lazily materialized light syntax tree.
//!
//! A [`TreeHandle`] owns the frozen event log of one parse. Nodes and tokens
//! are plain indices into that log; children are recomputed on every call by
//! scanning a node's span and skipping nested spans as a unit. Nothing is
//! cached, so memory stays proportional to the log.
//!
//! # Example
//!
//! ```
//! use kelp_syntax::{parse_file, LightElement, SyntaxKind};
//!
//! let tree = parse_file("val answer = 42");
//! let root = tree.root();
//! let property = tree
//!     .children(root)
//!     .find_map(LightElement::into_node)
//!     .unwrap();
//! assert_eq!(tree.kind(property), SyntaxKind::Property);
//! assert_eq!(tree.text(property), "val answer = 42");
//! ```

mod green;

use crate::lexer::{SourceToken, Trivia};
use crate::parser::sink::FrozenTree;
use crate::parser::{MarkerStats, ParseError};
use crate::syntax::SyntaxKind;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use text_size::{TextRange, TextSize};

/// A frozen event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeEvent {
    Start {
        kind: SyntaxKind,
        /// Number of events in the span, `Start` and `Finish` included.
        len: u32,
        /// Index of the first token consumed inside the span.
        first_token: u32,
        /// One past the last token consumed inside the span.
        token_end: u32,
    },
    Token {
        kind: SyntaxKind,
        token: u32,
    },
    Finish,
}

/// Identity of an interior node: the index of its start event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef(u32);

/// Identity of a token leaf: the index of its token event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenRef(u32);

/// A child of a light node.
pub type LightElement = rowan::NodeOrToken<NodeRef, TokenRef>;

/// The result of a parse: an immutable view over the frozen event log.
#[derive(Debug, Clone)]
pub struct TreeHandle {
    text: Box<str>,
    tokens: Vec<SourceToken>,
    events: Vec<TreeEvent>,
    messages: Vec<Box<str>>,
    node_errors: FxHashMap<u32, u32>,
    stats: MarkerStats,
}

impl TreeHandle {
    pub(crate) fn new(text: &str, tokens: Vec<SourceToken>, frozen: FrozenTree) -> Self {
        Self {
            text: text.into(),
            tokens,
            events: frozen.events,
            messages: frozen.messages,
            node_errors: frozen.node_errors,
            stats: frozen.stats,
        }
    }

    /// Returns the root node (`SourceFile` or `Script`).
    #[must_use]
    pub fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Returns the parsed text.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Returns the folded token stream, `Eof` sentinel included.
    #[must_use]
    pub fn source_tokens(&self) -> &[SourceToken] {
        &self.tokens
    }

    /// Returns marker counters recorded while parsing.
    #[must_use]
    pub fn marker_stats(&self) -> MarkerStats {
        self.stats
    }

    /// Returns the number of frozen events backing the tree.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, node: NodeRef) -> SyntaxKind {
        self.span(node).kind
    }

    /// Returns the direct children of a node, in source order.
    ///
    /// The sequence is recomputed on every call.
    #[must_use]
    pub fn children(&self, node: NodeRef) -> Children<'_> {
        let start = node.0 as usize;
        let span = self.span(node);
        Children {
            events: &self.events,
            cursor: start + 1,
            end: start + span.len as usize - 1,
        }
    }

    /// Returns the direct child nodes of a node.
    pub fn child_nodes(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        self.children(node).filter_map(LightElement::into_node)
    }

    /// Returns all nodes and tokens below `node` in preorder, `node` excluded.
    pub fn descendants(&self, node: NodeRef) -> impl Iterator<Item = LightElement> + '_ {
        let start = node.0 as usize;
        let end = start + self.span(node).len as usize - 1;
        (start + 1..end).filter_map(move |idx| match self.events[idx] {
            TreeEvent::Start { .. } => Some(LightElement::Node(NodeRef(idx as u32))),
            TreeEvent::Token { .. } => Some(LightElement::Token(TokenRef(idx as u32))),
            TreeEvent::Finish => None,
        })
    }

    /// Returns all token leaves of a node, in source order.
    pub fn tokens(&self, node: NodeRef) -> impl Iterator<Item = TokenRef> + '_ {
        self.descendants(node).filter_map(LightElement::into_token)
    }

    /// Returns the first token leaf of a node, if it consumed any.
    #[must_use]
    pub fn first_token(&self, node: NodeRef) -> Option<TokenRef> {
        self.tokens(node).next()
    }

    /// Returns the range of the node's tokens, leading trivia excluded.
    #[must_use]
    pub fn text_range(&self, node: NodeRef) -> TextRange {
        let span = self.span(node);
        match self.token_bounds(span) {
            Some((first, last)) => TextRange::new(first.range.start(), last.range.end()),
            None => TextRange::empty(self.offset_of(span.first_token)),
        }
    }

    /// Returns the range of the node including the leading trivia of its
    /// first token.
    #[must_use]
    pub fn full_range(&self, node: NodeRef) -> TextRange {
        let span = self.span(node);
        match self.token_bounds(span) {
            Some((first, last)) => TextRange::new(first.full_range.start(), last.range.end()),
            None => TextRange::empty(self.offset_of(span.first_token)),
        }
    }

    /// Returns the source text covered by [`text_range`](Self::text_range).
    #[must_use]
    pub fn text(&self, node: NodeRef) -> &str {
        &self.text[self.text_range(node)]
    }

    /// Returns the message of an error node.
    #[must_use]
    pub fn error_message(&self, node: NodeRef) -> Option<&str> {
        self.node_errors
            .get(&node.0)
            .map(|&message| &*self.messages[message as usize])
    }

    /// Returns every error node as a message and range, in source order.
    #[must_use]
    pub fn errors(&self) -> Vec<ParseError> {
        let mut error_nodes: Vec<u32> = self.node_errors.keys().copied().collect();
        error_nodes.sort_unstable();
        error_nodes
            .into_iter()
            .map(|node| {
                let node = NodeRef(node);
                ParseError {
                    message: self.error_message(node).unwrap_or_default().to_string(),
                    range: self.text_range(node),
                }
            })
            .collect()
    }

    /// Returns `true` if the tree contains at least one error node.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.node_errors.is_empty()
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Returns the kind a token was recorded with.
    #[must_use]
    pub fn token_kind(&self, token: TokenRef) -> SyntaxKind {
        match self.events[token.0 as usize] {
            TreeEvent::Token { kind, .. } => kind,
            _ => SyntaxKind::Error,
        }
    }

    /// Returns the range of a token, trivia excluded.
    #[must_use]
    pub fn token_range(&self, token: TokenRef) -> TextRange {
        self.source_token(token).range
    }

    /// Returns the range of a token together with its leading trivia.
    #[must_use]
    pub fn token_full_range(&self, token: TokenRef) -> TextRange {
        self.source_token(token).full_range
    }

    /// Returns the text of a token.
    #[must_use]
    pub fn token_text(&self, token: TokenRef) -> &str {
        &self.text[self.token_range(token)]
    }

    /// Returns the text of a token together with its leading trivia.
    #[must_use]
    pub fn token_full_text(&self, token: TokenRef) -> &str {
        &self.text[self.token_full_range(token)]
    }

    /// Returns the classification of a token's leading trivia.
    #[must_use]
    pub fn token_trivia(&self, token: TokenRef) -> Trivia {
        self.source_token(token).trivia
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// Renders the tree as an indented listing, one element per line.
    ///
    /// ```text
    /// SourceFile@0..9
    ///   Property@0..9
    ///     KwVal@0..3 "val"
    /// ```
    #[must_use]
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for (idx, event) in self.events.iter().enumerate() {
            match *event {
                TreeEvent::Start { kind, .. } => {
                    let node = NodeRef(idx as u32);
                    let _ = write!(
                        out,
                        "{:indent$}{:?}@{:?}",
                        "",
                        kind,
                        self.text_range(node),
                        indent = depth * 2
                    );
                    if let Some(message) = self.error_message(node) {
                        let _ = write!(out, " {message:?}");
                    }
                    out.push('\n');
                    depth += 1;
                }
                TreeEvent::Token { kind, .. } => {
                    let token = TokenRef(idx as u32);
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{:?} {:?}",
                        "",
                        kind,
                        self.token_range(token),
                        self.token_text(token),
                        indent = depth * 2
                    );
                }
                TreeEvent::Finish => depth = depth.saturating_sub(1),
            }
        }
        out
    }

    fn span(&self, node: NodeRef) -> Span {
        match self.events.get(node.0 as usize) {
            Some(&TreeEvent::Start {
                kind,
                len,
                first_token,
                token_end,
            }) => Span {
                kind,
                len,
                first_token,
                token_end,
            },
            _ => panic!("{node:?} does not refer to a node of this tree"),
        }
    }

    fn source_token(&self, token: TokenRef) -> &SourceToken {
        match self.events.get(token.0 as usize) {
            Some(&TreeEvent::Token { token: index, .. }) => &self.tokens[index as usize],
            _ => panic!("{token:?} does not refer to a token of this tree"),
        }
    }

    fn token_bounds(&self, span: Span) -> Option<(&SourceToken, &SourceToken)> {
        if span.first_token >= span.token_end {
            return None;
        }
        let first = self.tokens.get(span.first_token as usize)?;
        let last = self.tokens.get(span.token_end as usize - 1)?;
        Some((first, last))
    }

    fn offset_of(&self, token: u32) -> TextSize {
        self.tokens
            .get(token as usize)
            .map_or_else(|| TextSize::of(&*self.text), |t| t.range.start())
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    kind: SyntaxKind,
    len: u32,
    first_token: u32,
    token_end: u32,
}

/// Lazy iterator over the direct children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    events: &'a [TreeEvent],
    cursor: usize,
    /// Index of the node's `Finish` event.
    end: usize,
}

impl Iterator for Children<'_> {
    type Item = LightElement;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.end {
            let idx = self.cursor;
            match self.events[idx] {
                TreeEvent::Start { len, .. } => {
                    self.cursor += len as usize;
                    return Some(LightElement::Node(NodeRef(idx as u32)));
                }
                TreeEvent::Token { .. } => {
                    self.cursor += 1;
                    return Some(LightElement::Token(TokenRef(idx as u32)));
                }
                TreeEvent::Finish => self.cursor += 1,
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Children<'_> {}
