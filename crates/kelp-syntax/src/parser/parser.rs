//! Main parser implementation.

use crate::lexer::{tokenize, SourceToken, TokenKind, Trivia};
use crate::parser::event::{BuilderError, EventLog};
use crate::parser::sink;
use crate::parser::source::{Source, WhitespacePolicy};
use crate::parser::{grammar, CancellationToken, EntryPoint, ParseOptions};
use crate::syntax::SyntaxKind;
use crate::tree::TreeHandle;
use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};
use tracing::{debug, trace};

/// Parses source text as a file.
#[must_use]
pub fn parse_file(text: &str) -> TreeHandle {
    parse_file_with(text, &ParseOptions::default())
}

/// Parses source text as a file with explicit options.
#[must_use]
pub fn parse_file_with(text: &str, options: &ParseOptions) -> TreeHandle {
    parse_tokens(text, tokenize(text), EntryPoint::File, options)
}

/// Parses source text as a script fragment.
#[must_use]
pub fn parse_script(text: &str) -> TreeHandle {
    parse_script_with(text, &ParseOptions::default())
}

/// Parses source text as a script fragment with explicit options.
#[must_use]
pub fn parse_script_with(text: &str, options: &ParseOptions) -> TreeHandle {
    parse_tokens(text, tokenize(text), EntryPoint::Script, options)
}

/// Parses an already folded token stream.
///
/// The stream is terminated with an `Eof` sentinel if it does not end with
/// one. Parsing is total: malformed input yields error nodes, never a failure.
///
/// # Panics
///
/// Panics if the grammar violates the marker protocol. This is a bug in the
/// parser, never a property of the input.
#[must_use]
pub fn parse_tokens(
    text: &str,
    mut tokens: Vec<SourceToken>,
    entry: EntryPoint,
    options: &ParseOptions,
) -> TreeHandle {
    if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
        let end = TextSize::of(text);
        let start = tokens.last().map_or(TextSize::from(0), |t| t.full_range.end());
        tokens.push(SourceToken {
            kind: TokenKind::Eof,
            range: TextRange::empty(end),
            full_range: TextRange::new(start.min(end), end),
            trivia: Trivia::default(),
        });
    }

    let parser = Parser::new(&tokens, text, options);
    let (log, cancelled) = parser.run(entry);
    let stats = log.stats();
    let event_count = log.len();
    let tree = log
        .validate()
        .map(|()| sink::freeze(log, &tokens))
        .unwrap_or_else(|err| panic!("parser produced an invalid event log: {err}"));

    debug!(
        ?entry,
        tokens = tokens.len(),
        events = event_count,
        markers = stats.opened,
        rolled_back = stats.rolled_back,
        errors = tree.error_count(),
        cancelled,
        "parsed"
    );
    TreeHandle::new(text, tokens, tree)
}

/// The parser state.
pub(crate) struct Parser<'t, 'src> {
    pub(crate) source: Source<'t, 'src>,
    log: EventLog,
    separator_policy: WhitespacePolicy,
    cancellation: Option<CancellationToken>,
}

/// An open span in the event log.
pub(crate) struct Marker {
    pos: u32,
    token_pos: u32,
    newline_depth: usize,
    /// Start of the completed node this marker was created to wrap.
    child: Option<u32>,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32, token_pos: u32, newline_depth: usize, child: Option<u32>) -> Self {
        Self {
            pos,
            token_pos,
            newline_depth,
            child,
            bomb: DropBomb::new("uncompleted marker"),
        }
    }

    /// Finishes the node as `kind`.
    pub(crate) fn complete(
        mut self,
        parser: &mut Parser<'_, '_>,
        kind: SyntaxKind,
    ) -> CompletedMarker {
        self.bomb.defuse();
        protocol(parser.log.complete(self.pos, kind));
        CompletedMarker {
            pos: self.pos,
            kind,
        }
    }

    /// Finishes the node as an error node carrying `message`. Consumed tokens
    /// stay in the tree.
    pub(crate) fn error(mut self, parser: &mut Parser<'_, '_>, message: &str) -> CompletedMarker {
        self.bomb.defuse();
        protocol(parser.log.error(self.pos, message));
        CompletedMarker {
            pos: self.pos,
            kind: SyntaxKind::Error,
        }
    }

    /// Discards the marker and everything recorded after it, and rewinds the
    /// cursor to where the marker was opened.
    pub(crate) fn rollback(mut self, parser: &mut Parser<'_, '_>) {
        self.bomb.defuse();
        let discarded = protocol(parser.log.rollback(self.pos, self.child));
        parser.source.reset(self.token_pos);
        parser.source.truncate_newlines(self.newline_depth);
        trace!(
            marker = self.pos,
            discarded,
            token = self.token_pos,
            "rolled back"
        );
    }

    /// Forgets the marker; its events become part of the enclosing node.
    pub(crate) fn abandon(mut self, parser: &mut Parser<'_, '_>) {
        self.bomb.defuse();
        protocol(parser.log.abandon(self.pos, self.child));
    }
}

/// A finished node, which can still be wrapped by a new parent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
    kind: SyntaxKind,
}

impl CompletedMarker {
    /// Opens a marker that becomes the parent of this node once completed.
    pub(crate) fn precede(self, parser: &mut Parser<'_, '_>) -> Marker {
        let pos = parser.log.open_before(self.pos);
        Marker::new(
            pos,
            parser.source.position(),
            parser.source.newline_depth(),
            Some(self.pos),
        )
    }

    pub(crate) fn kind(self) -> SyntaxKind {
        self.kind
    }
}

fn protocol<T>(result: Result<T, BuilderError>) -> T {
    result.unwrap_or_else(|err| panic!("marker protocol violation: {err}"))
}

impl<'t, 'src> Parser<'t, 'src> {
    pub(crate) fn new(
        tokens: &'t [SourceToken],
        source: &'src str,
        options: &ParseOptions,
    ) -> Self {
        Self {
            source: Source::new(tokens, source),
            log: EventLog::new(),
            separator_policy: options.separator_policy,
            cancellation: options.cancellation.clone(),
        }
    }

    /// Runs the entry production and returns the log with the root closed.
    fn run(mut self, entry: EntryPoint) -> (EventLog, bool) {
        let root = self.start();
        grammar::header(&mut self);

        let mut cancelled = false;
        while !self.at_end() {
            if self.is_cancelled() {
                trace!(token = self.source.position(), "parse cancelled");
                let m = self.start();
                while !self.at_end() {
                    self.bump();
                }
                m.error(&mut self, "parse cancelled");
                cancelled = true;
                break;
            }

            let before = self.source.position();
            match entry {
                EntryPoint::File => grammar::top_level_declaration(&mut self),
                EntryPoint::Script => grammar::top_level_statement(&mut self),
            }
            if self.source.position() == before && !self.at_end() {
                self.err_and_bump("unexpected token");
            }
        }

        self.bump_eof();
        root.complete(&mut self, entry.root_kind());
        (self.log, cancelled)
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    pub(crate) fn current(&self) -> TokenKind {
        self.source.current()
    }

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.source.nth(n)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current())
    }

    pub(crate) fn at_end(&self) -> bool {
        self.source.at_end()
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'src str {
        self.source.nth_text(n)
    }

    /// Returns `true` if the current token starts a new line. Operators,
    /// calls and postfix forms do not continue an expression across it.
    pub(crate) fn newline_before(&self) -> bool {
        self.source
            .preceded_by_significant_whitespace(WhitespacePolicy::Newline)
    }

    /// Returns `true` if the trivia before the current token ends a
    /// statement under the configured separator policy.
    pub(crate) fn separator_before(&self) -> bool {
        self.source
            .preceded_by_significant_whitespace(self.separator_policy)
    }

    /// Returns `true` if the nth token ahead touches its predecessor.
    pub(crate) fn nth_adjacent(&self, n: usize) -> bool {
        !self.source.nth_preceded_by(n, WhitespacePolicy::Any)
    }

    pub(crate) fn disable_newlines(&mut self) {
        self.source.disable_newlines();
    }

    pub(crate) fn enable_newlines(&mut self) {
        self.source.enable_newlines();
    }

    pub(crate) fn restore_newlines(&mut self) {
        self.source.restore_newlines();
    }

    /// Consumes the current token into the current node.
    ///
    /// At end of input nothing is consumed and an error node is recorded
    /// instead.
    pub(crate) fn bump(&mut self) {
        let kind = self.current();
        match self.source.advance() {
            Ok(index) => self.log.token(SyntaxKind::from(kind), index),
            Err(err) => {
                self.error(&err.to_string());
            }
        }
    }

    /// Consumes the end-of-input sentinel, which carries trailing trivia.
    fn bump_eof(&mut self) {
        if let Some(index) = self.source.consume_end() {
            self.log.token(SyntaxKind::Eof, index);
        }
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` or records an empty error node.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&format!("expecting {what}"));
            false
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.log.open();
        Marker::new(
            pos,
            self.source.position(),
            self.source.newline_depth(),
            None,
        )
    }

    /// Records an empty error node at the current position.
    pub(crate) fn error(&mut self, message: &str) -> CompletedMarker {
        let m = self.start();
        m.error(self, message)
    }

    /// Wraps the current token in an error node.
    pub(crate) fn err_and_bump(&mut self, message: &str) -> CompletedMarker {
        let m = self.start();
        self.bump();
        m.error(self, message)
    }

    /// Consumes tokens into an error node until `recovery` matches, or records
    /// an empty error node if it already does.
    pub(crate) fn err_recover(
        &mut self,
        message: &str,
        recovery: impl Fn(&Parser<'_, '_>) -> bool,
    ) -> CompletedMarker {
        if self.at_end() || recovery(self) {
            return self.error(message);
        }
        let m = self.start();
        self.bump();
        while !self.at_end() && !recovery(self) {
            self.bump();
        }
        m.error(self, message)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_parser(text: &str, f: impl FnOnce(&mut Parser<'_, '_>)) -> EventLog {
        let tokens = tokenize(text);
        let mut parser = Parser::new(&tokens, text, &ParseOptions::default());
        f(&mut parser);
        parser.log
    }

    #[test]
    fn test_parse_empty() {
        let tree = parse_file("");
        assert!(tree.errors().is_empty());
        assert_eq!(tree.kind(tree.root()), SyntaxKind::SourceFile);
    }

    #[test]
    fn test_parse_simple_function() {
        let tree = parse_file("fun main() { println(\"hi\") }");
        assert!(tree.errors().is_empty(), "errors: {:?}", tree.errors());
    }

    #[test]
    fn test_rollback_rewinds_cursor_and_log() {
        let log = with_parser("a b c d", |p| {
            let root = p.start();
            p.bump();
            let before_kind = p.current();
            let before_range = p.source.current_token().map(|t| t.range);
            let events_before = p.log.len();

            let m = p.start();
            p.bump();
            p.bump();
            m.rollback(p);

            assert_eq!(p.current(), before_kind);
            assert_eq!(p.source.current_token().map(|t| t.range), before_range);
            assert_eq!(p.log.len(), events_before);

            while !p.at_end() {
                p.bump();
            }
            root.complete(p, SyntaxKind::Script);
        });
        assert!(log.validate().is_ok());
        assert!(log.stats().is_balanced());
        assert_eq!(log.stats().rolled_back, 1);
    }

    #[test]
    fn test_rollback_restores_newline_mode() {
        with_parser("( a\n b )", |p| {
            let root = p.start();
            let m = p.start();
            p.bump();
            p.disable_newlines();
            p.bump();
            assert!(!p.newline_before());
            m.rollback(p);
            p.bump();
            p.bump();
            assert!(p.newline_before());
            while !p.at_end() {
                p.bump();
            }
            root.complete(p, SyntaxKind::Script);
        });
    }

    #[test]
    fn test_rollback_of_precede_keeps_child() {
        let log = with_parser("a < b", |p| {
            let root = p.start();
            let lhs = p.start();
            p.bump();
            let lhs = lhs.complete(p, SyntaxKind::NameRef);
            let wrapper = lhs.precede(p);
            p.bump();
            wrapper.rollback(p);
            assert_eq!(p.current(), TokenKind::Lt);
            while !p.at_end() {
                p.bump();
            }
            root.complete(p, SyntaxKind::Script);
        });
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_bump_at_end_records_error() {
        let log = with_parser("", |p| {
            let root = p.start();
            p.bump();
            root.complete(p, SyntaxKind::Script);
        });
        assert_eq!(log.messages().len(), 1);
        assert_eq!(&*log.messages()[0], "unexpected end of input");
    }

    #[test]
    #[should_panic(expected = "marker protocol violation")]
    fn test_completing_outer_marker_first_panics() {
        with_parser("a", |p| {
            let outer = p.start();
            let inner = p.start();
            let _ = outer.complete(p, SyntaxKind::Block);
            inner.abandon(p);
        });
    }

    #[test]
    fn test_err_recover_stops_at_recovery_token() {
        let log = with_parser("x y ; z", |p| {
            let root = p.start();
            p.err_recover("junk", |p| p.at(TokenKind::Semicolon));
            assert!(p.at(TokenKind::Semicolon));
            while !p.at_end() {
                p.bump();
            }
            root.complete(p, SyntaxKind::Script);
        });
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_external_tokens_get_eof_sentinel() {
        let text = "x";
        let mut tokens = tokenize(text);
        tokens.pop();
        let tree = parse_tokens(text, tokens, EntryPoint::Script, &ParseOptions::default());
        assert_eq!(tree.source_tokens().last().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(tree.errors().is_empty());
    }
}
