//! Parser events and the event log they are recorded in.
//!
//! The parser produces a flat stream of events that is later frozen into a
//! light tree. Markers are plain offsets into this log; nothing here holds a
//! reference to a node, so nesting depth is bounded only by the recursion
//! depth of the grammar.

use crate::syntax::SyntaxKind;
use thiserror::Error;

/// An event produced by the parser.
///
/// `Start` events are created as `Placeholder`s when a marker is opened and
/// receive their kind when the marker is completed. Abandoned markers stay
/// behind as placeholders and are ignored when the log is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Start a new node.
    Start {
        /// The kind of node being started.
        kind: SyntaxKind,
        /// Forward parent - used for left recursion handling.
        ///
        /// For `a + b` the parser completes `a` before it sees `+`; the
        /// `BinaryExpr` start is appended later and linked from `a`'s start
        /// through this relative offset.
        forward_parent: Option<u32>,
    },
    /// Consume one token into the current node.
    Token {
        /// The kind the token is recorded with (usually its lexical kind).
        kind: SyntaxKind,
        /// Index of the token in the folded token stream.
        index: u32,
    },
    /// Attach an error message to the innermost enclosing node.
    Error {
        /// Index into the log's message table.
        message: u32,
    },
    /// Finish the current node.
    Finish,
    /// Placeholder event (open or abandoned marker).
    Placeholder,
}

impl Event {
    /// Creates a start event with no forward parent.
    #[must_use]
    pub fn start(kind: SyntaxKind) -> Self {
        Self::Start {
            kind,
            forward_parent: None,
        }
    }
}

/// A violation of the marker protocol. These are defects in the grammar, not
/// in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// A marker was resolved while a marker opened after it is still open.
    #[error("marker at event {marker} resolved while inner marker at event {innermost} is still open")]
    InnerMarkerOpen {
        /// The marker being resolved.
        marker: u32,
        /// The innermost open marker.
        innermost: u32,
    },
    /// A marker was resolved that is not open at all.
    #[error("marker at event {marker} is not open")]
    MarkerNotOpen {
        /// The offending marker.
        marker: u32,
    },
    /// `finish` was called while markers are still open.
    #[error("{count} marker(s) still open when the log was finished")]
    UnresolvedMarkers {
        /// Number of open markers.
        count: usize,
    },
    /// The log is empty or does not start with the root node.
    #[error("event log has no root node")]
    MissingRoot,
    /// Events follow the root node's `Finish`.
    #[error("events found after the root node was finished")]
    TrailingEvents,
}

/// Counters for marker resolutions, kept for balance checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerStats {
    /// Markers opened, including those created by `precede`.
    pub opened: u32,
    /// Markers completed with a node kind.
    pub completed: u32,
    /// Markers completed as error nodes.
    pub errored: u32,
    /// Markers rolled back together with their events.
    pub rolled_back: u32,
    /// Markers abandoned (their events are kept).
    pub abandoned: u32,
}

impl MarkerStats {
    /// Returns `true` if every opened marker was resolved exactly once.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.opened == self.completed + self.errored + self.rolled_back + self.abandoned
    }
}

/// The append-only event log of one parse.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    messages: Vec<Box<str>>,
    /// Positions of open markers, innermost last.
    open: Vec<u32>,
    stats: MarkerStats,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the message table.
    #[must_use]
    pub fn messages(&self) -> &[Box<str>] {
        &self.messages
    }

    /// Returns the marker counters.
    #[must_use]
    pub fn stats(&self) -> MarkerStats {
        self.stats
    }

    /// Returns the number of open markers.
    #[must_use]
    pub fn open_markers(&self) -> usize {
        self.open.len()
    }

    /// Opens a marker at the end of the log.
    pub fn open(&mut self) -> u32 {
        let pos = self.events.len() as u32;
        self.events.push(Event::Placeholder);
        self.open.push(pos);
        self.stats.opened += 1;
        pos
    }

    /// Opens a marker that will become the parent of the completed node
    /// starting at `child`.
    pub fn open_before(&mut self, child: u32) -> u32 {
        let pos = self.open();
        set_forward_parent(&mut self.events, child as usize, pos as usize);
        pos
    }

    /// Appends a token event.
    pub fn token(&mut self, kind: SyntaxKind, index: u32) {
        self.events.push(Event::Token { kind, index });
    }

    /// Closes the marker at `pos` as a node of `kind`.
    pub fn complete(&mut self, pos: u32, kind: SyntaxKind) -> Result<(), BuilderError> {
        self.close(pos)?;
        self.set_kind(pos, kind);
        self.events.push(Event::Finish);
        self.stats.completed += 1;
        Ok(())
    }

    /// Closes the marker at `pos` as an error node carrying `message`.
    pub fn error(&mut self, pos: u32, message: &str) -> Result<(), BuilderError> {
        self.close(pos)?;
        self.set_kind(pos, SyntaxKind::Error);
        let message_idx = self.messages.len() as u32;
        self.messages.push(message.into());
        self.events.push(Event::Error {
            message: message_idx,
        });
        self.events.push(Event::Finish);
        self.stats.errored += 1;
        Ok(())
    }

    /// Drops the marker at `pos` but keeps its events in the parent.
    ///
    /// `child` has the same meaning as for [`rollback`](Self::rollback).
    pub fn abandon(&mut self, pos: u32, child: Option<u32>) -> Result<(), BuilderError> {
        self.close(pos)?;
        if pos as usize + 1 == self.events.len() {
            self.events.pop();
        }
        if let Some(child) = child {
            clear_forward_parent(&mut self.events, child as usize, pos as usize);
        }
        self.stats.abandoned += 1;
        Ok(())
    }

    /// Discards the marker at `pos` and every event recorded after it.
    ///
    /// `child` is the start of the node the marker was created to precede,
    /// if any; its forward-parent link into the discarded region is cleared.
    /// Returns the number of discarded events.
    pub fn rollback(&mut self, pos: u32, child: Option<u32>) -> Result<usize, BuilderError> {
        self.close(pos)?;
        let pos = pos as usize;
        let first_message = self.events[pos..].iter().find_map(|event| match event {
            Event::Error { message } => Some(*message as usize),
            _ => None,
        });
        if let Some(first_message) = first_message {
            self.messages.truncate(first_message);
        }
        let discarded = self.events.len() - pos;
        self.events.truncate(pos);
        if let Some(child) = child {
            clear_forward_parent(&mut self.events, child as usize, pos);
        }
        self.stats.rolled_back += 1;
        Ok(discarded)
    }

    /// Checks that every marker was resolved and that the log holds exactly
    /// one root node.
    pub fn validate(&self) -> Result<(), BuilderError> {
        if !self.open.is_empty() {
            return Err(BuilderError::UnresolvedMarkers {
                count: self.open.len(),
            });
        }
        if !matches!(self.events.first(), Some(Event::Start { .. })) {
            return Err(BuilderError::MissingRoot);
        }

        let mut depth = 0usize;
        for (idx, event) in self.events.iter().enumerate() {
            match event {
                Event::Start { .. } => depth += 1,
                Event::Finish => {
                    depth -= 1;
                    if depth == 0 && idx + 1 != self.events.len() {
                        return Err(BuilderError::TrailingEvents);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Consumes the log, returning events and messages.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Event>, Vec<Box<str>>, MarkerStats) {
        (self.events, self.messages, self.stats)
    }

    fn close(&mut self, pos: u32) -> Result<(), BuilderError> {
        match self.open.last() {
            Some(&top) if top == pos => {
                self.open.pop();
                Ok(())
            }
            Some(&top) if self.open.contains(&pos) => Err(BuilderError::InnerMarkerOpen {
                marker: pos,
                innermost: top,
            }),
            _ => Err(BuilderError::MarkerNotOpen { marker: pos }),
        }
    }

    fn set_kind(&mut self, pos: u32, kind: SyntaxKind) {
        match self.events.get_mut(pos as usize) {
            Some(event @ Event::Placeholder) => *event = Event::start(kind),
            Some(Event::Start {
                kind: existing_kind,
                ..
            }) => *existing_kind = kind,
            _ => {}
        }
    }
}

fn set_forward_parent(events: &mut [Event], from: usize, to: usize) {
    let mut current = from;
    loop {
        match &mut events[current] {
            Event::Start {
                forward_parent: Some(fp),
                ..
            } => {
                current += *fp as usize;
            }
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some((to - current) as u32);
                break;
            }
            _ => break,
        }
    }
}

fn clear_forward_parent(events: &mut [Event], from: usize, cut: usize) {
    let mut current = from;
    while current < events.len() {
        match &mut events[current] {
            Event::Start {
                forward_parent: Some(fp),
                ..
            } => {
                let next = current + *fp as usize;
                if next >= cut {
                    *fp = 0;
                    break;
                }
                current = next;
            }
            _ => break,
        }
    }
    // A zero offset is never a valid link; normalise it back to `None`.
    if let Some(Event::Start { forward_parent, .. }) = events.get_mut(current) {
        if *forward_parent == Some(0) {
            *forward_parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_sets_kind() {
        let mut log = EventLog::new();
        let root = log.open();
        log.token(SyntaxKind::Ident, 0);
        log.complete(root, SyntaxKind::NameRef).unwrap();

        assert_eq!(
            log.events(),
            &[
                Event::start(SyntaxKind::NameRef),
                Event::Token {
                    kind: SyntaxKind::Ident,
                    index: 0
                },
                Event::Finish,
            ]
        );
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_outer_marker_cannot_close_before_inner() {
        let mut log = EventLog::new();
        let outer = log.open();
        let inner = log.open();
        assert_eq!(
            log.complete(outer, SyntaxKind::Block),
            Err(BuilderError::InnerMarkerOpen {
                marker: outer,
                innermost: inner
            })
        );
    }

    #[test]
    fn test_closed_marker_cannot_close_again() {
        let mut log = EventLog::new();
        let root = log.open();
        log.complete(root, SyntaxKind::Block).unwrap();
        assert_eq!(
            log.complete(root, SyntaxKind::Block),
            Err(BuilderError::MarkerNotOpen { marker: root })
        );
    }

    #[test]
    fn test_rollback_discards_events_and_messages() {
        let mut log = EventLog::new();
        let root = log.open();
        log.token(SyntaxKind::Ident, 0);
        let speculative = log.open();
        log.token(SyntaxKind::Lt, 1);
        let err = log.open();
        log.error(err, "expecting a type").unwrap();
        assert_eq!(log.messages().len(), 1);

        let discarded = log.rollback(speculative, None).unwrap();
        assert_eq!(discarded, 5);
        assert_eq!(log.len(), 2);
        assert!(log.messages().is_empty());

        log.complete(root, SyntaxKind::SourceFile).unwrap();
        assert!(log.validate().is_ok());
        assert!(log.stats().is_balanced());
    }

    #[test]
    fn test_rollback_of_preceding_marker_unlinks_child() {
        let mut log = EventLog::new();
        let root = log.open();
        let lhs = log.open();
        log.token(SyntaxKind::Ident, 0);
        log.complete(lhs, SyntaxKind::NameRef).unwrap();

        let parent = log.open_before(lhs);
        assert!(matches!(
            log.events()[lhs as usize],
            Event::Start {
                forward_parent: Some(_),
                ..
            }
        ));

        log.rollback(parent, Some(lhs)).unwrap();
        assert_eq!(
            log.events()[lhs as usize],
            Event::start(SyntaxKind::NameRef)
        );
        log.complete(root, SyntaxKind::Script).unwrap();
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_open_markers() {
        let mut log = EventLog::new();
        let _root = log.open();
        assert_eq!(
            log.validate(),
            Err(BuilderError::UnresolvedMarkers { count: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_two_roots() {
        let mut log = EventLog::new();
        let first = log.open();
        log.complete(first, SyntaxKind::SourceFile).unwrap();
        let second = log.open();
        log.complete(second, SyntaxKind::SourceFile).unwrap();
        assert_eq!(log.validate(), Err(BuilderError::TrailingEvents));
    }

    #[test]
    fn test_stats_balance() {
        let mut log = EventLog::new();
        let root = log.open();
        let a = log.open();
        log.abandon(a, None).unwrap();
        let b = log.open();
        log.error(b, "oops").unwrap();
        let c = log.open();
        log.rollback(c, None).unwrap();
        log.complete(root, SyntaxKind::SourceFile).unwrap();

        let stats = log.stats();
        assert_eq!(stats.opened, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.errored, 1);
        assert_eq!(stats.rolled_back, 1);
        assert_eq!(stats.abandoned, 1);
        assert!(stats.is_balanced());
    }
}
