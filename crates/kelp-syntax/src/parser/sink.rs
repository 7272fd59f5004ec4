//! Freezing of the event log into an indexed, immutable form.
//!
//! Forward-parent chains are resolved here so that every node becomes a
//! properly nested `Start … Finish` pair, and each start records the length
//! of its span. Children can then be found by skipping whole spans.

use crate::lexer::SourceToken;
use crate::parser::event::{Event, EventLog, MarkerStats};
use crate::tree::TreeEvent;
use rustc_hash::FxHashMap;

/// The frozen output of one parse.
#[derive(Debug)]
pub(crate) struct FrozenTree {
    pub(crate) events: Vec<TreeEvent>,
    pub(crate) messages: Vec<Box<str>>,
    /// Error node (event index) to message index.
    pub(crate) node_errors: FxHashMap<u32, u32>,
    pub(crate) stats: MarkerStats,
}

impl FrozenTree {
    pub(crate) fn error_count(&self) -> usize {
        self.node_errors.len()
    }
}

/// Converts a validated log into nested tree events.
pub(crate) fn freeze(log: EventLog, tokens: &[SourceToken]) -> FrozenTree {
    let (mut events, messages, stats) = log.into_parts();
    let mut out: Vec<TreeEvent> = Vec::with_capacity(events.len());
    let mut node_errors = FxHashMap::default();
    let mut open: Vec<usize> = Vec::new();
    let mut tokens_seen = 0u32;

    for i in 0..events.len() {
        match std::mem::replace(&mut events[i], Event::Placeholder) {
            Event::Start {
                kind,
                forward_parent,
            } => {
                // Handle forward parent chain
                let mut kinds = vec![kind];
                let mut idx = i;
                let mut fp = forward_parent;

                while let Some(fp_idx) = fp {
                    idx += fp_idx as usize;
                    if let Event::Start {
                        kind,
                        forward_parent,
                    } = std::mem::replace(&mut events[idx], Event::Placeholder)
                    {
                        kinds.push(kind);
                        fp = forward_parent;
                    } else {
                        break;
                    }
                }

                for kind in kinds.into_iter().rev() {
                    open.push(out.len());
                    out.push(TreeEvent::Start {
                        kind,
                        len: 0,
                        first_token: tokens_seen,
                        token_end: tokens_seen,
                    });
                }
            }
            Event::Token { kind, index } => {
                debug_assert_eq!(index, tokens_seen, "tokens must be consumed in order");
                debug_assert!((index as usize) < tokens.len());
                out.push(TreeEvent::Token { kind, token: index });
                tokens_seen += 1;
            }
            Event::Error { message } => {
                if let Some(&node) = open.last() {
                    node_errors.insert(node as u32, message);
                }
            }
            Event::Finish => {
                if let Some(start) = open.pop() {
                    let span = (out.len() - start + 1) as u32;
                    if let TreeEvent::Start {
                        len, token_end, ..
                    } = &mut out[start]
                    {
                        *len = span;
                        *token_end = tokens_seen;
                    }
                }
                out.push(TreeEvent::Finish);
            }
            Event::Placeholder => {}
        }
    }

    FrozenTree {
        events: out,
        messages,
        node_errors,
        stats,
    }
}
