//! `kelp-syntax` - Lexer, flyweight parser and light syntax tree for kelp sources.
//!
//! This crate provides the low-level syntactic analysis for a Kotlin-style
//! surface language:
//!
//! - **Lexer**: Tokenizes source text and folds trivia into the following token
//! - **Parser**: Records a flat event log through markers instead of building
//!   node objects, with rollback for speculative parses
//! - **Light tree**: A read-only view over the frozen log whose children are
//!   computed on demand
//!
//! # Design Principles
//!
//! - **Flyweight**: Nodes are indices into one event log; memory is
//!   proportional to the log, not to the number of nodes inspected
//! - **Whitespace-aware**: Grammar rules never see trivia, they only ask
//!   whether a token is preceded by significant whitespace
//! - **Error-tolerant**: Parsing always completes; malformed regions become
//!   error nodes
//! - **Lossless**: Token leaves own their leading trivia, and the tree can be
//!   converted into a `rowan` CST
//!
//! # Example
//!
//! ```
//! use kelp_syntax::{parse_file, SyntaxKind};
//!
//! let tree = parse_file("fun main() { println(\"hi\") }");
//! assert!(!tree.has_errors());
//!
//! let kinds: Vec<_> = tree
//!     .child_nodes(tree.root())
//!     .map(|node| tree.kind(node))
//!     .collect();
//! assert_eq!(kinds, vec![SyntaxKind::Function]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod lexer;
pub mod parser;
pub mod syntax;
mod token_kinds;
pub mod tree;

pub use lexer::{lex, tokenize, Lexer, SourceToken, Token, TokenKind, Trivia};
pub use parser::{
    parse_file, parse_file_with, parse_script, parse_script_with, parse_tokens,
    CancellationToken, EntryPoint, ParseError, ParseOptions, WhitespacePolicy,
};
pub use syntax::{KelpLanguage, SyntaxKind, SyntaxNode, SyntaxToken};
pub use tree::{Children, LightElement, NodeRef, TokenRef, TreeHandle};
