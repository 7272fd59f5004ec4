//! Grammar rules for the kelp surface language.
//!
//! This module contains the grammar rules organized by category:
//!
//! - `items.rs` - Package and import header, declarations, modifiers
//! - `types.rs` - Type references
//! - `statements.rs` - Blocks, statements, control flow and separators
//! - `expressions.rs` - Expression parsing (Pratt parser)

mod expressions;
mod items;
mod statements;
mod types;

use super::Parser;

/// Optional `package` directive followed by imports.
pub(crate) fn header(p: &mut Parser<'_, '_>) {
    p.parse_package_directive();
    p.parse_import_list();
}

/// One top-level declaration of a file.
pub(crate) fn top_level_declaration(p: &mut Parser<'_, '_>) {
    p.parse_top_level_declaration();
}

/// One top-level statement of a script, including its separator.
pub(crate) fn top_level_statement(p: &mut Parser<'_, '_>) {
    p.parse_top_level_statement();
}
