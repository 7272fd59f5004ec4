//! Subcommand implementations.

use anyhow::Context;
use kelp_syntax::{parse_tokens, tokenize, ParseError, SourceToken, TreeHandle};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use text_size::TextSize;
use tracing::{debug, info};

use crate::config::Config;

/// `kelp tree`: print the debug dump of one file.
pub fn tree(path: &Path, script: bool, config: &Config) -> anyhow::Result<()> {
    let tree = parse_path(path, script, config)?;
    print!("{}", tree.debug_dump());
    Ok(())
}

/// `kelp check`: print every syntax error. Returns `true` if all files are
/// clean.
pub fn check(paths: &[PathBuf], script: bool, config: &Config) -> anyhow::Result<bool> {
    let mut clean = true;
    let mut error_count = 0usize;
    for path in paths {
        let tree = parse_path(path, script, config)?;
        let errors = tree.errors();
        if !errors.is_empty() {
            clean = false;
            error_count += errors.len();
            print!("{}", render_errors(path, tree.source_text(), &errors));
        }
    }
    info!(files = paths.len(), errors = error_count, "check finished");
    Ok(clean)
}

/// `kelp tokens`: print the folded token stream of one file.
pub fn tokens(path: &Path) -> anyhow::Result<()> {
    let text = read_source(path)?;
    print!("{}", render_tokens(&text, &tokenize(&text)));
    Ok(())
}

fn parse_path(path: &Path, script: bool, config: &Config) -> anyhow::Result<TreeHandle> {
    let text = read_source(path)?;
    let entry = config.entry_point(path, script);
    debug!(path = %path.display(), ?entry, "parsing");
    Ok(parse_tokens(
        &text,
        tokenize(&text),
        entry,
        &config.parse_options(),
    ))
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// One `path:line:column: error: message` line per error.
pub(crate) fn render_errors(path: &Path, text: &str, errors: &[ParseError]) -> String {
    let mut out = String::new();
    for error in errors {
        let (line, column) = line_column(text, error.range.start());
        let _ = writeln!(
            out,
            "{}:{line}:{column}: error: {}",
            path.display(),
            error.message
        );
    }
    out
}

pub(crate) fn render_tokens(text: &str, tokens: &[SourceToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = write!(
            out,
            "{:?}@{:?} {:?}",
            token.kind,
            token.range,
            &text[token.range]
        );
        if token.trivia.newline {
            out.push_str(" +newline");
        } else if !token.trivia.is_empty() {
            out.push_str(" +space");
        }
        if token.trivia.comment {
            out.push_str(" +comment");
        }
        out.push('\n');
    }
    out
}

/// 1-based line and column (in chars) of `offset`.
pub(crate) fn line_column(text: &str, offset: TextSize) -> (usize, usize) {
    let offset = usize::from(offset).min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelp_syntax::parse_file;

    #[test]
    fn test_line_column() {
        let text = "ab\ncd\n\u{e9}f";
        assert_eq!(line_column(text, 0.into()), (1, 1));
        assert_eq!(line_column(text, 4.into()), (2, 2));
        assert_eq!(line_column(text, 8.into()), (3, 2));
        assert_eq!(line_column(text, 100.into()), (3, 3));
    }

    #[test]
    fn test_render_errors() {
        let text = "val a = 1\nfun f( { }\n";
        let tree = parse_file(text);
        let rendered = render_errors(Path::new("Main.kt"), text, &tree.errors());
        insta::assert_snapshot!(rendered, @"Main.kt:2:6: error: expecting ')'");
    }

    #[test]
    fn test_render_tokens() {
        let text = "a /* c */ b\nc";
        let rendered = render_tokens(text, &tokenize(text));
        insta::assert_snapshot!(rendered, @r#"
        Ident@0..1 "a"
        Ident@10..11 "b" +space +comment
        Ident@12..13 "c" +newline
        Eof@13..13 ""
        "#);
    }
}
