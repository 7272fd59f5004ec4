//! Statement parsing.
//!
//! Statements are separated by `;` or by a significant newline, as decided by
//! the configured separator policy. Supported forms:
//! - Declarations (local `fun`, `val`, `var`, `class`, `object`)
//! - Expressions, including `if`/`when` used as statements
//! - Loops: `while (cond) body`, `for (x in xs) body`
//! - Jumps: `return`, `break`, `continue`, with optional `@label`

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::{CompletedMarker, Parser};

const SEPARATOR_MESSAGE: &str =
    "unexpected tokens (use ';' to separate expressions on the same line)";

impl Parser<'_, '_> {
    /// Parse one statement of a script, including its separator.
    pub(crate) fn parse_top_level_statement(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            return;
        }
        if self.at(TokenKind::RBrace) {
            self.err_and_bump("unmatched '}'");
            return;
        }
        if !self.at_statement_start() {
            self.err_and_bump("expecting an element");
            return;
        }
        self.parse_statement();
        self.expect_separator();
    }

    /// Parse `{ statements }`.
    pub(crate) fn parse_block(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // {
        self.enable_newlines();
        self.parse_statements();
        self.restore_newlines();
        self.expect(TokenKind::RBrace, "'}'");
        m.complete(self, SyntaxKind::Block)
    }

    /// Parse statements up to a closing `}` or end of input.
    pub(crate) fn parse_statements(&mut self) {
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            if !self.at_statement_start() {
                self.err_and_bump("expecting an element");
                continue;
            }
            self.parse_statement();
            self.expect_separator();
        }
    }

    fn at_statement_start(&self) -> bool {
        self.current().can_start_expr() || self.at_declaration_start()
    }

    /// Parse a declaration or an expression.
    pub(crate) fn parse_statement(&mut self) {
        if self.at_declaration_start() {
            self.parse_declaration();
        } else {
            self.parse_expression();
        }
    }

    /// Requires `;`, `}`, end of input or a separator after a statement.
    fn expect_separator(&mut self) {
        if self.at(TokenKind::Semicolon)
            || self.at(TokenKind::RBrace)
            || self.at_end()
            || self.separator_before()
        {
            return;
        }
        self.err_recover(SEPARATOR_MESSAGE, |p| {
            p.at(TokenKind::Semicolon) || p.at(TokenKind::RBrace) || p.separator_before()
        });
    }

    /// Parse the body of `if`, `while`, `for` or a `when` entry.
    pub(crate) fn parse_control_body(&mut self) {
        if self.at(TokenKind::LBrace) {
            self.parse_block();
        } else if self.current().can_start_expr() {
            self.parse_expression();
        } else if !self.at(TokenKind::Semicolon) {
            self.error("expecting an expression");
        }
    }

    /// Parse `(expr)` into a `Condition`.
    pub(crate) fn parse_condition(&mut self) {
        if !self.expect(TokenKind::LParen, "'('") {
            let m = self.start();
            self.parse_expression();
            m.complete(self, SyntaxKind::Condition);
            return;
        }
        self.disable_newlines();
        let m = self.start();
        self.parse_expression();
        m.complete(self, SyntaxKind::Condition);
        self.restore_newlines();
        self.expect(TokenKind::RParen, "')'");
    }

    /// Parse `if (cond) then else otherwise`.
    pub(crate) fn parse_if_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // if
        self.parse_condition();

        let then_branch = self.start();
        self.parse_control_body();
        then_branch.complete(self, SyntaxKind::ThenBranch);

        let else_follows = self.at(TokenKind::KwElse)
            || (self.at(TokenKind::Semicolon) && self.nth(1) == TokenKind::KwElse);
        if else_follows {
            self.eat(TokenKind::Semicolon);
            self.bump(); // else
            let else_branch = self.start();
            self.parse_control_body();
            else_branch.complete(self, SyntaxKind::ElseBranch);
        }

        m.complete(self, SyntaxKind::IfExpr)
    }

    /// Parse `when (subject) { cond, cond -> body  else -> body }`.
    pub(crate) fn parse_when_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // when

        if self.at(TokenKind::LParen) {
            self.parse_condition();
        }

        if !self.at(TokenKind::LBrace) {
            self.error("expecting '{'");
            return m.complete(self, SyntaxKind::WhenExpr);
        }
        self.bump(); // {
        self.enable_newlines();

        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            let before = self.source.position();
            self.parse_when_entry();
            if self.source.position() == before {
                self.err_and_bump("expecting a when entry");
            }
        }

        self.restore_newlines();
        self.expect(TokenKind::RBrace, "'}'");
        m.complete(self, SyntaxKind::WhenExpr)
    }

    fn parse_when_entry(&mut self) {
        let m = self.start();

        if self.at(TokenKind::KwElse) {
            self.bump();
        } else {
            loop {
                self.parse_when_condition();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        if self.expect(TokenKind::Arrow, "'->'") {
            self.parse_control_body();
        }

        m.complete(self, SyntaxKind::WhenEntry);
    }

    fn parse_when_condition(&mut self) {
        let m = self.start();
        if self.at(TokenKind::KwIn) {
            self.bump();
        } else if self.at(TokenKind::Excl) && self.nth(1) == TokenKind::KwIn {
            self.bump();
            self.bump();
        }
        self.parse_expression();
        m.complete(self, SyntaxKind::WhenCondition);
    }

    /// Parse `while (cond) body`.
    pub(crate) fn parse_while_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // while
        self.parse_condition();

        let body = self.start();
        self.parse_control_body();
        body.complete(self, SyntaxKind::LoopBody);

        m.complete(self, SyntaxKind::WhileExpr)
    }

    /// Parse `for (x in range) body`.
    pub(crate) fn parse_for_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // for

        let has_paren = self.expect(TokenKind::LParen, "'('");
        if has_paren {
            self.disable_newlines();
        }

        let parameter = self.start();
        self.parse_name();
        if self.eat(TokenKind::Colon) {
            self.parse_type_ref();
        }
        parameter.complete(self, SyntaxKind::LoopParameter);

        if self.expect(TokenKind::KwIn, "'in'") {
            let range = self.start();
            self.parse_expression();
            range.complete(self, SyntaxKind::LoopRange);
        }

        if has_paren {
            self.restore_newlines();
            self.expect(TokenKind::RParen, "')'");
        }

        let body = self.start();
        self.parse_control_body();
        body.complete(self, SyntaxKind::LoopBody);

        m.complete(self, SyntaxKind::ForExpr)
    }

    /// Parse `return`, `return@label value`.
    pub(crate) fn parse_return_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(); // return
        self.parse_label_ref();

        if self.current().can_start_expr() && !self.newline_before() {
            self.parse_expression();
        }

        m.complete(self, SyntaxKind::ReturnExpr)
    }

    /// Parse `break` or `continue` with an optional label.
    pub(crate) fn parse_jump_expr(&mut self) -> CompletedMarker {
        let kind = if self.at(TokenKind::KwBreak) {
            SyntaxKind::BreakExpr
        } else {
            SyntaxKind::ContinueExpr
        };
        let m = self.start();
        self.bump();
        self.parse_label_ref();
        m.complete(self, kind)
    }

    /// Parse `@label` directly attached to the previous token.
    pub(crate) fn parse_label_ref(&mut self) {
        let attached = self.at(TokenKind::At)
            && self.nth_adjacent(0)
            && self.nth(1) == TokenKind::Ident
            && self.nth_adjacent(1);
        if !attached {
            return;
        }
        let m = self.start();
        self.bump(); // @
        self.bump(); // label
        m.complete(self, SyntaxKind::LabelRef);
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_file, parse_script};
    use crate::syntax::SyntaxKind;
    use crate::tree::{LightElement, TreeHandle};

    fn contains(tree: &TreeHandle, kind: SyntaxKind) -> bool {
        tree.descendants(tree.root())
            .filter_map(LightElement::into_node)
            .any(|node| tree.kind(node) == kind)
    }

    #[test]
    fn test_statements_on_separate_lines() {
        let tree = parse_script("a()\nb()\nc()");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(tree.child_nodes(tree.root()).count(), 3);
    }

    #[test]
    fn test_semicolon_separates_statements_on_one_line() {
        let tree = parse_script("a(); b()");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(tree.child_nodes(tree.root()).count(), 2);
    }

    #[test]
    fn test_missing_separator_is_reported_once() {
        let tree = parse_script("a() b() c()\nd()");
        let errors = tree.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "unexpected tokens (use ';' to separate expressions on the same line)"
        );
        assert_eq!(&tree.source_text()[errors[0].range], "b() c()");
    }

    #[test]
    fn test_control_flow() {
        let tree = parse_file(
            r#"
fun main() {
    for (i in 0..10) {
        if (i % 2 == 0) continue else println(i)
    }
    while (running) step()
    val kind = when (x) {
        1, 2 -> "small"
        in 3..9 -> "medium"
        else -> { "large" }
    }
    return
}
"#,
        );
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        for kind in [
            SyntaxKind::ForExpr,
            SyntaxKind::LoopParameter,
            SyntaxKind::LoopRange,
            SyntaxKind::IfExpr,
            SyntaxKind::ElseBranch,
            SyntaxKind::ContinueExpr,
            SyntaxKind::WhileExpr,
            SyntaxKind::WhenExpr,
            SyntaxKind::WhenEntry,
            SyntaxKind::WhenCondition,
            SyntaxKind::ReturnExpr,
        ] {
            assert!(contains(&tree, kind), "missing {kind:?}");
        }
    }

    #[test]
    fn test_else_on_next_line() {
        let tree = parse_script("if (a) {\n  b\n}\nelse {\n  c\n}");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert!(contains(&tree, SyntaxKind::ElseBranch));
    }

    #[test]
    fn test_return_value_must_be_on_same_line() {
        let tree = parse_file("fun f() {\n  return\n  g()\n}");
        assert!(!tree.has_errors());
        let ret = tree
            .descendants(tree.root())
            .filter_map(LightElement::into_node)
            .find(|&node| tree.kind(node) == SyntaxKind::ReturnExpr)
            .unwrap();
        assert_eq!(tree.text(ret), "return");
    }

    #[test]
    fn test_label_requires_adjacent_at() {
        let tree = parse_file("fun f() { break@outer }");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert!(contains(&tree, SyntaxKind::LabelRef));

        let tree = parse_file("fun f() { break @outer }");
        assert!(!contains(&tree, SyntaxKind::LabelRef));
        assert!(tree.has_errors());
    }
}
