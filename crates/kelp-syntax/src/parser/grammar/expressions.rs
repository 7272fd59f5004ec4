//! Expression parsing using Pratt parsing.
//!
//! Operator precedence (low to high):
//! - `=`, `+=`, `-=`, `*=`, `/=`, `%=` (2-1, right associative)
//! - `||` (3-4)
//! - `&&` (5-6)
//! - `==`, `!=`, `===`, `!==` (7-8)
//! - `<`, `>`, `<=`, `>=` (9-10)
//! - `in`, `!in` (11-12)
//! - `?:` (13-14)
//! - `..` (15-16)
//! - `+`, `-` (17-18)
//! - `*`, `/`, `%` (19-20)
//! - prefix `-`, `+`, `!`, `++`, `--` (21)
//! - postfix `++`, `--`, `!!`, calls, indexing, `.`, `?.`
//!
//! A binary operator on a new line ends the expression, except `&&`, `||`
//! and `?:`. Calls, indexing and postfix operators must stay on the line of
//! their operand.

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::CompletedMarker;
use super::super::Parser;

impl Parser<'_, '_> {
    /// Parse an expression using Pratt parsing.
    pub(crate) fn parse_expression(&mut self) -> CompletedMarker {
        self.parse_expr_bp(0)
    }

    /// Parse expression with minimum binding power.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> CompletedMarker {
        let mut lhs = if let Some(bp) = self.current().prefix_binding_power() {
            let marker = self.start();
            self.bump();
            self.parse_expr_bp(bp);
            marker.complete(self, SyntaxKind::PrefixExpr)
        } else {
            self.parse_primary_expr()
        };

        loop {
            if let Some(next) = self.parse_postfix_expr(lhs) {
                lhs = next;
                continue;
            }

            let Some((op_tokens, (l_bp, r_bp))) = self.infix_operator() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            if self.newline_before() && !self.current().allows_newline_before() {
                break;
            }

            let marker = lhs.precede(self);
            for _ in 0..op_tokens {
                self.bump();
            }
            self.parse_expr_bp(r_bp);
            lhs = marker.complete(self, SyntaxKind::BinaryExpr);
        }

        lhs
    }

    /// Returns the number of tokens of the infix operator at the cursor and
    /// its binding power. `!in` is two tokens.
    fn infix_operator(&self) -> Option<(usize, (u8, u8))> {
        if self.at(TokenKind::Excl) && self.nth(1) == TokenKind::KwIn && self.nth_adjacent(1) {
            return TokenKind::KwIn.infix_binding_power().map(|bp| (2, bp));
        }
        self.current().infix_binding_power().map(|bp| (1, bp))
    }

    /// Parse postfix expressions (qualification, calls, indexing, `++`).
    pub(crate) fn parse_postfix_expr(&mut self, lhs: CompletedMarker) -> Option<CompletedMarker> {
        match self.current() {
            TokenKind::Dot | TokenKind::SafeAccess => {
                let kind = if self.at(TokenKind::Dot) {
                    SyntaxKind::DotQualifiedExpr
                } else {
                    SyntaxKind::SafeAccessExpr
                };
                let marker = lhs.precede(self);
                self.bump();
                if self.at(TokenKind::Ident) {
                    self.parse_name_ref();
                } else {
                    self.error("expecting a name");
                }
                Some(marker.complete(self, kind))
            }
            TokenKind::LParen if !self.newline_before() => {
                let marker = lhs.precede(self);
                self.parse_value_argument_list();
                self.parse_trailing_lambda();
                Some(marker.complete(self, SyntaxKind::CallExpr))
            }
            TokenKind::LBracket if !self.newline_before() => {
                let marker = lhs.precede(self);
                self.bump();
                self.disable_newlines();
                loop {
                    self.parse_expression();
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.restore_newlines();
                self.expect(TokenKind::RBracket, "']'");
                Some(marker.complete(self, SyntaxKind::IndexExpr))
            }
            TokenKind::Lt if is_callee(lhs) => self.parse_call_with_type_arguments(lhs),
            TokenKind::LBrace if is_callee(lhs) && !self.newline_before() => {
                let marker = lhs.precede(self);
                self.parse_lambda();
                Some(marker.complete(self, SyntaxKind::CallExpr))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus | TokenKind::ExclExcl
                if !self.newline_before() =>
            {
                let marker = lhs.precede(self);
                self.bump();
                Some(marker.complete(self, SyntaxKind::PostfixExpr))
            }
            _ => None,
        }
    }

    /// Try `callee<T>(args)`. On failure everything is rolled back and `<` is
    /// left to the binary operator loop.
    fn parse_call_with_type_arguments(&mut self, lhs: CompletedMarker) -> Option<CompletedMarker> {
        let marker = lhs.precede(self);
        if self.try_parse_type_argument_list() && !self.newline_before() {
            if self.at(TokenKind::LParen) {
                self.parse_value_argument_list();
                self.parse_trailing_lambda();
                return Some(marker.complete(self, SyntaxKind::CallExpr));
            }
            if self.at(TokenKind::LBrace) {
                self.parse_lambda();
                return Some(marker.complete(self, SyntaxKind::CallExpr));
            }
        }
        marker.rollback(self);
        None
    }

    /// Parse `(a, b)` of a call.
    pub(crate) fn parse_value_argument_list(&mut self) {
        let m = self.start();
        self.bump(); // (
        self.disable_newlines();

        loop {
            if self.at(TokenKind::RParen) || !self.current().can_start_expr() {
                break;
            }
            let argument = self.start();
            self.parse_expression();
            argument.complete(self, SyntaxKind::ValueArgument);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.restore_newlines();
        self.expect(TokenKind::RParen, "')'");
        m.complete(self, SyntaxKind::ValueArgumentList);
    }

    fn parse_trailing_lambda(&mut self) {
        if self.at(TokenKind::LBrace) && !self.newline_before() {
            self.parse_lambda();
        }
    }

    /// Parse primary expressions (literals, names, groups, control flow).
    pub(crate) fn parse_primary_expr(&mut self) -> CompletedMarker {
        match self.current() {
            kind if kind.is_literal() => {
                let marker = self.start();
                self.bump();
                marker.complete(self, SyntaxKind::Literal)
            }
            TokenKind::Ident => self.parse_name_ref(),
            TokenKind::KwThis => {
                let marker = self.start();
                self.bump();
                self.parse_label_ref();
                marker.complete(self, SyntaxKind::ThisExpr)
            }
            TokenKind::LParen => {
                let marker = self.start();
                self.bump();
                self.disable_newlines();
                self.parse_expression();
                self.restore_newlines();
                self.expect(TokenKind::RParen, "')'");
                marker.complete(self, SyntaxKind::ParenExpr)
            }
            TokenKind::LBrace => self.parse_lambda(),
            TokenKind::KwIf => self.parse_if_expr(),
            TokenKind::KwWhen => self.parse_when_expr(),
            TokenKind::KwWhile => self.parse_while_expr(),
            TokenKind::KwFor => self.parse_for_expr(),
            TokenKind::KwReturn => self.parse_return_expr(),
            TokenKind::KwBreak | TokenKind::KwContinue => self.parse_jump_expr(),
            _ => {
                if self.at_end() || self.at_expression_recovery() {
                    self.error("expecting an element")
                } else {
                    self.err_and_bump("expecting an element")
                }
            }
        }
    }

    fn at_expression_recovery(&self) -> bool {
        self.newline_before()
            || self.at_declaration_start()
            || matches!(
                self.current(),
                TokenKind::RParen
                    | TokenKind::RBrace
                    | TokenKind::RBracket
                    | TokenKind::Semicolon
                    | TokenKind::Comma
                    | TokenKind::Arrow
                    | TokenKind::KwElse
            )
    }

    /// Parse a reference to a name.
    pub(crate) fn parse_name_ref(&mut self) -> CompletedMarker {
        let marker = self.start();
        self.bump();
        marker.complete(self, SyntaxKind::NameRef)
    }

    /// Parse `{ a, b -> statements }`.
    pub(crate) fn parse_lambda(&mut self) -> CompletedMarker {
        let marker = self.start();
        self.bump(); // {
        self.enable_newlines();

        if !self.eat(TokenKind::Arrow) {
            self.try_parse_lambda_parameters();
        }
        self.parse_statements();

        self.restore_newlines();
        self.expect(TokenKind::RBrace, "'}'");
        marker.complete(self, SyntaxKind::LambdaExpr)
    }

    /// Speculatively parse `a, b: T ->`. Rolls back if no arrow follows.
    fn try_parse_lambda_parameters(&mut self) {
        if !self.at(TokenKind::Ident) {
            return;
        }

        let list = self.start();
        loop {
            if !self.at(TokenKind::Ident) {
                list.rollback(self);
                return;
            }
            let parameter = self.start();
            self.parse_name();
            if self.eat(TokenKind::Colon) {
                self.parse_type_ref();
            }
            parameter.complete(self, SyntaxKind::ValueParameter);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if self.at(TokenKind::Arrow) {
            list.complete(self, SyntaxKind::ValueParameterList);
            self.bump();
        } else {
            list.rollback(self);
        }
    }
}

fn is_callee(lhs: CompletedMarker) -> bool {
    matches!(
        lhs.kind(),
        SyntaxKind::NameRef | SyntaxKind::DotQualifiedExpr | SyntaxKind::SafeAccessExpr
    )
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_script;
    use crate::syntax::SyntaxKind;
    use crate::tree::{LightElement, NodeRef, TreeHandle};

    fn first_expr(tree: &TreeHandle) -> NodeRef {
        tree.child_nodes(tree.root()).next().unwrap()
    }

    fn shape(tree: &TreeHandle, node: NodeRef) -> String {
        let children: Vec<String> = tree
            .children(node)
            .map(|child| match child {
                LightElement::Node(node) => shape(tree, node),
                LightElement::Token(token) => tree.token_text(token).to_string(),
            })
            .collect();
        format!("{:?}({})", tree.kind(node), children.join(" "))
    }

    #[test]
    fn test_precedence() {
        let tree = parse_script("a = b || c && d == e + f * g");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "BinaryExpr(NameRef(a) = BinaryExpr(NameRef(b) || BinaryExpr(NameRef(c) && \
             BinaryExpr(NameRef(d) == BinaryExpr(NameRef(e) + BinaryExpr(NameRef(f) * NameRef(g)))))))"
        );
    }

    #[test]
    fn test_left_associativity() {
        let tree = parse_script("a - b - c");
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "BinaryExpr(BinaryExpr(NameRef(a) - NameRef(b)) - NameRef(c))"
        );
    }

    #[test]
    fn test_prefix_and_postfix() {
        let tree = parse_script("-a.b!!");
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "PrefixExpr(- PostfixExpr(DotQualifiedExpr(NameRef(a) . NameRef(b)) !!))"
        );
    }

    #[test]
    fn test_not_in() {
        let tree = parse_script("x !in xs");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "BinaryExpr(NameRef(x) ! in NameRef(xs))"
        );
    }

    #[test]
    fn test_call_chain_with_trailing_lambda() {
        let tree = parse_script("items.filter { it > 0 }.map(f)[0]");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "IndexExpr(CallExpr(DotQualifiedExpr(CallExpr(DotQualifiedExpr(NameRef(items) . \
             NameRef(filter)) LambdaExpr({ BinaryExpr(NameRef(it) > Literal(0)) })) . NameRef(map)) \
             ValueArgumentList(( ValueArgument(NameRef(f)) ))) [ Literal(0) ])"
        );
    }

    #[test]
    fn test_explicit_type_arguments_are_speculative() {
        let tree = parse_script("f<Int>(x)");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "CallExpr(NameRef(f) TypeArgumentList(< TypeRef(UserType(Int)) >) \
             ValueArgumentList(( ValueArgument(NameRef(x)) )))"
        );

        let tree = parse_script("a < b && c > d");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "BinaryExpr(BinaryExpr(NameRef(a) < NameRef(b)) && BinaryExpr(NameRef(c) > NameRef(d)))"
        );
        assert_eq!(tree.marker_stats().rolled_back, 1);
    }

    #[test]
    fn test_lambda_parameters_are_speculative() {
        let tree = parse_script("{ a, b -> a + b }");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "LambdaExpr({ ValueParameterList(ValueParameter(Name(a)) , ValueParameter(Name(b))) -> \
             BinaryExpr(NameRef(a) + NameRef(b)) })"
        );

        let tree = parse_script("{ a }");
        assert_eq!(
            shape(&tree, first_expr(&tree)),
            "LambdaExpr({ NameRef(a) })"
        );
    }

    #[test]
    fn test_binary_operator_on_next_line_ends_expression() {
        let tree = parse_script("a\n+ b");
        let kinds: Vec<_> = tree
            .child_nodes(tree.root())
            .map(|node| tree.kind(node))
            .collect();
        assert_eq!(kinds, vec![SyntaxKind::NameRef, SyntaxKind::PrefixExpr]);

        let tree = parse_script("a\n&& b");
        let kinds: Vec<_> = tree
            .child_nodes(tree.root())
            .map(|node| tree.kind(node))
            .collect();
        assert_eq!(kinds, vec![SyntaxKind::BinaryExpr]);
    }

    #[test]
    fn test_newlines_inside_parentheses_are_insignificant() {
        let tree = parse_script("f(a\n+ b,\nc)");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(tree.child_nodes(tree.root()).count(), 1);
    }

    #[test]
    fn test_postfix_increment_needs_same_line() {
        let tree = parse_script("a\n++b");
        let kinds: Vec<_> = tree
            .child_nodes(tree.root())
            .map(|node| tree.kind(node))
            .collect();
        assert_eq!(kinds, vec![SyntaxKind::NameRef, SyntaxKind::PrefixExpr]);
    }
}
