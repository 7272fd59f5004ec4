//! Type reference parsing.
//!
//! - User types: `C`, `a.b.C`, `Map<K, List<V>>`
//! - Nullable types: `C?`

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::Parser;

impl Parser<'_, '_> {
    /// Parse a type reference.
    pub(crate) fn parse_type_ref(&mut self) {
        let m = self.start();

        if self.at(TokenKind::Ident) {
            let user_type = self.start();
            self.bump();
            while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Ident {
                self.bump();
                self.bump();
            }
            if self.at(TokenKind::Lt) {
                self.parse_type_argument_list();
            }
            let user_type = user_type.complete(self, SyntaxKind::UserType);

            if self.at(TokenKind::Question) && !self.newline_before() {
                let nullable = user_type.precede(self);
                self.bump();
                nullable.complete(self, SyntaxKind::NullableType);
            }
        } else {
            self.error("expecting a type");
        }

        m.complete(self, SyntaxKind::TypeRef);
    }

    /// Parse `<A, B>` after a type name.
    pub(crate) fn parse_type_argument_list(&mut self) {
        let m = self.start();
        self.bump(); // <
        loop {
            self.parse_type_ref();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "'>'");
        m.complete(self, SyntaxKind::TypeArgumentList);
    }

    /// Speculatively parse `<A, B>` in expression position.
    ///
    /// Returns `false` without completing a node when the tokens do not form
    /// a type argument list; the caller is expected to roll back.
    pub(crate) fn try_parse_type_argument_list(&mut self) -> bool {
        let m = self.start();
        self.bump(); // <
        loop {
            if !self.at(TokenKind::Ident) {
                m.abandon(self);
                return false;
            }
            self.parse_type_ref();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.at(TokenKind::Gt) {
            m.abandon(self);
            return false;
        }
        self.bump();
        m.complete(self, SyntaxKind::TypeArgumentList);
        true
    }
}
